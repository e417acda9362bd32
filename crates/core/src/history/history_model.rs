//! Trade event domain models — the per-asset event log.
//!
//! The history is the source of truth: an asset's quantity, cost basis
//! and average price are always a pure function of its events (plus the
//! last known market price for the balance). All numeric detail fields
//! default to zero on deserialization so that a partially corrupt stored
//! document still replays instead of failing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a split or inplit adjusts the held quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum SplitFactor {
    /// Multiplies the running quantity; the cost basis redistributes over
    /// the new unit count. Safe to replay after any history edit.
    Ratio {
        #[serde(default)]
        ratio: Decimal,
    },
    /// Absolute quantity delta, computed once against the holding at
    /// entry time. Replaying it after inserting or removing earlier
    /// events applies the delta to a quantity it was never computed for;
    /// entries in this form are preserved verbatim, never reinterpreted.
    LegacyDelta {
        #[serde(default)]
        delta: Decimal,
    },
}

/// Typed payload of a [`TradeEvent`].
///
/// The engine matches this exhaustively, so a new event kind cannot be
/// stored without the replay handling it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EventPayload {
    /// Acquisition of units, including fixed-income contributions.
    Buy {
        #[serde(default)]
        quantity: Decimal,
        #[serde(default)]
        unit_price: Decimal,
        #[serde(default)]
        costs: Decimal,
    },
    /// Disposal of units. The cost basis removed is the running weighted
    /// average at replay time, not the sale price.
    Sell {
        #[serde(default)]
        quantity: Decimal,
        #[serde(default)]
        unit_price: Decimal,
        #[serde(default)]
        costs: Decimal,
        /// Proportional reductions captured against the pre-sale
        /// snapshot when the sale was booked. Carried for revert and
        /// audit; the replay derives its own reduction.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reduced_invested: Option<Decimal>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reduced_balance: Option<Decimal>,
    },
    /// Manual mark-to-market: the event's `value` overrode the asset's
    /// balance when it was booked. Quantity and cost basis are untouched.
    #[serde(rename = "update")]
    BalanceUpdate,
    /// Share bonus received at (near-)zero cost per unit.
    Bonus {
        #[serde(default)]
        quantity: Decimal,
        #[serde(default)]
        unit_price: Decimal,
    },
    /// Staking reward, economically identical to a bonus.
    Staking {
        #[serde(default)]
        quantity: Decimal,
        #[serde(default)]
        unit_price: Decimal,
    },
    /// Exercise of subscription rights at a set price.
    Subscription {
        #[serde(default)]
        quantity: Decimal,
        #[serde(default)]
        unit_price: Decimal,
    },
    Split { factor: SplitFactor },
    Inplit { factor: SplitFactor },
    /// Rename only; no numeric effect.
    TickerChange {
        old_ticker: String,
        new_ticker: String,
    },
}

impl EventPayload {
    /// Stable label used in logs and diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            EventPayload::Buy { .. } => "buy",
            EventPayload::Sell { .. } => "sell",
            EventPayload::BalanceUpdate => "update",
            EventPayload::Bonus { .. } => "bonus",
            EventPayload::Staking { .. } => "staking",
            EventPayload::Subscription { .. } => "subscription",
            EventPayload::Split { .. } => "split",
            EventPayload::Inplit { .. } => "inplit",
            EventPayload::TickerChange { .. } => "ticker_change",
        }
    }
}

/// A single entry in an asset's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEvent {
    #[serde(default = "new_event_id")]
    pub id: String,
    pub date: DateTime<Utc>,
    /// Total cash flow of the transaction: cost for acquisitions,
    /// proceeds for sales, the new balance for manual updates.
    #[serde(default)]
    pub value: Decimal,
    #[serde(flatten)]
    pub payload: EventPayload,
}

fn new_event_id() -> String {
    Uuid::new_v4().to_string()
}

impl TradeEvent {
    pub fn new(date: DateTime<Utc>, value: Decimal, payload: EventPayload) -> Self {
        Self {
            id: new_event_id(),
            date,
            value,
            payload,
        }
    }

    pub fn is_sell(&self) -> bool {
        matches!(self.payload, EventPayload::Sell { .. })
    }

    /// Realized profit or loss of a sell against the cost basis it
    /// removed. Derived on demand, never stored. `None` for non-sell
    /// events and for sells booked without the reduction amounts.
    pub fn realized_result(&self) -> Option<Decimal> {
        match &self.payload {
            EventPayload::Sell {
                reduced_invested: Some(reduced),
                ..
            } => Some(self.value - reduced),
            _ => None,
        }
    }
}
