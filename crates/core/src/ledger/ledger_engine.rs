//! Pure replay of an asset's event history into derived holdings state.

use log::warn;
use rust_decimal::Decimal;

use crate::constants::is_quantity_significant;
use crate::history::{EventPayload, SplitFactor, TradeEvent};

use super::LedgerSnapshot;

/// Replays an event history into `{quantity, invested, average, balance}`.
///
/// The replay is total over any stored history: missing numeric details
/// arrive as zero from deserialization, every step clamps the running
/// totals to non-negative, and no input can make it fail. Resilience
/// here is what keeps recomputation safe over partially corrupt
/// persisted documents.
pub struct LedgerEngine;

impl LedgerEngine {
    /// Recomputes the derived state from `history`.
    ///
    /// `last_known_price` is the unit price implied by the pre-edit
    /// snapshot (see [`crate::assets::Asset::last_known_price`]). The
    /// final balance is re-derived at that price, so a structural edit
    /// to history moves the balance proportionally to the quantity
    /// change rather than arbitrarily.
    ///
    /// Events may arrive unsorted; they are ordered by date with a
    /// stable sort, so entries sharing a date keep their insertion
    /// order. That insertion order is the documented tie-break.
    pub fn replay(history: &[TradeEvent], last_known_price: Decimal) -> LedgerSnapshot {
        let mut ordered: Vec<&TradeEvent> = history.iter().collect();
        ordered.sort_by(|a, b| a.date.cmp(&b.date));

        let mut quantity = Decimal::ZERO;
        let mut invested = Decimal::ZERO;

        for event in ordered {
            match &event.payload {
                EventPayload::Buy { quantity: qty, .. }
                | EventPayload::Bonus { quantity: qty, .. }
                | EventPayload::Staking { quantity: qty, .. }
                | EventPayload::Subscription { quantity: qty, .. } => {
                    quantity += qty;
                    invested += event.value;
                }
                EventPayload::Sell { quantity: sold, .. } => {
                    // Cost basis leaves at the running weighted average,
                    // not at the sale price; the spread between the two
                    // is the realized result.
                    let average = if is_quantity_significant(&quantity) {
                        invested / quantity
                    } else {
                        Decimal::ZERO
                    };
                    invested -= sold * average;
                    quantity -= sold;
                }
                EventPayload::Split { factor } | EventPayload::Inplit { factor } => {
                    quantity = Self::apply_split(quantity, factor, &event.id);
                }
                EventPayload::BalanceUpdate => {
                    // The mark-to-market effect lives in the snapshot the
                    // caller derived `last_known_price` from; quantity
                    // and cost basis are untouched.
                }
                EventPayload::TickerChange { .. } => {}
            }

            quantity = quantity.max(Decimal::ZERO);
            invested = invested.max(Decimal::ZERO);
        }

        if !is_quantity_significant(&quantity) {
            // Residual dust under the liquidation threshold collapses to
            // an exact zero together with its cost basis and balance.
            return LedgerSnapshot::default();
        }

        LedgerSnapshot {
            quantity,
            invested_value: invested,
            average_price: invested / quantity,
            current_balance: quantity * last_known_price,
        }
    }

    fn apply_split(quantity: Decimal, factor: &SplitFactor, event_id: &str) -> Decimal {
        match factor {
            SplitFactor::Ratio { ratio } => {
                if ratio.is_sign_positive() && !ratio.is_zero() {
                    quantity * ratio
                } else {
                    warn!(
                        "Split event {} carries non-positive ratio {}; quantity left unchanged",
                        event_id, ratio
                    );
                    quantity
                }
            }
            // Applied verbatim. The delta was computed against the
            // holding at entry time, so it is not replay-safe once
            // earlier history changes; see SplitFactor docs.
            SplitFactor::LegacyDelta { delta } => quantity + delta,
        }
    }
}
