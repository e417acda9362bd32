//! Input models for user-initiated operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::NewAssetInput;
use crate::errors::ValidationError;
use crate::history::EventPayload;

/// User-initiated sale of part or all of a holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellOrder {
    pub date: DateTime<Utc>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    #[serde(default)]
    pub costs: Decimal,
}

impl SellOrder {
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if !self.quantity.is_sign_positive() || self.quantity.is_zero() {
            return Err(ValidationError::InvalidInput(format!(
                "Sell quantity must be positive, got {}",
                self.quantity
            )));
        }
        if self.unit_price.is_sign_negative() {
            return Err(ValidationError::InvalidInput(format!(
                "Sell unit price cannot be negative, got {}",
                self.unit_price
            )));
        }
        if self.costs.is_sign_negative() {
            return Err(ValidationError::InvalidInput(format!(
                "Sell costs cannot be negative, got {}",
                self.costs
            )));
        }
        Ok(())
    }

    /// Net cash flow of the sale.
    pub fn proceeds(&self) -> Decimal {
        self.quantity * self.unit_price - self.costs
    }
}

/// A corporate action applied to an existing asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CorporateAction {
    /// Share bonus at (near-)zero cost per unit.
    Bonus {
        date: DateTime<Utc>,
        quantity: Decimal,
        #[serde(default)]
        unit_price: Decimal,
    },
    /// Staking reward; same economics as a bonus.
    Staking {
        date: DateTime<Utc>,
        quantity: Decimal,
        #[serde(default)]
        unit_price: Decimal,
    },
    /// Exercise of subscription rights at a set price.
    Subscription {
        date: DateTime<Utc>,
        quantity: Decimal,
        unit_price: Decimal,
    },
    /// Forward split: quantity multiplies by `ratio` (> 1 in practice).
    Split {
        date: DateTime<Utc>,
        ratio: Decimal,
        #[serde(default)]
        liquidate_remaining: bool,
    },
    /// Reverse split: quantity multiplies by `ratio` (< 1 in practice).
    Inplit {
        date: DateTime<Utc>,
        ratio: Decimal,
        #[serde(default)]
        liquidate_remaining: bool,
    },
    TickerChange {
        date: DateTime<Utc>,
        new_ticker: String,
    },
}

/// Field-level patch for an existing history entry. Only the fields
/// present are overwritten; the entry keeps its id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    pub date: Option<DateTime<Utc>>,
    pub value: Option<Decimal>,
    pub payload: Option<EventPayload>,
}

impl EventUpdate {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.value.is_none() && self.payload.is_none()
    }
}

/// Where an incoming event should land: an existing asset, or a new one
/// created from identifying data on its first buy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EventTarget {
    Existing { asset_id: String },
    New { input: NewAssetInput },
}
