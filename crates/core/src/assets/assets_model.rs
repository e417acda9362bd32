//! Asset domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::is_quantity_significant;
use crate::errors::ValidationError;
use crate::history::TradeEvent;
use crate::ledger::LedgerSnapshot;

/// Currency an asset is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    #[default]
    Brl,
    Usd,
}

impl Currency {
    /// Returns the ISO 4217 code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Currency::Brl => "BRL",
            Currency::Usd => "USD",
        }
    }

    /// Parses an ISO 4217 code.
    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "BRL" => Some(Currency::Brl),
            "USD" => Some(Currency::Usd),
            _ => None,
        }
    }
}

/// Instrument family.
///
/// Discriminates which source collection the asset document lives in and
/// which operations apply to it (e.g. the fractional-split guard only
/// concerns BRL variable-income assets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetFamily {
    /// Bank-issued paper and private credit: CDB, LCI, LCA, debentures,
    /// retirement plans.
    FixedIncome,
    /// Tesouro Direto bonds.
    Treasury,
    /// Exchange-traded: stocks, FIIs, ETFs, crypto.
    #[default]
    Variable,
}

impl AssetFamily {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssetFamily::FixedIncome => "FIXED_INCOME",
            AssetFamily::Treasury => "TREASURY",
            AssetFamily::Variable => "VARIABLE",
        }
    }
}

/// Lifecycle status. The partition an asset document lives in is always
/// derived from this field, so store partitioning and in-memory state
/// cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    #[default]
    Active,
    Liquidated,
}

impl AssetStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Active => "ACTIVE",
            AssetStatus::Liquidated => "LIQUIDATED",
        }
    }
}

/// Domain model representing a tracked holding.
///
/// `history` is the source of truth: `quantity`, `invested_value` and
/// `average_price` are always recomputed from it, and `current_balance`
/// from the last known unit price. The numeric fields are cached on the
/// document only so dashboards can read them without a replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,

    /// Display identity. For fixed income this is the issuer/product
    /// label rather than an exchange ticker.
    pub ticker: String,
    pub family: AssetFamily,
    /// Product label feeding the allocation heuristics, e.g. "CDB",
    /// "Tesouro Selic 2029", "PGBL".
    pub security_type: Option<String>,
    /// Rate index the instrument tracks, e.g. "CDI", "IPCA", "SELIC".
    pub indexer: Option<String>,
    /// Explicit emergency-reserve flag; wins over every heuristic.
    #[serde(default)]
    pub is_reserve: bool,
    pub currency: Currency,

    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub invested_value: Decimal,
    #[serde(default)]
    pub current_balance: Decimal,
    #[serde(default)]
    pub average_price: Decimal,

    #[serde(default)]
    pub history: Vec<TradeEvent>,
    #[serde(default)]
    pub status: AssetStatus,
    /// Kept across ticker changes for traceability.
    pub previous_ticker: Option<String>,

    /// Optimistic-concurrency stamp. Bumped on every mutation; the store
    /// rejects writes that do not carry a newer stamp than the document
    /// it holds.
    #[serde(default)]
    pub version: u64,
    pub last_update: DateTime<Utc>,
}

impl Asset {
    pub fn new(input: NewAssetInput) -> Self {
        Asset {
            id: Uuid::new_v4().to_string(),
            ticker: input.ticker,
            family: input.family,
            security_type: input.security_type,
            indexer: input.indexer,
            is_reserve: input.is_reserve,
            currency: input.currency,
            quantity: Decimal::ZERO,
            invested_value: Decimal::ZERO,
            current_balance: Decimal::ZERO,
            average_price: Decimal::ZERO,
            history: Vec::new(),
            status: AssetStatus::Active,
            previous_ticker: None,
            version: 0,
            last_update: Utc::now(),
        }
    }

    /// Unit price implied by the last known market value, zero when the
    /// holding is empty. Deriving it from the live snapshot preserves the
    /// most recent mark-to-market across a structural edit to history.
    pub fn last_known_price(&self) -> Decimal {
        if is_quantity_significant(&self.quantity) {
            self.current_balance / self.quantity
        } else {
            Decimal::ZERO
        }
    }

    /// Overwrites the cached numeric fields with a freshly replayed
    /// snapshot.
    pub fn apply_snapshot(&mut self, snapshot: &LedgerSnapshot) {
        self.quantity = snapshot.quantity;
        self.invested_value = snapshot.invested_value;
        self.average_price = snapshot.average_price;
        self.current_balance = snapshot.current_balance;
    }

    /// Current profit against cost basis, in the asset's own currency.
    pub fn profit(&self) -> Decimal {
        self.current_balance - self.invested_value
    }
}

/// Identifying data for creating an asset on its first buy event.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewAssetInput {
    pub ticker: String,
    pub family: AssetFamily,
    pub currency: Currency,
    pub security_type: Option<String>,
    pub indexer: Option<String>,
    #[serde(default)]
    pub is_reserve: bool,
}

impl NewAssetInput {
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.ticker.trim().is_empty() {
            return Err(ValidationError::MissingField("ticker".to_string()));
        }
        Ok(())
    }
}
