//! Aggregated portfolio models exposed to dashboards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Allocation bucket an asset is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationBucket {
    /// Emergency reserve: flagged assets and Selic treasuries when the
    /// preference keeps them out of fixed income.
    Reserve,
    /// Tesouro Direto bonds other than reserve-classified Selic.
    Treasury,
    Fixed,
    Variable,
    Retirement,
}

impl AllocationBucket {
    pub const ALL: [AllocationBucket; 5] = [
        AllocationBucket::Reserve,
        AllocationBucket::Treasury,
        AllocationBucket::Fixed,
        AllocationBucket::Variable,
        AllocationBucket::Retirement,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            AllocationBucket::Reserve => "RESERVE",
            AllocationBucket::Treasury => "TREASURY",
            AllocationBucket::Fixed => "FIXED",
            AllocationBucket::Variable => "VARIABLE",
            AllocationBucket::Retirement => "RETIREMENT",
        }
    }
}

/// Per-call aggregation inputs. There is no ambient configuration: the
/// host supplies the exchange rate and preferences on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationPreferences {
    /// Single externally supplied USD -> BRL rate applied to every USD
    /// asset; quote acquisition is the host's job.
    pub usd_brl_rate: Decimal,
    /// Counts Selic-indexed treasuries as fixed income instead of
    /// reserve.
    #[serde(default)]
    pub include_selic: bool,
    /// Uninvested cash, included in the total balance.
    #[serde(default)]
    pub cash_balance: Decimal,
}

/// Balance and invested totals for one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketAllocation {
    pub bucket: AllocationBucket,
    pub balance: Decimal,
    pub invested: Decimal,
    /// Share of the invested-assets balance, rounded to two places.
    pub percentage: Decimal,
}

/// Dashboard entry for one asset, ranked by profit percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopAsset {
    pub ticker: String,
    pub profit: Decimal,
    pub profit_percentage: Decimal,
}

/// Read-only aggregated snapshot exposed to dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    /// Asset balances plus uninvested cash, in BRL.
    pub total_balance: Decimal,
    pub total_invested: Decimal,
    /// Asset balances minus invested; cash carries no profit.
    pub profit: Decimal,
    pub profit_percentage: Decimal,
    pub allocation: Vec<BucketAllocation>,
    pub top_assets: Vec<TopAsset>,
}
