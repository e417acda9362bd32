//! Cross-currency roll-up of all assets into dashboard totals.

use std::collections::HashMap;

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::assets::{Asset, AssetFamily, Currency};
use crate::constants::{is_quantity_significant, PERCENT_DECIMAL_PRECISION};

use super::{AggregationPreferences, AllocationBucket, BucketAllocation, PortfolioSummary, TopAsset};

/// Pure aggregation over asset snapshots. Holds no state; everything it
/// needs arrives per call.
pub struct PortfolioAggregator;

impl PortfolioAggregator {
    /// Rolls every asset up into BRL totals, bucket allocations and a
    /// top-assets ranking.
    pub fn aggregate(assets: &[Asset], preferences: &AggregationPreferences) -> PortfolioSummary {
        let mut asset_balance = Decimal::ZERO;
        let mut total_invested = Decimal::ZERO;
        let mut bucket_totals: HashMap<AllocationBucket, (Decimal, Decimal)> = HashMap::new();
        let mut top_assets: Vec<TopAsset> = Vec::new();

        for asset in assets {
            let (balance, invested) = Self::in_base_currency(asset, preferences);

            asset_balance += balance;
            total_invested += invested;

            let bucket = Self::resolve_bucket(asset, preferences);
            let entry = bucket_totals
                .entry(bucket)
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            entry.0 += balance;
            entry.1 += invested;

            if is_quantity_significant(&asset.quantity) && !invested.is_zero() {
                let profit = balance - invested;
                top_assets.push(TopAsset {
                    ticker: asset.ticker.clone(),
                    profit,
                    profit_percentage: (profit / invested * dec!(100))
                        .round_dp(PERCENT_DECIMAL_PRECISION),
                });
            }
        }

        top_assets.sort_by(|a, b| b.profit_percentage.cmp(&a.profit_percentage));

        let allocation = AllocationBucket::ALL
            .iter()
            .filter_map(|bucket| {
                let (balance, invested) = bucket_totals.get(bucket).copied()?;
                if balance.is_zero() && invested.is_zero() {
                    return None;
                }
                let percentage = if asset_balance.is_zero() {
                    Decimal::ZERO
                } else {
                    (balance / asset_balance * dec!(100)).round_dp(PERCENT_DECIMAL_PRECISION)
                };
                Some(BucketAllocation {
                    bucket: *bucket,
                    balance,
                    invested,
                    percentage,
                })
            })
            .collect();

        let profit = asset_balance - total_invested;
        let profit_percentage = if total_invested.is_zero() {
            Decimal::ZERO
        } else {
            (profit / total_invested * dec!(100)).round_dp(PERCENT_DECIMAL_PRECISION)
        };

        debug!(
            "Aggregated {} assets: balance {}, invested {}, profit {}",
            assets.len(),
            asset_balance,
            total_invested,
            profit
        );

        PortfolioSummary {
            total_balance: asset_balance + preferences.cash_balance,
            total_invested,
            profit,
            profit_percentage,
            allocation,
            top_assets,
        }
    }

    /// Converts an asset's balance and invested value to BRL with the
    /// single supplied rate.
    fn in_base_currency(asset: &Asset, preferences: &AggregationPreferences) -> (Decimal, Decimal) {
        match asset.currency {
            Currency::Brl => (asset.current_balance, asset.invested_value),
            Currency::Usd => (
                asset.current_balance * preferences.usd_brl_rate,
                asset.invested_value * preferences.usd_brl_rate,
            ),
        }
    }

    /// Buckets an asset. The explicit reserve flag wins; after that the
    /// classification is a string heuristic over the product labels.
    fn resolve_bucket(asset: &Asset, preferences: &AggregationPreferences) -> AllocationBucket {
        if asset.is_reserve {
            return AllocationBucket::Reserve;
        }

        match asset.family {
            AssetFamily::Treasury => {
                if Self::is_selic_indexed(asset) {
                    if preferences.include_selic {
                        AllocationBucket::Fixed
                    } else {
                        AllocationBucket::Reserve
                    }
                } else {
                    AllocationBucket::Treasury
                }
            }
            AssetFamily::FixedIncome => {
                if Self::is_retirement(asset) {
                    AllocationBucket::Retirement
                } else {
                    AllocationBucket::Fixed
                }
            }
            AssetFamily::Variable => AllocationBucket::Variable,
        }
    }

    fn is_selic_indexed(asset: &Asset) -> bool {
        Self::label_contains(asset, "selic")
    }

    fn is_retirement(asset: &Asset) -> bool {
        ["previd", "pgbl", "vgbl"]
            .iter()
            .any(|needle| Self::label_contains(asset, needle))
    }

    fn label_contains(asset: &Asset, needle: &str) -> bool {
        asset
            .indexer
            .iter()
            .chain(asset.security_type.iter())
            .any(|label| label.to_lowercase().contains(needle))
    }
}
