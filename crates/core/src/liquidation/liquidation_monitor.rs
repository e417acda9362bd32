//! Active/closed partitioning rules.
//!
//! One epsilon authority for the whole crate: a quantity at or below
//! [`crate::constants::QUANTITY_EPSILON`] belongs to the closed
//! partition. Every recomputation ends with [`reconcile_status`], so the
//! status field and the partition an asset lives in can never disagree.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::{Asset, AssetStatus};
use crate::constants::is_quantity_significant;

/// Which collection an asset document lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Partition {
    Active,
    Closed,
}

impl Partition {
    /// Partition a quantity belongs to.
    pub fn for_quantity(quantity: &Decimal) -> Partition {
        if is_quantity_significant(quantity) {
            Partition::Active
        } else {
            Partition::Closed
        }
    }

    /// Partition implied by a status field. A listener re-deriving
    /// partitions from persisted status agrees with the monitor because
    /// both go through the same epsilon rule.
    pub const fn for_status(status: AssetStatus) -> Partition {
        match status {
            AssetStatus::Active => Partition::Active,
            AssetStatus::Liquidated => Partition::Closed,
        }
    }
}

/// A partition move decided by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionTransition {
    /// Quantity reached epsilon; the asset moves to the closed partition.
    Liquidated,
    /// Quantity was restored above epsilon; the asset moves back to the
    /// active partition. In practice only revert operations trigger this.
    Revived,
}

/// Aligns the asset's status with its recomputed quantity and reports
/// the transition, if any. Called after every recomputation; the status
/// write and the partition move always happen together.
pub fn reconcile_status(asset: &mut Asset) -> Option<PartitionTransition> {
    let target = match Partition::for_quantity(&asset.quantity) {
        Partition::Active => AssetStatus::Active,
        Partition::Closed => AssetStatus::Liquidated,
    };

    if asset.status == target {
        return None;
    }

    let transition = match target {
        AssetStatus::Liquidated => PartitionTransition::Liquidated,
        AssetStatus::Active => PartitionTransition::Revived,
    };
    debug!(
        "Asset {} moves {} -> {}",
        asset.id,
        asset.status.as_str(),
        target.as_str()
    );
    asset.status = target;
    Some(transition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetFamily, Currency, NewAssetInput};
    use rust_decimal_macros::dec;

    fn asset() -> Asset {
        Asset::new(NewAssetInput {
            ticker: "BBAS3".to_string(),
            family: AssetFamily::Variable,
            currency: Currency::Brl,
            security_type: None,
            indexer: None,
            is_reserve: false,
        })
    }

    #[test]
    fn test_epsilon_quantity_liquidates() {
        let mut asset = asset();
        asset.quantity = dec!(0.0000005);

        let transition = reconcile_status(&mut asset);

        assert_eq!(transition, Some(PartitionTransition::Liquidated));
        assert_eq!(asset.status, AssetStatus::Liquidated);
        assert_eq!(Partition::for_status(asset.status), Partition::Closed);
    }

    #[test]
    fn test_restored_quantity_revives() {
        let mut asset = asset();
        asset.status = AssetStatus::Liquidated;
        asset.quantity = dec!(3);

        let transition = reconcile_status(&mut asset);

        assert_eq!(transition, Some(PartitionTransition::Revived));
        assert_eq!(asset.status, AssetStatus::Active);
    }

    #[test]
    fn test_no_transition_when_status_matches() {
        let mut asset = asset();
        asset.quantity = dec!(10);

        assert_eq!(reconcile_status(&mut asset), None);
        assert_eq!(asset.status, AssetStatus::Active);
    }

    #[test]
    fn test_quantity_just_above_epsilon_stays_active() {
        let mut asset = asset();
        asset.quantity = dec!(0.000002);

        assert_eq!(reconcile_status(&mut asset), None);
        assert_eq!(asset.status, AssetStatus::Active);
    }
}
