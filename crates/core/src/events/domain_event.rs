//! Domain event types.

use serde::{Deserialize, Serialize};

/// Domain events emitted after in-memory mutations.
///
/// Observers are notified optimistically — before the remote write
/// confirms — so dashboards track the in-memory state. A failed
/// write-back surfaces as [`DomainEvent::PersistenceFailed`] instead of
/// rolling the mutation back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// An asset's derived state changed; a fresh snapshot is available.
    AssetChanged { asset_id: String },

    /// Recomputation drove the quantity to epsilon; the asset moved to
    /// the closed partition.
    AssetLiquidated { asset_id: String },

    /// A revert restored the quantity; the asset moved back to the
    /// active partition.
    AssetRevived { asset_id: String },

    /// A corporate ticker change renamed the asset.
    TickerRenamed {
        asset_id: String,
        old_ticker: String,
        new_ticker: String,
    },

    /// The optimistic write-back failed; in-memory state was kept and
    /// diverges from the store until the next full resync.
    PersistenceFailed { asset_id: String, message: String },
}

impl DomainEvent {
    pub fn asset_changed(asset_id: impl Into<String>) -> Self {
        Self::AssetChanged {
            asset_id: asset_id.into(),
        }
    }

    pub fn asset_liquidated(asset_id: impl Into<String>) -> Self {
        Self::AssetLiquidated {
            asset_id: asset_id.into(),
        }
    }

    pub fn asset_revived(asset_id: impl Into<String>) -> Self {
        Self::AssetRevived {
            asset_id: asset_id.into(),
        }
    }

    pub fn ticker_renamed(
        asset_id: impl Into<String>,
        old_ticker: impl Into<String>,
        new_ticker: impl Into<String>,
    ) -> Self {
        Self::TickerRenamed {
            asset_id: asset_id.into(),
            old_ticker: old_ticker.into(),
            new_ticker: new_ticker.into(),
        }
    }

    pub fn persistence_failed(asset_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PersistenceFailed {
            asset_id: asset_id.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_event_serialization() {
        let event = DomainEvent::ticker_renamed("a-1", "OLD3", "NEW3");

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("ticker_renamed"));

        let deserialized: DomainEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }
}
