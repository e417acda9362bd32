//! In-memory implementation of the carteira asset store.
//!
//! Keeps one active and one closed collection, mirrors how the remote
//! document store partitions assets, and enforces the same contract:
//! full-document writes, partition placement derived from the asset's
//! status, and stale-version rejection for optimistic concurrency.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use log::debug;

use carteira_core::assets::{Asset, AssetRepositoryTrait};
use carteira_core::errors::{Result, StoreError};
use carteira_core::liquidation::Partition;

/// Reference asset repository backed by in-memory maps.
#[derive(Default)]
pub struct MemoryAssetRepository {
    active: RwLock<HashMap<String, Asset>>,
    closed: RwLock<HashMap<String, Asset>>,
}

impl MemoryAssetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an asset without version checking. Test/bootstrap helper.
    pub fn seed(&self, asset: Asset) {
        let map = match Partition::for_status(asset.status) {
            Partition::Active => &self.active,
            Partition::Closed => &self.closed,
        };
        map.write().unwrap().insert(asset.id.clone(), asset);
    }

    fn current_version(&self, asset_id: &str) -> Option<u64> {
        if let Some(asset) = self.active.read().unwrap().get(asset_id) {
            return Some(asset.version);
        }
        self.closed
            .read()
            .unwrap()
            .get(asset_id)
            .map(|asset| asset.version)
    }
}

#[async_trait]
impl AssetRepositoryTrait for MemoryAssetRepository {
    fn get_by_id(&self, asset_id: &str) -> Result<Asset> {
        if let Some(asset) = self.active.read().unwrap().get(asset_id) {
            return Ok(asset.clone());
        }
        self.closed
            .read()
            .unwrap()
            .get(asset_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(asset_id.to_string()).into())
    }

    fn list(&self, partition: Partition) -> Result<Vec<Asset>> {
        let map = match partition {
            Partition::Active => &self.active,
            Partition::Closed => &self.closed,
        };
        Ok(map.read().unwrap().values().cloned().collect())
    }

    async fn create(&self, asset: &Asset) -> Result<()> {
        if self.current_version(&asset.id).is_some() {
            return Err(StoreError::Duplicate(asset.id.clone()).into());
        }
        debug!("Creating asset document {} ({})", asset.ticker, asset.id);
        self.seed(asset.clone());
        Ok(())
    }

    async fn save(&self, asset: &Asset) -> Result<()> {
        if let Some(current) = self.current_version(&asset.id) {
            if current >= asset.version {
                return Err(StoreError::StaleVersion {
                    asset_id: asset.id.clone(),
                    attempted: asset.version,
                    current,
                }
                .into());
            }
        }

        // Remove from both partitions, then place per status, so the
        // asset can never appear in two collections.
        let mut active = self.active.write().unwrap();
        let mut closed = self.closed.write().unwrap();
        active.remove(&asset.id);
        closed.remove(&asset.id);
        let map = match Partition::for_status(asset.status) {
            Partition::Active => &mut *active,
            Partition::Closed => &mut *closed,
        };
        map.insert(asset.id.clone(), asset.clone());
        debug!(
            "Saved asset document {} ({}) at version {}",
            asset.ticker, asset.id, asset.version
        );
        Ok(())
    }
}
