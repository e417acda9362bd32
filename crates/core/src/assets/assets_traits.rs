//! Repository trait for asset persistence.

use async_trait::async_trait;

use crate::errors::Result;
use crate::liquidation::Partition;

use super::Asset;

/// Persistence seam for asset documents.
///
/// The store keeps one active and one closed collection per instrument
/// family and always receives the full document, not a delta. Reads are
/// synchronous (in-memory or cached), writes are asynchronous so callers
/// can apply them optimistically.
#[async_trait]
pub trait AssetRepositoryTrait: Send + Sync {
    /// Looks the asset up in both partitions.
    fn get_by_id(&self, asset_id: &str) -> Result<Asset>;

    /// Lists all assets in one partition.
    fn list(&self, partition: Partition) -> Result<Vec<Asset>>;

    /// Inserts a new asset document into the partition matching its
    /// status. Fails on duplicate id.
    async fn create(&self, asset: &Asset) -> Result<()>;

    /// Writes the full document back, moving it between partitions when
    /// its status changed. Rejects writes whose `version` stamp is not
    /// newer than the stored document (`StoreError::StaleVersion`).
    async fn save(&self, asset: &Asset) -> Result<()>;
}
