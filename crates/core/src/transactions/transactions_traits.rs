//! Service trait for transaction operations.

use async_trait::async_trait;

use crate::assets::Asset;
use crate::errors::Result;
use crate::history::TradeEvent;

use super::{CorporateAction, EventTarget, EventUpdate, SellOrder};

/// Orchestrates every user-initiated mutation of an asset's event log.
///
/// All operations validate synchronously before touching state, replay
/// the full history through the ledger engine, reconcile the
/// active/closed status, notify observers and then write back
/// optimistically. A failed write is logged and surfaced through the
/// event sink; the in-memory result is still returned.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Sells part or all of a holding.
    async fn sell(&self, asset_id: &str, order: SellOrder) -> Result<Asset>;

    /// Removes the most recent sell event and recomputes. Only the last
    /// sell is revertible. Soft no-op when no sell exists.
    async fn revert_last_sell(&self, asset_id: &str) -> Result<Asset>;

    /// Overwrites fields of an existing history entry and recomputes.
    /// Soft no-op when the entry is unknown.
    async fn update_entry(
        &self,
        asset_id: &str,
        event_id: &str,
        update: EventUpdate,
    ) -> Result<Asset>;

    /// Removes a history entry and recomputes. Soft no-op when the
    /// entry is unknown.
    async fn delete_entry(&self, asset_id: &str, event_id: &str) -> Result<Asset>;

    /// Applies a corporate action (bonus, staking, subscription,
    /// split/inplit, ticker change).
    async fn apply_corporate_action(&self, asset_id: &str, action: CorporateAction)
        -> Result<Asset>;

    /// Books a transaction event produced by a UI form or importer.
    /// Creates the asset when the target carries identifying data and
    /// the event is a buy. Split and ticker-change events are not
    /// accepted here; they are corporate actions.
    async fn add_event(&self, target: EventTarget, event: TradeEvent) -> Result<Asset>;
}
