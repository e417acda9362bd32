use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, warn};
use rust_decimal::Decimal;

use crate::assets::{Asset, AssetFamily, AssetRepositoryTrait, Currency};
use crate::constants::{is_quantity_significant, quantity_epsilon};
use crate::errors::{Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink};
use crate::history::{EventPayload, SplitFactor, TradeEvent};
use crate::ledger::LedgerEngine;
use crate::liquidation::{reconcile_status, PartitionTransition};
use crate::transactions::{
    CorporateAction, EventTarget, EventUpdate, SellOrder, TransactionServiceTrait,
};

/// Service orchestrating mutations of the per-asset event log.
pub struct TransactionService {
    asset_repository: Arc<dyn AssetRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl TransactionService {
    /// Creates a new TransactionService with injected dependencies.
    pub fn new(
        asset_repository: Arc<dyn AssetRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            asset_repository,
            event_sink,
        }
    }

    /// Replays the full history and reconciles the liquidation status.
    /// The last known unit price is derived from the snapshot as it
    /// stands *before* the replay overwrites it.
    fn recalculate(&self, asset: &mut Asset) -> Option<PartitionTransition> {
        let last_price = asset.last_known_price();
        let snapshot = LedgerEngine::replay(&asset.history, last_price);
        asset.apply_snapshot(&snapshot);
        reconcile_status(asset)
    }

    /// Finishes a mutating operation: stamps the document, notifies
    /// observers, then writes back optimistically. A failed write keeps
    /// the in-memory mutation and surfaces through the sink.
    async fn commit(
        &self,
        asset: &mut Asset,
        transition: Option<PartitionTransition>,
        mut extra: Vec<DomainEvent>,
    ) {
        asset.version += 1;
        asset.last_update = Utc::now();

        let mut events = vec![DomainEvent::asset_changed(&asset.id)];
        match transition {
            Some(PartitionTransition::Liquidated) => {
                events.push(DomainEvent::asset_liquidated(&asset.id));
            }
            Some(PartitionTransition::Revived) => {
                events.push(DomainEvent::asset_revived(&asset.id));
            }
            None => {}
        }
        events.append(&mut extra);
        self.event_sink.emit_batch(events);

        if let Err(e) = self.asset_repository.save(asset).await {
            error!(
                "Write-back for asset {} failed, in-memory state kept: {}",
                asset.id, e
            );
            self.event_sink
                .emit(DomainEvent::persistence_failed(&asset.id, e.to_string()));
        }
    }

    fn ensure_sellable(&self, asset: &Asset, requested: Decimal) -> Result<()> {
        if requested > asset.quantity + quantity_epsilon() {
            return Err(ValidationError::InsufficientQuantity {
                ticker: asset.ticker.clone(),
                requested,
                held: asset.quantity,
            }
            .into());
        }
        Ok(())
    }

    /// Basic payload validation for externally produced events.
    fn validate_event(&self, event: &TradeEvent) -> Result<()> {
        match &event.payload {
            EventPayload::Buy {
                quantity,
                unit_price,
                costs,
            } => {
                Self::require_positive("quantity", quantity)?;
                Self::require_non_negative("unit price", unit_price)?;
                Self::require_non_negative("costs", costs)?;
            }
            EventPayload::Sell {
                quantity,
                unit_price,
                costs,
                ..
            } => {
                Self::require_positive("quantity", quantity)?;
                Self::require_non_negative("unit price", unit_price)?;
                Self::require_non_negative("costs", costs)?;
            }
            EventPayload::Bonus {
                quantity,
                unit_price,
            }
            | EventPayload::Staking {
                quantity,
                unit_price,
            }
            | EventPayload::Subscription {
                quantity,
                unit_price,
            } => {
                Self::require_positive("quantity", quantity)?;
                Self::require_non_negative("unit price", unit_price)?;
            }
            EventPayload::BalanceUpdate => {
                Self::require_non_negative("balance", &event.value)?;
            }
            EventPayload::Split { .. } | EventPayload::Inplit { .. } => {
                return Err(ValidationError::InvalidInput(
                    "Splits and inplits are applied as corporate actions".to_string(),
                )
                .into());
            }
            EventPayload::TickerChange { .. } => {
                return Err(ValidationError::InvalidInput(
                    "Ticker changes are applied as corporate actions".to_string(),
                )
                .into());
            }
        }
        Ok(())
    }

    fn require_positive(field: &str, value: &Decimal) -> Result<()> {
        if value.is_sign_positive() && !value.is_zero() {
            Ok(())
        } else {
            Err(ValidationError::InvalidInput(format!(
                "Field '{}' must be positive, got {}",
                field, value
            ))
            .into())
        }
    }

    /// Books a ratio split/inplit, guarding BRL exchange-traded assets
    /// against ending up with a non-tradable sub-unit holding.
    fn apply_ratio_adjustment(
        &self,
        asset: &mut Asset,
        date: chrono::DateTime<Utc>,
        ratio: Decimal,
        liquidate_remaining: bool,
        inplit: bool,
    ) -> Result<()> {
        if ratio.is_sign_negative() || ratio.is_zero() {
            return Err(ValidationError::InvalidRatio(ratio).into());
        }

        let projected = asset.quantity * ratio;
        let fractional = projected > Decimal::ZERO && projected < Decimal::ONE;
        let guarded = asset.currency == Currency::Brl && asset.family == AssetFamily::Variable;

        if fractional && guarded && !liquidate_remaining {
            return Err(ValidationError::FractionalResidue {
                ticker: asset.ticker.clone(),
                ratio,
                projected,
            }
            .into());
        }

        let factor = SplitFactor::Ratio { ratio };
        let payload = if inplit {
            EventPayload::Inplit { factor }
        } else {
            EventPayload::Split { factor }
        };
        asset
            .history
            .push(TradeEvent::new(date, Decimal::ZERO, payload));

        if fractional && guarded && liquidate_remaining {
            // The residual fraction is written off at zero price, same
            // date, right after the split; insertion order keeps it
            // behind the split during replay.
            debug!(
                "Liquidating residual {} units of {} after ratio {}",
                projected, asset.ticker, ratio
            );
            asset.history.push(TradeEvent::new(
                date,
                Decimal::ZERO,
                EventPayload::Sell {
                    quantity: projected,
                    unit_price: Decimal::ZERO,
                    costs: Decimal::ZERO,
                    reduced_invested: Some(asset.invested_value),
                    reduced_balance: Some(asset.current_balance),
                },
            ));
        }
        Ok(())
    }

    fn require_non_negative(field: &str, value: &Decimal) -> Result<()> {
        if value.is_sign_negative() {
            Err(ValidationError::InvalidInput(format!(
                "Field '{}' cannot be negative, got {}",
                field, value
            ))
            .into())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn sell(&self, asset_id: &str, order: SellOrder) -> Result<Asset> {
        order.validate()?;
        let mut asset = self.asset_repository.get_by_id(asset_id)?;
        self.ensure_sellable(&asset, order.quantity)?;

        // Proportional reductions captured against the pre-sale snapshot,
        // carried on the event so a later revert can reconstruct state
        // without replay ambiguity.
        let ratio = if is_quantity_significant(&asset.quantity) {
            (order.quantity / asset.quantity).min(Decimal::ONE)
        } else {
            Decimal::ONE
        };
        let reduced_invested = asset.invested_value * ratio;
        let reduced_balance = asset.current_balance * ratio;

        debug!(
            "Selling {} of {} units of {} ({})",
            order.quantity, asset.quantity, asset.ticker, asset.id
        );
        asset.history.push(TradeEvent::new(
            order.date,
            order.proceeds(),
            EventPayload::Sell {
                quantity: order.quantity,
                unit_price: order.unit_price,
                costs: order.costs,
                reduced_invested: Some(reduced_invested),
                reduced_balance: Some(reduced_balance),
            },
        ));

        let transition = self.recalculate(&mut asset);
        self.commit(&mut asset, transition, Vec::new()).await;
        Ok(asset)
    }

    async fn revert_last_sell(&self, asset_id: &str) -> Result<Asset> {
        let mut asset = self.asset_repository.get_by_id(asset_id)?;

        // Only the most recent sell is revertible; scan from the end.
        let Some(position) = asset.history.iter().rposition(TradeEvent::is_sell) else {
            warn!(
                "No sell event to revert on asset {} ({}); nothing to do",
                asset.ticker, asset.id
            );
            return Ok(asset);
        };

        let removed = asset.history.remove(position);
        debug!(
            "Reverting sell {} of {} units on {} ({})",
            removed.id,
            match &removed.payload {
                EventPayload::Sell { quantity, .. } => *quantity,
                _ => Decimal::ZERO,
            },
            asset.ticker,
            asset.id
        );

        let transition = self.recalculate(&mut asset);
        self.commit(&mut asset, transition, Vec::new()).await;
        Ok(asset)
    }

    async fn update_entry(
        &self,
        asset_id: &str,
        event_id: &str,
        update: EventUpdate,
    ) -> Result<Asset> {
        let mut asset = self.asset_repository.get_by_id(asset_id)?;
        if update.is_empty() {
            return Ok(asset);
        }

        let Some(event) = asset.history.iter_mut().find(|e| e.id == event_id) else {
            warn!(
                "History entry {} not found on asset {}; nothing to update",
                event_id, asset_id
            );
            return Ok(asset);
        };

        if let Some(date) = update.date {
            event.date = date;
        }
        if let Some(value) = update.value {
            event.value = value;
        }
        if let Some(payload) = update.payload {
            event.payload = payload;
        }

        let transition = self.recalculate(&mut asset);
        self.commit(&mut asset, transition, Vec::new()).await;
        Ok(asset)
    }

    async fn delete_entry(&self, asset_id: &str, event_id: &str) -> Result<Asset> {
        let mut asset = self.asset_repository.get_by_id(asset_id)?;

        let Some(position) = asset.history.iter().position(|e| e.id == event_id) else {
            warn!(
                "History entry {} not found on asset {}; nothing to delete",
                event_id, asset_id
            );
            return Ok(asset);
        };

        let removed = asset.history.remove(position);
        debug!(
            "Deleted {} entry {} from {} ({})",
            removed.payload.kind(),
            removed.id,
            asset.ticker,
            asset.id
        );

        let transition = self.recalculate(&mut asset);
        self.commit(&mut asset, transition, Vec::new()).await;
        Ok(asset)
    }

    async fn apply_corporate_action(
        &self,
        asset_id: &str,
        action: CorporateAction,
    ) -> Result<Asset> {
        let mut asset = self.asset_repository.get_by_id(asset_id)?;
        let mut extra = Vec::new();

        match action {
            CorporateAction::Bonus {
                date,
                quantity,
                unit_price,
            } => {
                Self::require_positive("quantity", &quantity)?;
                Self::require_non_negative("unit price", &unit_price)?;
                asset.history.push(TradeEvent::new(
                    date,
                    quantity * unit_price,
                    EventPayload::Bonus {
                        quantity,
                        unit_price,
                    },
                ));
            }
            CorporateAction::Staking {
                date,
                quantity,
                unit_price,
            } => {
                Self::require_positive("quantity", &quantity)?;
                Self::require_non_negative("unit price", &unit_price)?;
                asset.history.push(TradeEvent::new(
                    date,
                    quantity * unit_price,
                    EventPayload::Staking {
                        quantity,
                        unit_price,
                    },
                ));
            }
            CorporateAction::Subscription {
                date,
                quantity,
                unit_price,
            } => {
                Self::require_positive("quantity", &quantity)?;
                Self::require_non_negative("unit price", &unit_price)?;
                asset.history.push(TradeEvent::new(
                    date,
                    quantity * unit_price,
                    EventPayload::Subscription {
                        quantity,
                        unit_price,
                    },
                ));
            }
            CorporateAction::Split {
                date,
                ratio,
                liquidate_remaining,
            } => {
                self.apply_ratio_adjustment(&mut asset, date, ratio, liquidate_remaining, false)?;
            }
            CorporateAction::Inplit {
                date,
                ratio,
                liquidate_remaining,
            } => {
                self.apply_ratio_adjustment(&mut asset, date, ratio, liquidate_remaining, true)?;
            }
            CorporateAction::TickerChange { date, new_ticker } => {
                let new_ticker = new_ticker.trim().to_string();
                if new_ticker.is_empty() {
                    return Err(ValidationError::MissingField("new_ticker".to_string()).into());
                }
                if new_ticker == asset.ticker {
                    return Err(ValidationError::InvalidInput(format!(
                        "Asset is already named {}",
                        new_ticker
                    ))
                    .into());
                }

                let old_ticker = asset.ticker.clone();
                asset.previous_ticker = Some(old_ticker.clone());
                asset.ticker = new_ticker.clone();
                asset.history.push(TradeEvent::new(
                    date,
                    Decimal::ZERO,
                    EventPayload::TickerChange {
                        old_ticker: old_ticker.clone(),
                        new_ticker: new_ticker.clone(),
                    },
                ));
                extra.push(DomainEvent::ticker_renamed(
                    &asset.id, old_ticker, new_ticker,
                ));
            }
        }

        let transition = self.recalculate(&mut asset);
        self.commit(&mut asset, transition, extra).await;
        Ok(asset)
    }

    async fn add_event(&self, target: EventTarget, event: TradeEvent) -> Result<Asset> {
        self.validate_event(&event)?;

        match target {
            EventTarget::Existing { asset_id } => {
                let mut asset = self.asset_repository.get_by_id(&asset_id)?;

                match &event.payload {
                    EventPayload::Sell { quantity, .. } => {
                        self.ensure_sellable(&asset, *quantity)?;
                    }
                    EventPayload::BalanceUpdate => {
                        // Direct mark-to-market; the replay then re-derives
                        // the balance from the price this override implies.
                        asset.current_balance = event.value;
                    }
                    _ => {}
                }

                asset.history.push(event);
                let transition = self.recalculate(&mut asset);
                self.commit(&mut asset, transition, Vec::new()).await;
                Ok(asset)
            }
            EventTarget::New { input } => {
                input.validate()?;
                if !matches!(event.payload, EventPayload::Buy { .. }) {
                    return Err(ValidationError::InvalidInput(
                        "A new asset must begin with a buy event".to_string(),
                    )
                    .into());
                }

                let mut asset = Asset::new(input);
                debug!("Creating asset {} ({})", asset.ticker, asset.id);
                asset.history.push(event);
                self.recalculate(&mut asset);
                // No market price is known yet; a fresh holding marks at
                // cost until the first balance update arrives.
                asset.current_balance = asset.invested_value;
                asset.version = 1;

                self.event_sink.emit(DomainEvent::asset_changed(&asset.id));
                if let Err(e) = self.asset_repository.create(&asset).await {
                    error!(
                        "Create for asset {} failed, in-memory state kept: {}",
                        asset.id, e
                    );
                    self.event_sink
                        .emit(DomainEvent::persistence_failed(&asset.id, e.to_string()));
                }
                Ok(asset)
            }
        }
    }
}
