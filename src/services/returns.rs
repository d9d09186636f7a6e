use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QuerySelect,
    RelationTrait, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::entities::{asset, issued_accessory, issued_asset, AssetType, TransactionType};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::catalog::{AssetCatalogService, AssetRecord};
use crate::services::ledger::LedgerService;

/// What a successful return produced. For laptops the operator loop still
/// owes the "was the charger returned?" question; answering yes leads to
/// `return_charger`, declining mutates nothing.
#[derive(Debug, Clone)]
pub struct ReturnReceipt {
    pub transaction_id: i64,
    pub entity_id: i64,
    pub asset: AssetRecord,
    pub charger_prompt: bool,
}

/// Outcome of the post-laptop charger follow-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargerReturn {
    Returned {
        asset_id: String,
        transaction_id: i64,
    },
    /// No live charger link was found for the entity. Non-fatal: the
    /// charger may have been issued outside the normal flow.
    NoneHeld,
}

/// Validates and executes the return operation.
#[derive(Clone)]
pub struct ReturnService {
    db: Arc<DatabaseConnection>,
    catalog: AssetCatalogService,
    ledger: LedgerService,
    event_sender: EventSender,
}

impl ReturnService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        catalog: AssetCatalogService,
        ledger: LedgerService,
        event_sender: EventSender,
    ) -> Self {
        Self {
            db,
            catalog,
            ledger,
            event_sender,
        }
    }

    /// Returns an ordinary asset by barcode. Accessories are pair-keyed and
    /// must come back through [`return_accessory`](Self::return_accessory)
    /// with the holder resolved from a DOC number first.
    ///
    /// On success one storage transaction deletes the live link and appends
    /// the RETURNED ledger row.
    #[instrument(skip(self))]
    pub async fn return_asset(
        &self,
        asset_id: &str,
        actor: &str,
        notes: Option<String>,
    ) -> Result<ReturnReceipt, ServiceError> {
        let asset = self
            .catalog
            .lookup_by_id(asset_id)
            .await?
            .ok_or_else(|| ServiceError::AssetNotFound(asset_id.to_string()))?;

        if asset.is_accessory() {
            return Err(ServiceError::InvalidInput(format!(
                "asset '{asset_id}' is an accessory; supply the holder's DOC number and use the accessory return path"
            )));
        }

        let issued = match self.ledger.current_holder(asset_id).await? {
            Some(issued) => issued,
            None => {
                return Err(ServiceError::NotCurrentlyIssued {
                    asset_id: asset_id.to_string(),
                    detail: self.not_issued_detail(asset_id).await?,
                })
            }
        };

        let entity_id = issued.entity_id;

        let txn = self
            .db
            .begin()
            .await
            .map_err(ServiceError::transaction_failed)?;

        issued_asset::Entity::delete_by_id(asset_id.to_owned())
            .exec(&txn)
            .await
            .map_err(ServiceError::transaction_failed)?;

        let transaction_id = self
            .ledger
            .record(
                &txn,
                entity_id,
                asset_id,
                TransactionType::Returned,
                actor,
                notes,
            )
            .await
            .map_err(ServiceError::transaction_failed)?;

        txn.commit()
            .await
            .map_err(ServiceError::transaction_failed)?;

        self.event_sender
            .send_or_log(Event::AssetReturned {
                transaction_id,
                entity_id,
                asset_id: asset_id.to_string(),
            })
            .await;

        let charger_prompt = asset.asset_type == AssetType::Laptop;

        info!(entity_id, asset_id, transaction_id, "asset returned");

        Ok(ReturnReceipt {
            transaction_id,
            entity_id,
            asset,
            charger_prompt,
        })
    }

    /// Returns an accessory held by a specific entity.
    ///
    /// Headphones are rejected with `NonReturnable` before anything is
    /// written: no link deletion, no RETURNED row.
    #[instrument(skip(self))]
    pub async fn return_accessory(
        &self,
        asset_id: &str,
        entity_id: i64,
        actor: &str,
        notes: Option<String>,
    ) -> Result<ReturnReceipt, ServiceError> {
        let asset = self
            .catalog
            .lookup_by_id(asset_id)
            .await?
            .ok_or_else(|| ServiceError::AssetNotFound(asset_id.to_string()))?;

        if !asset.is_accessory() {
            return Err(ServiceError::InvalidInput(format!(
                "asset '{asset_id}' is not an accessory; use the ordinary return path"
            )));
        }

        if !asset.is_returnable() {
            return Err(ServiceError::NonReturnable {
                asset_id: asset_id.to_string(),
            });
        }

        if self.ledger.accessory_link(asset_id, entity_id).await?.is_none() {
            return Err(ServiceError::NotCurrentlyIssued {
                asset_id: asset_id.to_string(),
                detail: self.not_issued_detail(asset_id).await?,
            });
        }

        let transaction_id = self
            .unlink_and_record(asset_id, entity_id, actor, notes)
            .await?;

        self.event_sender
            .send_or_log(Event::AccessoryReturned {
                transaction_id,
                entity_id,
                asset_id: asset_id.to_string(),
            })
            .await;

        info!(entity_id, asset_id, transaction_id, "accessory returned");

        Ok(ReturnReceipt {
            transaction_id,
            entity_id,
            asset,
            charger_prompt: false,
        })
    }

    /// Post-laptop charger follow-up: finds the entity's live charger link,
    /// deletes it, and appends its own RETURNED ledger row. A missing link
    /// is the non-fatal `NoneHeld` outcome.
    #[instrument(skip(self))]
    pub async fn return_charger(
        &self,
        entity_id: i64,
        actor: &str,
    ) -> Result<ChargerReturn, ServiceError> {
        let link = issued_accessory::Entity::find()
            .join(JoinType::InnerJoin, issued_accessory::Relation::Asset.def())
            .filter(asset::Column::AssetType.eq(AssetType::Charger.as_str()))
            .filter(issued_accessory::Column::EntityId.eq(entity_id))
            .one(&*self.db)
            .await?;

        let Some(link) = link else {
            warn!(
                entity_id,
                "no live charger link found; charger may have been issued outside the normal flow"
            );
            return Ok(ChargerReturn::NoneHeld);
        };

        let asset_id = link.asset_id.clone();
        let transaction_id = self
            .unlink_and_record(&asset_id, entity_id, actor, None)
            .await?;

        self.event_sender
            .send_or_log(Event::AccessoryReturned {
                transaction_id,
                entity_id,
                asset_id: asset_id.clone(),
            })
            .await;

        info!(entity_id, asset_id = %asset_id, transaction_id, "charger returned");

        Ok(ChargerReturn::Returned {
            asset_id,
            transaction_id,
        })
    }

    /// Deletes one accessory link and appends the RETURNED row, atomically.
    async fn unlink_and_record(
        &self,
        asset_id: &str,
        entity_id: i64,
        actor: &str,
        notes: Option<String>,
    ) -> Result<i64, ServiceError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(ServiceError::transaction_failed)?;

        issued_accessory::Entity::delete_by_id((asset_id.to_owned(), entity_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::transaction_failed)?;

        let transaction_id = self
            .ledger
            .record(
                &txn,
                entity_id,
                asset_id,
                TransactionType::Returned,
                actor,
                notes,
            )
            .await
            .map_err(ServiceError::transaction_failed)?;

        txn.commit()
            .await
            .map_err(ServiceError::transaction_failed)?;

        Ok(transaction_id)
    }

    /// Explains a refused return: cites the latest ledger row when one
    /// exists, otherwise the asset has never been issued at all.
    async fn not_issued_detail(&self, asset_id: &str) -> Result<String, ServiceError> {
        let detail = match self.ledger.latest(asset_id).await? {
            Some(last) => format!(
                "was {} as of {} by '{}'",
                last.transaction_type,
                last.transaction_timestamp.format("%Y-%m-%d %H:%M:%S"),
                last.transaction_user
            ),
            None => "never issued".to_string(),
        };

        Ok(detail)
    }
}
