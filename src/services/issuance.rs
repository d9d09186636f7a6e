use sea_orm::{
    ActiveModelTrait, DatabaseConnection, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::entities::{
    issued_accessory, issued_asset, AssetStatus, AssetType, TransactionType,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::catalog::{AssetCatalogService, AssetRecord};
use crate::services::directory::{EntityDirectoryService, HeldAsset};
use crate::services::documents::DocumentService;
use crate::services::ledger::LedgerService;

/// What a successful issuance produced, including the laptop bundling
/// follow-ups the operator loop still owes the entity. Prompting and
/// barcode scanning happen in the caller, before each accessory's own
/// atomic write — the engine never blocks on input.
#[derive(Debug, Clone)]
pub struct IssuanceReceipt {
    pub transaction_id: i64,
    pub asset: AssetRecord,
    pub agreement_document_id: i64,
    pub labels_document_id: Option<i64>,
    /// Entity holds no live charger; one must be scanned and issued.
    pub charger_required: bool,
    /// Entity holds no live headphones; offer once, skipping is fine.
    pub headphones_offered: bool,
}

/// Validates and executes the issue operation.
#[derive(Clone)]
pub struct IssuanceService {
    db: Arc<DatabaseConnection>,
    catalog: AssetCatalogService,
    directory: EntityDirectoryService,
    ledger: LedgerService,
    documents: DocumentService,
    event_sender: EventSender,
}

impl IssuanceService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        catalog: AssetCatalogService,
        directory: EntityDirectoryService,
        ledger: LedgerService,
        documents: DocumentService,
        event_sender: EventSender,
    ) -> Self {
        Self {
            db,
            catalog,
            directory,
            ledger,
            documents,
            event_sender,
        }
    }

    /// Issues an asset to an entity.
    ///
    /// Validation runs in a fixed order and the first failure wins: the
    /// asset must exist, be IN_SERVICE, have no live holder other than the
    /// requester, not duplicate a book the requester already holds (by
    /// ISBN), and not push the requester past the type's charge limit.
    ///
    /// On pass, one storage transaction inserts the ISSUED ledger row, the
    /// live-holder link, and the agreement/labels document linkage. Any
    /// step failing rolls the whole write back.
    #[instrument(skip(self))]
    pub async fn issue_asset(
        &self,
        entity_id: i64,
        asset_id: &str,
        actor: &str,
        notes: Option<String>,
    ) -> Result<IssuanceReceipt, ServiceError> {
        let asset = self
            .catalog
            .lookup_by_id(asset_id)
            .await?
            .ok_or_else(|| ServiceError::AssetNotFound(asset_id.to_string()))?;

        self.check_available(&asset)?;
        self.check_not_already_issued(&asset, entity_id).await?;

        let held = self.directory.list_issued_assets(entity_id).await?;
        check_duplicate_book(&asset, &held)?;
        check_charge_limit(&asset, &held)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(ServiceError::transaction_failed)?;

        let transaction_id = self
            .ledger
            .record(
                &txn,
                entity_id,
                asset_id,
                TransactionType::Issued,
                actor,
                notes,
            )
            .await
            .map_err(ServiceError::transaction_failed)?;

        // The link insert is where a double-issue race loses: the primary
        // key rejects a second live holder and the whole write rolls back.
        if asset.is_accessory() {
            issued_accessory::ActiveModel {
                asset_id: Set(asset_id.to_string()),
                entity_id: Set(entity_id),
                transaction_id: Set(transaction_id),
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::transaction_failed)?;
        } else {
            issued_asset::ActiveModel {
                asset_id: Set(asset_id.to_string()),
                transaction_id: Set(transaction_id),
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::transaction_failed)?;
        }

        let agreement_document_id = self
            .documents
            .ensure_agreement(&txn, entity_id, transaction_id)
            .await
            .map_err(ServiceError::transaction_failed)?;

        let labels_document_id = if asset.asset_type == AssetType::Laptop {
            let id = self
                .documents
                .create_labels(&txn, transaction_id)
                .await
                .map_err(ServiceError::transaction_failed)?;
            Some(id)
        } else {
            None
        };

        txn.commit()
            .await
            .map_err(ServiceError::transaction_failed)?;

        let event = if asset.is_accessory() {
            Event::AccessoryIssued {
                transaction_id,
                entity_id,
                asset_id: asset_id.to_string(),
            }
        } else {
            Event::AssetIssued {
                transaction_id,
                entity_id,
                asset_id: asset_id.to_string(),
            }
        };
        self.event_sender.send_or_log(event).await;

        let (charger_required, headphones_offered) = if asset.asset_type == AssetType::Laptop {
            (
                !holds_type(&held, AssetType::Charger),
                !holds_type(&held, AssetType::Headphones),
            )
        } else {
            (false, false)
        };

        info!(
            entity_id,
            asset_id,
            transaction_id,
            charger_required,
            headphones_offered,
            "asset issued"
        );

        Ok(IssuanceReceipt {
            transaction_id,
            asset,
            agreement_document_id,
            labels_document_id,
            charger_required,
            headphones_offered,
        })
    }

    /// Issues a bundled accessory (charger or headphones) scanned during a
    /// laptop checkout. The link row reuses the laptop's transaction id for
    /// audit linkage; no second ledger row is written.
    #[instrument(skip(self))]
    pub async fn issue_bundled_accessory(
        &self,
        asset_id: &str,
        entity_id: i64,
        laptop_transaction_id: i64,
        expected: AssetType,
    ) -> Result<AssetRecord, ServiceError> {
        if !expected.is_accessory() {
            return Err(ServiceError::InvalidInput(format!(
                "{expected} is not an accessory type"
            )));
        }

        let asset = self
            .catalog
            .lookup_by_id(asset_id)
            .await?
            .ok_or_else(|| ServiceError::AssetNotFound(asset_id.to_string()))?;

        if asset.asset_type != expected {
            return Err(ServiceError::InvalidInput(format!(
                "scanned asset '{asset_id}' is a {}, not a {expected}",
                asset.asset_type
            )));
        }

        self.check_available(&asset)?;
        self.check_not_already_issued(&asset, entity_id).await?;

        issued_accessory::ActiveModel {
            asset_id: Set(asset_id.to_string()),
            entity_id: Set(entity_id),
            transaction_id: Set(laptop_transaction_id),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::transaction_failed)?;

        self.event_sender
            .send_or_log(Event::AccessoryIssued {
                transaction_id: laptop_transaction_id,
                entity_id,
                asset_id: asset_id.to_string(),
            })
            .await;

        info!(
            entity_id,
            asset_id,
            laptop_transaction_id,
            kind = %expected,
            "bundled accessory issued"
        );

        Ok(asset)
    }

    fn check_available(&self, asset: &AssetRecord) -> Result<(), ServiceError> {
        if asset.asset_status != AssetStatus::InService {
            return Err(ServiceError::AssetUnavailable {
                asset_id: asset.asset_id.clone(),
                asset_type: asset.asset_type,
                status: asset.asset_status,
            });
        }
        Ok(())
    }

    /// Rejects when a live link already exists. Accessories consult every
    /// live link for the asset id, so one physical charger can never be out
    /// to two holders even though the link table is pair-keyed.
    async fn check_not_already_issued(
        &self,
        asset: &AssetRecord,
        entity_id: i64,
    ) -> Result<(), ServiceError> {
        if asset.is_accessory() {
            for link in self.ledger.live_accessory_links(&asset.asset_id).await? {
                if link.entity_id == entity_id {
                    return Err(ServiceError::AlreadyIssuedToSelf {
                        asset_id: asset.asset_id.clone(),
                    });
                }
                return Err(ServiceError::AlreadyIssuedToOther {
                    asset_id: asset.asset_id.clone(),
                    holder_entity_id: link.entity_id,
                });
            }
        } else if let Some(issued) = self.ledger.current_holder(&asset.asset_id).await? {
            if issued.entity_id == entity_id {
                return Err(ServiceError::AlreadyIssuedToSelf {
                    asset_id: asset.asset_id.clone(),
                });
            }
            return Err(ServiceError::AlreadyIssuedToOther {
                asset_id: asset.asset_id.clone(),
                holder_entity_id: issued.entity_id,
            });
        }
        Ok(())
    }
}

/// Book dedup is by ISBN, not asset id: distinct physical copies share a
/// title and one entity never needs two of it.
fn check_duplicate_book(asset: &AssetRecord, held: &[HeldAsset]) -> Result<(), ServiceError> {
    let Some(isbn) = asset.isbn() else {
        return Ok(());
    };

    if held.iter().any(|h| h.asset.isbn() == Some(isbn)) {
        return Err(ServiceError::DuplicateBook {
            isbn: isbn.to_string(),
        });
    }

    Ok(())
}

fn check_charge_limit(asset: &AssetRecord, held: &[HeldAsset]) -> Result<(), ServiceError> {
    let Some(limit) = asset.charge_limit else {
        return Ok(());
    };

    let held_same_type = held
        .iter()
        .filter(|h| h.asset.asset_type == asset.asset_type)
        .count();

    if held_same_type >= limit as usize {
        return Err(ServiceError::ChargeLimitExceeded {
            asset_type: asset.asset_type,
            limit,
        });
    }

    Ok(())
}

fn holds_type(held: &[HeldAsset], kind: AssetType) -> bool {
    held.iter().any(|h| h.asset.asset_type == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AssetStatus;
    use crate::services::catalog::AssetDetail;
    use assert_matches::assert_matches;

    fn book(asset_id: &str, isbn: &str, limit: Option<i32>) -> AssetRecord {
        AssetRecord {
            asset_id: asset_id.to_string(),
            asset_type: AssetType::Book,
            charge_limit: limit,
            asset_cost: None,
            asset_status: AssetStatus::InService,
            detail: AssetDetail::Book(crate::entities::book::Model {
                asset_id: asset_id.to_string(),
                isbn: isbn.to_string(),
                title: "Intro to Algebra".to_string(),
                author: None,
                publisher: None,
                edition: None,
                year: None,
            }),
        }
    }

    fn held(asset: AssetRecord) -> HeldAsset {
        HeldAsset {
            asset,
            issued_to: None,
            issuing_transaction: None,
        }
    }

    #[test]
    fn duplicate_isbn_is_rejected_across_distinct_copies() {
        let incoming = book("B002", "111", None);
        let already_held = vec![held(book("B001", "111", None))];

        assert_matches!(
            check_duplicate_book(&incoming, &already_held),
            Err(ServiceError::DuplicateBook { isbn }) if isbn == "111"
        );
    }

    #[test]
    fn different_isbn_passes_dedup() {
        let incoming = book("B002", "222", None);
        let already_held = vec![held(book("B001", "111", None))];

        assert!(check_duplicate_book(&incoming, &already_held).is_ok());
    }

    #[test]
    fn charge_limit_counts_only_same_type_assets() {
        let incoming = book("B003", "333", Some(2));
        let already_held = vec![
            held(book("B001", "111", Some(2))),
            held(book("B002", "222", Some(2))),
        ];

        assert_matches!(
            check_charge_limit(&incoming, &already_held),
            Err(ServiceError::ChargeLimitExceeded { limit: 2, .. })
        );

        let one_held = vec![held(book("B001", "111", Some(2)))];
        assert!(check_charge_limit(&incoming, &one_held).is_ok());
    }

    #[test]
    fn null_charge_limit_means_unlimited() {
        let incoming = book("B009", "999", None);
        let already_held: Vec<HeldAsset> = (0..50)
            .map(|i| held(book(&format!("B{i:03}"), &format!("{i}"), None)))
            .collect();

        assert!(check_charge_limit(&incoming, &already_held).is_ok());
    }
}
