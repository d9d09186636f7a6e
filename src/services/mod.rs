//! The five engines of the asset core, as service structs over a shared
//! connection pool. `Services::new` wires them together.

pub mod catalog;
pub mod directory;
pub mod documents;
pub mod issuance;
pub mod ledger;
pub mod returns;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::events::EventSender;

pub use catalog::{AssetCatalogService, AssetDetail, AssetRecord};
pub use directory::{EntityDetail, EntityDirectoryService, EntityRecord, HeldAsset};
pub use documents::{AgreementPrintOutcome, DocumentService, OutstandingDocuments};
pub use issuance::{IssuanceReceipt, IssuanceService};
pub use ledger::{HistoryEntry, LedgerService};
pub use returns::{ChargerReturn, ReturnReceipt, ReturnService};

/// All services wired over one connection pool and event channel.
#[derive(Clone)]
pub struct Services {
    pub catalog: AssetCatalogService,
    pub directory: EntityDirectoryService,
    pub ledger: LedgerService,
    pub documents: DocumentService,
    pub issuance: IssuanceService,
    pub returns: ReturnService,
}

impl Services {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        let catalog = AssetCatalogService::new(db.clone());
        let directory = EntityDirectoryService::new(db.clone(), catalog.clone());
        let ledger = LedgerService::new(db.clone());
        let documents = DocumentService::new(db.clone(), event_sender.clone());
        let issuance = IssuanceService::new(
            db.clone(),
            catalog.clone(),
            directory.clone(),
            ledger.clone(),
            documents.clone(),
            event_sender.clone(),
        );
        let returns = ReturnService::new(db, catalog.clone(), ledger.clone(), event_sender);

        Self {
            catalog,
            directory,
            ledger,
            documents,
            issuance,
            returns,
        }
    }
}
