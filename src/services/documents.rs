use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    JoinType, QueryFilter, QuerySelect, RelationTrait, Set,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::entities::{document, transaction, transaction_document, DocumentType};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::printing::{DocumentRenderer, SignatureCapture};
use crate::services::catalog::AssetRecord;
use crate::services::directory::EntityRecord;

/// Unprinted paperwork owed for an entity's transactions. At most one
/// agreement is ever outstanding (issuances share it for batched signing);
/// each laptop issuance owes its own labels sheet.
#[derive(Debug, Clone)]
pub struct OutstandingDocuments {
    pub agreement: Option<document::Model>,
    pub labels: Vec<document::Model>,
}

/// Outcome of the sign-and-print collaboration.
#[derive(Debug, Clone, PartialEq)]
pub enum AgreementPrintOutcome {
    Printed {
        document_id: i64,
        file_path: PathBuf,
    },
    /// Operator abandoned signature capture; nothing was written.
    Abandoned,
    /// No unprinted agreement exists for this entity.
    NothingOutstanding,
}

/// Tracks which paperwork is owed per transaction and marks it fulfilled.
/// Rendering and printing themselves happen behind the collaborator traits.
#[derive(Clone)]
pub struct DocumentService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl DocumentService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Reuses the entity's outstanding unprinted agreement or creates one,
    /// then links the transaction to it. Runs inside the issuance write so
    /// a failed issue leaves no dangling document.
    pub(crate) async fn ensure_agreement<C: ConnectionTrait>(
        &self,
        db: &C,
        entity_id: i64,
        transaction_id: i64,
    ) -> Result<i64, DbErr> {
        let existing = document::Entity::find()
            .join(
                JoinType::InnerJoin,
                document::Relation::TransactionDocuments.def(),
            )
            .join(
                JoinType::InnerJoin,
                transaction_document::Relation::Transaction.def(),
            )
            .filter(transaction::Column::EntityId.eq(entity_id))
            .filter(document::Column::DocumentType.eq(DocumentType::Agreement))
            .filter(document::Column::DocumentPrintedTimestamp.is_null())
            .one(db)
            .await?;

        let document_id = match existing {
            Some(agreement) => agreement.document_id,
            None => {
                let created = document::ActiveModel {
                    document_type: Set(DocumentType::Agreement),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                created.document_id
            }
        };

        transaction_document::ActiveModel {
            transaction_id: Set(transaction_id),
            document_id: Set(document_id),
        }
        .insert(db)
        .await?;

        Ok(document_id)
    }

    /// Creates a fresh LABELS document linked to a laptop's issuing
    /// transaction. Labels are never shared across transactions.
    pub(crate) async fn create_labels<C: ConnectionTrait>(
        &self,
        db: &C,
        transaction_id: i64,
    ) -> Result<i64, DbErr> {
        let created = document::ActiveModel {
            document_type: Set(DocumentType::Labels),
            ..Default::default()
        }
        .insert(db)
        .await?;

        transaction_document::ActiveModel {
            transaction_id: Set(transaction_id),
            document_id: Set(created.document_id),
        }
        .insert(db)
        .await?;

        Ok(created.document_id)
    }

    /// All unprinted documents linked to the entity's transactions.
    #[instrument(skip(self))]
    pub async fn outstanding(&self, entity_id: i64) -> Result<OutstandingDocuments, ServiceError> {
        let unprinted = document::Entity::find()
            .join(
                JoinType::InnerJoin,
                document::Relation::TransactionDocuments.def(),
            )
            .join(
                JoinType::InnerJoin,
                transaction_document::Relation::Transaction.def(),
            )
            .filter(transaction::Column::EntityId.eq(entity_id))
            .filter(document::Column::DocumentPrintedTimestamp.is_null())
            .distinct()
            .all(&*self.db)
            .await?;

        let mut agreement = None;
        let mut labels = Vec::new();
        for doc in unprinted {
            match doc.document_type {
                DocumentType::Agreement => agreement = Some(doc),
                DocumentType::Labels => labels.push(doc),
            }
        }

        Ok(OutstandingDocuments { agreement, labels })
    }

    /// Records a document as printed (and optionally signed). Idempotent:
    /// re-running overwrites the timestamps and file name, last write wins.
    #[instrument(skip(self))]
    pub async fn mark_printed(
        &self,
        document_id: i64,
        file_name: &str,
        printed_at: DateTime<Utc>,
        signed_at: Option<DateTime<Utc>>,
    ) -> Result<document::Model, ServiceError> {
        let doc = document::Entity::find_by_id(document_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("document {document_id} not found")))?;

        let mut active: document::ActiveModel = doc.into();
        active.document_printed_timestamp = Set(Some(printed_at));
        active.document_signed_timestamp = Set(signed_at);
        active.document_file_name = Set(Some(file_name.to_owned()));

        let updated = active.update(&*self.db).await?;
        Ok(updated)
    }

    /// The full sign-and-print collaboration for an entity's outstanding
    /// agreement: capture a signature, render the PDF, record the document
    /// as printed and signed, then dispatch it to the printer.
    ///
    /// Abandoned capture leaves zero state behind — the agreement stays
    /// outstanding for the next batch.
    #[instrument(skip(self, signature_pad, renderer, held_assets))]
    pub async fn capture_and_print_agreement(
        &self,
        entity: &EntityRecord,
        held_assets: &[AssetRecord],
        signature_pad: &dyn SignatureCapture,
        renderer: &dyn DocumentRenderer,
    ) -> Result<AgreementPrintOutcome, ServiceError> {
        let outstanding = self.outstanding(entity.entity_id).await?;
        let Some(agreement) = outstanding.agreement else {
            return Ok(AgreementPrintOutcome::NothingOutstanding);
        };

        let Some(signature) = signature_pad.request_signature(entity, held_assets).await? else {
            info!(
                entity_id = entity.entity_id,
                "signature capture abandoned; agreement left outstanding"
            );
            return Ok(AgreementPrintOutcome::Abandoned);
        };

        let now = Utc::now();
        let holder_key = match entity.doc_number() {
            Some(doc) => doc.to_string(),
            None => entity.entity_id.to_string(),
        };
        let file_name = format!("{}_{}.pdf", holder_key, now.format("%Y%m%d%H%M%S"));

        let file_path = renderer
            .render_agreement(entity, held_assets, &signature, &file_name)
            .await?;

        self.mark_printed(agreement.document_id, &file_name, now, Some(now))
            .await?;

        renderer.print(&file_path).await?;

        self.event_sender
            .send_or_log(Event::DocumentPrinted {
                document_id: agreement.document_id,
                file_name: file_name.clone(),
            })
            .await;

        info!(
            entity_id = entity.entity_id,
            document_id = agreement.document_id,
            file_name = %file_name,
            "agreement printed"
        );

        Ok(AgreementPrintOutcome::Printed {
            document_id: agreement.document_id,
            file_path,
        })
    }

    /// Marks every outstanding LABELS document for the entity as printed.
    /// Returns the ids that were fulfilled.
    #[instrument(skip(self))]
    pub async fn mark_labels_printed(&self, entity_id: i64) -> Result<Vec<i64>, ServiceError> {
        let outstanding = self.outstanding(entity_id).await?;
        let now = Utc::now();
        let mut printed = Vec::new();

        for labels in outstanding.labels {
            let file_name = format!("labels_{}.pdf", labels.document_id);
            self.mark_printed(labels.document_id, &file_name, now, Some(now))
                .await?;
            printed.push(labels.document_id);
        }

        Ok(printed)
    }
}
