use sea_orm::error::DbErr;
use thiserror::Error;

use crate::entities::{AssetStatus, AssetType};
use crate::printing::PrintingError;

/// Infrastructure-level failures (connections, migrations, configuration).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Domain-level failures from the directory, catalog, ledger, and engines.
///
/// Every variant except `DatabaseError` and `TransactionFailed` is a
/// validation outcome: nothing has been written, the operator sees the
/// message and the flow loops back to a prompt.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid barcode '{0}': check digit mismatch")]
    InvalidBarcode(String),

    #[error("asset not found for barcode '{0}'")]
    AssetNotFound(String),

    #[error("asset '{} / {}' is {}", .asset_type, .asset_id, .status.describe())]
    AssetUnavailable {
        asset_id: String,
        asset_type: AssetType,
        status: AssetStatus,
    },

    #[error("asset '{asset_id}' is currently issued to entity {holder_entity_id}")]
    AlreadyIssuedToOther {
        asset_id: String,
        holder_entity_id: i64,
    },

    #[error("asset '{asset_id}' is already charged to the selected entity")]
    AlreadyIssuedToSelf { asset_id: String },

    #[error("a book with ISBN {isbn} is already issued to the selected entity")]
    DuplicateBook { isbn: String },

    #[error("entity already holds the maximum number of {asset_type} assets (limit {limit})")]
    ChargeLimitExceeded { asset_type: AssetType, limit: i32 },

    #[error("asset '{asset_id}' is not currently issued: {detail}")]
    NotCurrentlyIssued { asset_id: String, detail: String },

    #[error("asset '{asset_id}' is not returnable")]
    NonReturnable { asset_id: String },

    #[error("transaction failed: {0}")]
    TransactionFailed(#[source] DbErr),

    #[error("document collaborator error: {0}")]
    Collaborator(#[from] PrintingError),
}

impl ServiceError {
    /// Wraps a storage failure that happened inside a multi-step write.
    /// The in-flight transaction has already been rolled back by drop.
    pub fn transaction_failed(err: DbErr) -> Self {
        ServiceError::TransactionFailed(err)
    }

    /// Validation errors leave no state behind and the operator loop simply
    /// continues; storage and collaborator failures are worth escalating.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ServiceError::DatabaseError(_)
                | ServiceError::TransactionFailed(_)
                | ServiceError::Collaborator(_)
        )
    }
}
