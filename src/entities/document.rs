use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A printable artifact owed for one or more transactions. Created unprinted
/// at issuance; the timestamps and file name are filled in once rendering
/// and printing succeed. Rows are updated, never re-created.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub document_id: i64,
    pub document_type: DocumentType,
    #[sea_orm(nullable)]
    pub document_printed_timestamp: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub document_signed_timestamp: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub document_file_name: Option<String>,
}

impl Model {
    pub fn is_printed(&self) -> bool {
        self.document_printed_timestamp.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transaction_document::Entity")]
    TransactionDocuments,
}

impl Related<super::transaction_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionDocuments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Paperwork kinds tracked per transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum DocumentType {
    #[sea_orm(string_value = "AGREEMENT")]
    Agreement,
    #[sea_orm(string_value = "LABELS")]
    Labels,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Agreement => "AGREEMENT",
            DocumentType::Labels => "LABELS",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
