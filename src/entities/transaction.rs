use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// One immutable ledger entry. Rows are only ever inserted; current state is
/// derived from the live link tables plus the latest row per asset.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub transaction_id: i64,
    pub entity_id: i64,
    pub asset_id: String,
    pub transaction_type: TransactionType,
    pub transaction_timestamp: DateTime<Utc>,
    pub transaction_user: String,
    #[sea_orm(nullable)]
    pub transaction_notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::entity::Entity",
        from = "Column::EntityId",
        to = "super::entity::Column::EntityId"
    )]
    Entity,
    #[sea_orm(
        belongs_to = "super::asset::Entity",
        from = "Column::AssetId",
        to = "super::asset::Column::AssetId"
    )]
    Asset,
    #[sea_orm(
        belongs_to = "super::incarcerated::Entity",
        from = "Column::EntityId",
        to = "super::incarcerated::Column::EntityId"
    )]
    Incarcerated,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::EntityId",
        to = "super::user::Column::EntityId"
    )]
    User,
    #[sea_orm(has_many = "super::transaction_document::Entity")]
    TransactionDocuments,
}

impl Related<super::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entity.def()
    }
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
    }
}

impl Related<super::transaction_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionDocuments.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    // Timestamp assignment happens here rather than in a DB default so the
    // SQLite and Postgres backends behave identically.
    async fn before_save<C: ConnectionTrait>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        if let ActiveValue::NotSet = active_model.transaction_timestamp {
            active_model.transaction_timestamp = Set(Utc::now());
        }
        Ok(active_model)
    }
}

/// State-changing event kinds recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TransactionType {
    #[sea_orm(string_value = "ISSUED")]
    Issued,
    #[sea_orm(string_value = "RETURNED")]
    Returned,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Issued => "ISSUED",
            TransactionType::Returned => "RETURNED",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
