use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use crate::entities::{
    asset, incarcerated, issued_accessory, issued_asset, transaction, user, TransactionType,
};
use crate::errors::ServiceError;

/// One ledger row joined with asset and holder display fields, for the
/// transaction-history views.
#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct HistoryEntry {
    pub transaction_id: i64,
    pub transaction_type: TransactionType,
    pub transaction_timestamp: DateTime<Utc>,
    pub entity_id: i64,
    pub asset_id: String,
    pub transaction_user: String,
    pub asset_type: Option<String>,
    pub doc_number: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
}

/// Append-only transaction ledger plus the live-holder indexes derived
/// from it. State is never updated in place: "currently issued" is the
/// presence of a link row, and diagnostics come from the latest ledger row.
#[derive(Clone)]
pub struct LedgerService {
    db: Arc<DatabaseConnection>,
}

impl LedgerService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Appends a ledger row inside the caller's storage transaction. The
    /// timestamp is assigned on insert; the id comes back from the database.
    pub async fn record<C: ConnectionTrait>(
        &self,
        db: &C,
        entity_id: i64,
        asset_id: &str,
        transaction_type: TransactionType,
        actor: &str,
        notes: Option<String>,
    ) -> Result<i64, DbErr> {
        let row = transaction::ActiveModel {
            entity_id: Set(entity_id),
            asset_id: Set(asset_id.to_owned()),
            transaction_type: Set(transaction_type),
            transaction_user: Set(actor.to_owned()),
            transaction_notes: Set(notes),
            ..Default::default()
        };

        let inserted = row.insert(db).await?;
        Ok(inserted.transaction_id)
    }

    /// The ISSUED transaction an ordinary asset is currently out under, via
    /// the live `issued_assets` link. A RETURNED row after it would have
    /// deleted the link, so this is not merely "most recent ISSUED".
    #[instrument(skip(self))]
    pub async fn current_holder(
        &self,
        asset_id: &str,
    ) -> Result<Option<transaction::Model>, ServiceError> {
        let db = &*self.db;

        let Some(link) = issued_asset::Entity::find_by_id(asset_id.to_owned()).one(db).await?
        else {
            return Ok(None);
        };

        let issued = transaction::Entity::find_by_id(link.transaction_id)
            .one(db)
            .await?;

        Ok(issued)
    }

    /// The live accessory link for one (asset, holder) pair.
    #[instrument(skip(self))]
    pub async fn accessory_link(
        &self,
        asset_id: &str,
        entity_id: i64,
    ) -> Result<Option<issued_accessory::Model>, ServiceError> {
        let link = issued_accessory::Entity::find_by_id((asset_id.to_owned(), entity_id))
            .one(&*self.db)
            .await?;

        Ok(link)
    }

    /// Every live accessory link for an asset id. The issuance engine uses
    /// this to keep one physical accessory from being live-issued to two
    /// holders even though the link table is pair-keyed.
    #[instrument(skip(self))]
    pub async fn live_accessory_links(
        &self,
        asset_id: &str,
    ) -> Result<Vec<issued_accessory::Model>, ServiceError> {
        let links = issued_accessory::Entity::find()
            .filter(issued_accessory::Column::AssetId.eq(asset_id))
            .all(&*self.db)
            .await?;

        Ok(links)
    }

    /// The most recent transaction for an asset regardless of link state.
    /// Used to explain why a return was refused ("was RETURNED at ... by ...").
    #[instrument(skip(self))]
    pub async fn latest(&self, asset_id: &str) -> Result<Option<transaction::Model>, ServiceError> {
        let latest = transaction::Entity::find()
            .filter(transaction::Column::AssetId.eq(asset_id))
            .order_by_desc(transaction::Column::TransactionId)
            .one(&*self.db)
            .await?;

        Ok(latest)
    }

    /// Full history for one asset, ascending by transaction id.
    #[instrument(skip(self))]
    pub async fn history_for_asset(
        &self,
        asset_id: &str,
    ) -> Result<Vec<HistoryEntry>, ServiceError> {
        self.history(transaction::Column::AssetId.eq(asset_id))
            .await
    }

    /// Full history for one entity, ascending by transaction id.
    #[instrument(skip(self))]
    pub async fn history_for_entity(
        &self,
        entity_id: i64,
    ) -> Result<Vec<HistoryEntry>, ServiceError> {
        self.history(transaction::Column::EntityId.eq(entity_id))
            .await
    }

    async fn history(
        &self,
        filter: sea_orm::sea_query::SimpleExpr,
    ) -> Result<Vec<HistoryEntry>, ServiceError> {
        let rows = transaction::Entity::find()
            .select_only()
            .column(transaction::Column::TransactionId)
            .column(transaction::Column::TransactionType)
            .column(transaction::Column::TransactionTimestamp)
            .column(transaction::Column::EntityId)
            .column(transaction::Column::AssetId)
            .column(transaction::Column::TransactionUser)
            .column_as(asset::Column::AssetType, "asset_type")
            .column_as(incarcerated::Column::DocNumber, "doc_number")
            .column_as(user::Column::LastName, "last_name")
            .column_as(user::Column::FirstName, "first_name")
            .column_as(user::Column::MiddleName, "middle_name")
            .join(JoinType::LeftJoin, transaction::Relation::Asset.def())
            .join(JoinType::LeftJoin, transaction::Relation::Incarcerated.def())
            .join(JoinType::LeftJoin, transaction::Relation::User.def())
            .filter(filter)
            .order_by_asc(transaction::Column::TransactionId)
            .into_model::<HistoryEntry>()
            .all(&*self.db)
            .await?;

        Ok(rows)
    }
}
