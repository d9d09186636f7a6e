use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QuerySelect,
    RelationTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::entities::{
    employee, entity, incarcerated, issued_accessory, issued_asset, location, transaction, user,
    EntityType,
};
use crate::errors::ServiceError;
use crate::services::catalog::{AssetCatalogService, AssetRecord};

/// A fully-resolved holder: the base `entities` row plus variant attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub entity_id: i64,
    pub entity_type: EntityType,
    pub enabled: bool,
    pub detail: EntityDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityDetail {
    Incarcerated {
        person: user::Model,
        record: incarcerated::Model,
    },
    Employee {
        person: user::Model,
        record: employee::Model,
    },
    Location(location::Model),
}

impl EntityRecord {
    pub fn doc_number(&self) -> Option<&str> {
        match &self.detail {
            EntityDetail::Incarcerated { record, .. } => Some(&record.doc_number),
            _ => None,
        }
    }

    pub fn display_name(&self) -> String {
        match &self.detail {
            EntityDetail::Incarcerated { person, .. } | EntityDetail::Employee { person, .. } => {
                person.display_name()
            }
            EntityDetail::Location(location) => {
                let building = location.building.as_deref().unwrap_or("?");
                match &location.room_number {
                    Some(room) => format!("{building} {room}"),
                    None => building.to_string(),
                }
            }
        }
    }
}

/// An asset currently held by an entity. For accessories the holder and the
/// issuing transaction come from the live accessory link; ordinary assets
/// carry the link's transaction id as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeldAsset {
    pub asset: AssetRecord,
    pub issued_to: Option<i64>,
    pub issuing_transaction: Option<i64>,
}

/// Lookup side of the people/locations that can hold assets.
#[derive(Clone)]
pub struct EntityDirectoryService {
    db: Arc<DatabaseConnection>,
    catalog: AssetCatalogService,
}

impl EntityDirectoryService {
    pub fn new(db: Arc<DatabaseConnection>, catalog: AssetCatalogService) -> Self {
        Self { db, catalog }
    }

    /// Resolves an entity and its variant attributes by internal id.
    #[instrument(skip(self))]
    pub async fn lookup_by_id(&self, entity_id: i64) -> Result<EntityRecord, ServiceError> {
        let db = &*self.db;

        let base = entity::Entity::find_by_id(entity_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("entity {entity_id} not found")))?;

        self.resolve_detail(base).await
    }

    /// Resolves an incarcerated individual by DOC number, the identifier
    /// operators actually scan or type.
    #[instrument(skip(self))]
    pub async fn lookup_incarcerated_by_doc(
        &self,
        doc_number: &str,
    ) -> Result<EntityRecord, ServiceError> {
        let db = &*self.db;

        let record = incarcerated::Entity::find()
            .filter(incarcerated::Column::DocNumber.eq(doc_number))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "no incarcerated individual with DOC number '{doc_number}'"
                ))
            })?;

        self.lookup_by_id(record.entity_id).await
    }

    /// Everything the entity currently holds: ordinary assets via the
    /// `issued_assets` link joined through the ledger, plus accessories via
    /// the accessory link table. Eagerly materialized; empty when nothing
    /// is held.
    #[instrument(skip(self))]
    pub async fn list_issued_assets(&self, entity_id: i64) -> Result<Vec<HeldAsset>, ServiceError> {
        let db = &*self.db;
        let mut held = Vec::new();

        let ordinary = issued_asset::Entity::find()
            .join(JoinType::InnerJoin, issued_asset::Relation::Transaction.def())
            .filter(transaction::Column::EntityId.eq(entity_id))
            .all(db)
            .await?;

        for link in ordinary {
            match self.catalog.lookup_by_id(&link.asset_id).await? {
                Some(asset) => held.push(HeldAsset {
                    asset,
                    issued_to: Some(entity_id),
                    issuing_transaction: Some(link.transaction_id),
                }),
                None => warn!(
                    asset_id = %link.asset_id,
                    "issued asset no longer resolves in the catalog"
                ),
            }
        }

        let accessories = issued_accessory::Entity::find()
            .filter(issued_accessory::Column::EntityId.eq(entity_id))
            .all(db)
            .await?;

        for link in accessories {
            match self.catalog.lookup_by_id(&link.asset_id).await? {
                Some(asset) => held.push(HeldAsset {
                    asset,
                    issued_to: Some(link.entity_id),
                    issuing_transaction: Some(link.transaction_id),
                }),
                None => warn!(
                    asset_id = %link.asset_id,
                    "issued accessory no longer resolves in the catalog"
                ),
            }
        }

        Ok(held)
    }

    async fn resolve_detail(&self, base: entity::Model) -> Result<EntityRecord, ServiceError> {
        let db = &*self.db;
        let entity_id = base.entity_id;

        let detail = match base.entity_type {
            EntityType::Incarcerated => {
                let person = user::Entity::find_by_id(entity_id).one(db).await?;
                let record = incarcerated::Entity::find_by_id(entity_id).one(db).await?;
                match (person, record) {
                    (Some(person), Some(record)) => EntityDetail::Incarcerated { person, record },
                    _ => {
                        return Err(ServiceError::NotFound(format!(
                            "incarcerated entity {entity_id} is missing its variant rows"
                        )))
                    }
                }
            }
            EntityType::Employee => {
                let person = user::Entity::find_by_id(entity_id).one(db).await?;
                let record = employee::Entity::find_by_id(entity_id).one(db).await?;
                match (person, record) {
                    (Some(person), Some(record)) => EntityDetail::Employee { person, record },
                    _ => {
                        return Err(ServiceError::NotFound(format!(
                            "employee entity {entity_id} is missing its variant rows"
                        )))
                    }
                }
            }
            EntityType::Location => {
                let record = location::Entity::find_by_id(entity_id)
                    .one(db)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!(
                            "location entity {entity_id} is missing its variant row"
                        ))
                    })?;
                EntityDetail::Location(record)
            }
        };

        Ok(EntityRecord {
            entity_id: base.entity_id,
            entity_type: base.entity_type,
            enabled: base.enabled,
            detail,
        })
    }
}
