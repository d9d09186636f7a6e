use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::entities::{
    asset, asset_type, book, calculator, laptop, AssetStatus, AssetType,
};
use crate::errors::ServiceError;

/// A fully-resolved loanable item: the base `assets` row joined with its
/// per-type charge limit and variant attributes, flattened into one struct
/// with a tagged detail payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub asset_id: String,
    pub asset_type: AssetType,
    pub charge_limit: Option<i32>,
    pub asset_cost: Option<Decimal>,
    pub asset_status: AssetStatus,
    pub detail: AssetDetail,
}

/// Variant attributes per asset type. Chargers and headphones carry no
/// attributes of their own; their holder linkage is derived from the
/// accessory link table, not stored on the asset row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssetDetail {
    Laptop(laptop::Model),
    Book(book::Model),
    Calculator(calculator::Model),
    Accessory,
}

impl AssetRecord {
    /// ISBN for book copies; the duplicate-detection key at issuance time.
    pub fn isbn(&self) -> Option<&str> {
        match &self.detail {
            AssetDetail::Book(book) => Some(&book.isbn),
            _ => None,
        }
    }

    pub fn is_accessory(&self) -> bool {
        self.asset_type.is_accessory()
    }

    pub fn is_returnable(&self) -> bool {
        self.asset_type.is_returnable()
    }

    /// Operator-facing name: model for hardware, title for books, falling
    /// back to `id / type` for accessories.
    pub fn display_name(&self) -> String {
        match &self.detail {
            AssetDetail::Laptop(laptop) => laptop.model.clone(),
            AssetDetail::Book(book) => book.title.clone(),
            AssetDetail::Calculator(calculator) => calculator.model.clone(),
            AssetDetail::Accessory => format!("{} / {}", self.asset_id, self.asset_type),
        }
    }
}

/// Read-side catalog over the `assets` table and its variant tables.
#[derive(Clone)]
pub struct AssetCatalogService {
    db: Arc<DatabaseConnection>,
}

impl AssetCatalogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Looks up an asset by its barcode and resolves the concrete variant.
    ///
    /// Fails softly: a missing row, an unrecognized stored type string, or a
    /// missing variant row all yield `Ok(None)`. Callers must reject `None`
    /// explicitly before issuing.
    #[instrument(skip(self))]
    pub async fn lookup_by_id(&self, asset_id: &str) -> Result<Option<AssetRecord>, ServiceError> {
        let db = &*self.db;

        let Some(base) = asset::Entity::find_by_id(asset_id.to_owned()).one(db).await? else {
            return Ok(None);
        };

        let Some(kind) = AssetType::from_str(&base.asset_type) else {
            warn!(
                asset_id,
                asset_type = %base.asset_type,
                "asset row has unrecognized type; treating as lookup miss"
            );
            return Ok(None);
        };

        let charge_limit = asset_type::Entity::find_by_id(base.asset_type.clone())
            .one(db)
            .await?
            .and_then(|row| row.charge_limit);

        let detail = match kind {
            AssetType::Laptop => {
                match laptop::Entity::find_by_id(asset_id.to_owned()).one(db).await? {
                    Some(row) => AssetDetail::Laptop(row),
                    None => {
                        warn!(asset_id, "laptop asset is missing its variant row");
                        return Ok(None);
                    }
                }
            }
            AssetType::Book => {
                match book::Entity::find_by_id(asset_id.to_owned()).one(db).await? {
                    Some(row) => AssetDetail::Book(row),
                    None => {
                        warn!(asset_id, "book asset is missing its variant row");
                        return Ok(None);
                    }
                }
            }
            AssetType::Calculator => {
                match calculator::Entity::find_by_id(asset_id.to_owned()).one(db).await? {
                    Some(row) => AssetDetail::Calculator(row),
                    None => {
                        warn!(asset_id, "calculator asset is missing its variant row");
                        return Ok(None);
                    }
                }
            }
            AssetType::Charger | AssetType::Headphones => AssetDetail::Accessory,
        };

        Ok(Some(AssetRecord {
            asset_id: base.asset_id,
            asset_type: kind,
            charge_limit,
            asset_cost: base.asset_cost,
            asset_status: base.asset_status,
            detail,
        }))
    }
}
