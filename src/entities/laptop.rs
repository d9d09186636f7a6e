use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "laptops")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub asset_id: String,
    pub model: String,
    pub serial_number: String,
    #[sea_orm(nullable)]
    pub drive_serial_number: Option<String>,
    pub manufacturer: String,
    #[sea_orm(nullable)]
    pub ram: Option<String>,
    #[sea_orm(nullable)]
    pub cpu: Option<String>,
    #[sea_orm(nullable)]
    pub storage: Option<String>,
    #[sea_orm(nullable)]
    pub bios_version: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::asset::Entity",
        from = "Column::AssetId",
        to = "super::asset::Column::AssetId"
    )]
    Asset,
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
