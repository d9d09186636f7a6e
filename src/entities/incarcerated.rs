use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Incarcerated-individual attributes. The DOC number is the operator-facing
/// identifier and is unique; `entity_id` stays internal.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incarcerated")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub entity_id: i64,
    #[sea_orm(unique)]
    pub doc_number: String,
    #[sea_orm(nullable)]
    pub facility: Option<String>,
    #[sea_orm(nullable)]
    pub housing_unit: Option<String>,
    #[sea_orm(nullable)]
    pub housing_cell: Option<String>,
    #[sea_orm(nullable)]
    pub estimated_release_date: Option<Date>,
    #[sea_orm(nullable)]
    pub counselor: Option<String>,
    #[sea_orm(nullable)]
    pub hs_diploma: Option<bool>,
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
        belongs_to = "super::user::Entity",
        from = "Column::EntityId",
        to = "super::user::Column::EntityId"
    )]
    User,
}

impl Related<super::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entity.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
