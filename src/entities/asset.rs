use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Base row for every loanable item. Variant attributes live in the
/// per-type tables (`laptops`, `books`, `calculators`) keyed by `asset_id`;
/// chargers and headphones have no variant table of their own.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub asset_id: String,
    // Stored as a string; converted through AssetType so an unknown
    // discriminator degrades to a soft lookup miss instead of a decode error.
    pub asset_type: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub asset_cost: Option<Decimal>,
    pub asset_status: AssetStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::asset_type::Entity",
        from = "Column::AssetType",
        to = "super::asset_type::Column::AssetType"
    )]
    AssetType,
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::asset_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetType.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Asset discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    Laptop,
    Book,
    Calculator,
    Charger,
    Headphones,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Laptop => "LAPTOP",
            AssetType::Book => "BOOK",
            AssetType::Calculator => "CALCULATOR",
            AssetType::Charger => "CHARGER",
            AssetType::Headphones => "HEADPHONES",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "LAPTOP" => Some(AssetType::Laptop),
            "BOOK" => Some(AssetType::Book),
            "CALCULATOR" => Some(AssetType::Calculator),
            "CHARGER" => Some(AssetType::Charger),
            "HEADPHONES" => Some(AssetType::Headphones),
            _ => None,
        }
    }

    /// Chargers and headphones are tracked per holder rather than per unit.
    pub fn is_accessory(&self) -> bool {
        matches!(self, AssetType::Charger | AssetType::Headphones)
    }

    /// Headphones are non-returnable by policy; everything else comes back.
    pub fn is_returnable(&self) -> bool {
        !matches!(self, AssetType::Headphones)
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service status of an asset. Only `IN_SERVICE` assets may be issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AssetStatus {
    #[sea_orm(string_value = "IN_SERVICE")]
    InService,
    #[sea_orm(string_value = "DECOMMISSIONED")]
    Decommissioned,
    #[sea_orm(string_value = "BROKEN")]
    Broken,
    #[sea_orm(string_value = "MISSING")]
    Missing,
    #[sea_orm(string_value = "OUT_FOR_REPAIR")]
    OutForRepair,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::InService => "IN_SERVICE",
            AssetStatus::Decommissioned => "DECOMMISSIONED",
            AssetStatus::Broken => "BROKEN",
            AssetStatus::Missing => "MISSING",
            AssetStatus::OutForRepair => "OUT_FOR_REPAIR",
        }
    }

    /// Operator-facing phrasing for issuance refusals.
    pub fn describe(&self) -> &'static str {
        match self {
            AssetStatus::InService => "in service",
            AssetStatus::Decommissioned => "marked as decommissioned",
            AssetStatus::Broken => "marked as broken",
            AssetStatus::Missing => "marked as missing",
            AssetStatus::OutForRepair => "marked as out for repair",
        }
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_type_round_trips_through_strings() {
        for kind in [
            AssetType::Laptop,
            AssetType::Book,
            AssetType::Calculator,
            AssetType::Charger,
            AssetType::Headphones,
        ] {
            assert_eq!(AssetType::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(AssetType::from_str("TELESCOPE"), None);
    }

    #[test]
    fn only_headphones_are_non_returnable() {
        assert!(AssetType::Laptop.is_returnable());
        assert!(AssetType::Book.is_returnable());
        assert!(AssetType::Calculator.is_returnable());
        assert!(AssetType::Charger.is_returnable());
        assert!(!AssetType::Headphones.is_returnable());
    }
}
