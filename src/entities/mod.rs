//! sea-orm entities for the asset-program schema.
//!
//! Reference tables (`entities`, `assets` and their variant tables) are
//! long-lived CRUD data; `transactions` is append-only; `issued_assets` and
//! `issued_accessories` are the live-holder indexes whose presence defines
//! "currently issued".

pub mod asset;
pub mod asset_type;
pub mod book;
pub mod calculator;
pub mod document;
pub mod employee;
pub mod entity;
pub mod incarcerated;
pub mod issued_accessory;
pub mod issued_asset;
pub mod laptop;
pub mod location;
pub mod transaction;
pub mod transaction_document;
pub mod user;

pub use asset::{AssetStatus, AssetType};
pub use document::DocumentType;
pub use entity::EntityType;
pub use transaction::TransactionType;
