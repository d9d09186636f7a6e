//! Shared harness for spinning up the services against a fresh
//! tempfile-backed SQLite database with migrations applied.

// Each integration binary compiles its own copy of this module and none of
// them uses every helper.
#![allow(dead_code)]

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;

use edu_asset_core::{
    config::AppConfig,
    db,
    entities::{
        asset, asset_type, book, calculator, entity, incarcerated, laptop, user, AssetStatus,
        AssetType, EntityType,
    },
    events::{process_events, EventSender},
    services::Services,
};

pub struct TestApp {
    pub services: Services,
    pub db: Arc<DatabaseConnection>,
    _event_task: tokio::task::JoinHandle<()>,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = db_dir.path().join("edu_assets_test.db");

        let mut cfg = AppConfig::new(format!("sqlite://{}?mode=rwc", db_path.display()));
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool).await.expect("migrations failed");

        let db = Arc::new(pool);
        let (tx, rx) = mpsc::channel(100);
        let sender = EventSender::new(tx);
        let event_task = tokio::spawn(process_events(rx));

        let services = Services::new(db.clone(), sender);

        Self {
            services,
            db,
            _event_task: event_task,
            _db_dir: db_dir,
        }
    }

    /// Inserts an asset-type policy row if it does not exist yet.
    pub async fn ensure_asset_type(&self, kind: AssetType, charge_limit: Option<i32>) {
        let existing = asset_type::Entity::find_by_id(kind.as_str().to_owned())
            .one(&*self.db)
            .await
            .expect("asset_types query failed");

        if existing.is_none() {
            asset_type::ActiveModel {
                asset_type: Set(kind.as_str().to_owned()),
                charge_limit: Set(charge_limit),
            }
            .insert(&*self.db)
            .await
            .expect("failed to insert asset type");
        }
    }

    /// Creates an incarcerated individual and returns the new entity id.
    pub async fn create_incarcerated(&self, doc_number: &str, last: &str, first: &str) -> i64 {
        let base = entity::ActiveModel {
            entity_type: Set(EntityType::Incarcerated),
            enabled: Set(true),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .expect("failed to insert entity");

        user::ActiveModel {
            entity_id: Set(base.entity_id),
            last_name: Set(last.to_owned()),
            first_name: Set(first.to_owned()),
            middle_name: Set(None),
        }
        .insert(&*self.db)
        .await
        .expect("failed to insert user");

        incarcerated::ActiveModel {
            entity_id: Set(base.entity_id),
            doc_number: Set(doc_number.to_owned()),
            facility: Set(Some("GHC".to_owned())),
            housing_unit: Set(None),
            housing_cell: Set(None),
            estimated_release_date: Set(None),
            counselor: Set(None),
            hs_diploma: Set(None),
        }
        .insert(&*self.db)
        .await
        .expect("failed to insert incarcerated");

        base.entity_id
    }

    async fn insert_base_asset(&self, asset_id: &str, kind: AssetType) {
        asset::ActiveModel {
            asset_id: Set(asset_id.to_owned()),
            asset_type: Set(kind.as_str().to_owned()),
            asset_cost: Set(None),
            asset_status: Set(AssetStatus::InService),
        }
        .insert(&*self.db)
        .await
        .expect("failed to insert asset");
    }

    pub async fn create_laptop(&self, asset_id: &str, model: &str) {
        self.insert_base_asset(asset_id, AssetType::Laptop).await;

        laptop::ActiveModel {
            asset_id: Set(asset_id.to_owned()),
            model: Set(model.to_owned()),
            serial_number: Set(format!("SN-{asset_id}")),
            drive_serial_number: Set(None),
            manufacturer: Set("HP".to_owned()),
            ram: Set(Some("8 GB".to_owned())),
            cpu: Set(None),
            storage: Set(None),
            bios_version: Set(None),
        }
        .insert(&*self.db)
        .await
        .expect("failed to insert laptop");
    }

    pub async fn create_book(&self, asset_id: &str, isbn: &str, title: &str) {
        self.insert_base_asset(asset_id, AssetType::Book).await;

        book::ActiveModel {
            asset_id: Set(asset_id.to_owned()),
            isbn: Set(isbn.to_owned()),
            title: Set(title.to_owned()),
            author: Set(None),
            publisher: Set(None),
            edition: Set(None),
            year: Set(None),
        }
        .insert(&*self.db)
        .await
        .expect("failed to insert book");
    }

    pub async fn create_calculator(&self, asset_id: &str, model: &str) {
        self.insert_base_asset(asset_id, AssetType::Calculator).await;

        calculator::ActiveModel {
            asset_id: Set(asset_id.to_owned()),
            model: Set(model.to_owned()),
            serial_number: Set(format!("SN-{asset_id}")),
            manufacturer: Set(Some("Texas Instruments".to_owned())),
            manufacturer_date_code: Set(None),
            color: Set(None),
        }
        .insert(&*self.db)
        .await
        .expect("failed to insert calculator");
    }

    /// Creates a charger or headphones row; accessories have no variant table.
    pub async fn create_accessory(&self, asset_id: &str, kind: AssetType) {
        assert!(kind.is_accessory(), "{kind} is not an accessory type");
        self.insert_base_asset(asset_id, kind).await;
    }

    pub async fn set_asset_status(&self, asset_id: &str, status: AssetStatus) {
        let existing = asset::Entity::find_by_id(asset_id.to_owned())
            .one(&*self.db)
            .await
            .expect("assets query failed")
            .expect("asset not found");

        let mut active: asset::ActiveModel = existing.into();
        active.asset_status = Set(status);
        active.update(&*self.db).await.expect("failed to update asset");
    }
}
