use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_entity_tables::Migration),
            Box::new(m20240101_000002_create_asset_tables::Migration),
            Box::new(m20240101_000003_create_ledger_tables::Migration),
            Box::new(m20240101_000004_create_document_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_entity_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_entity_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Entities::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Entities::EntityId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Entities::EntityType).string().not_null())
                        .col(
                            ColumnDef::new(Entities::Enabled)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::EntityId)
                                .big_integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Users::LastName).string().not_null())
                        .col(ColumnDef::new(Users::FirstName).string().not_null())
                        .col(ColumnDef::new(Users::MiddleName).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-users-entity_id")
                                .from(Users::Table, Users::EntityId)
                                .to(Entities::Table, Entities::EntityId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Incarcerated::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Incarcerated::EntityId)
                                .big_integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Incarcerated::DocNumber).string().not_null())
                        .col(ColumnDef::new(Incarcerated::Facility).string().null())
                        .col(ColumnDef::new(Incarcerated::HousingUnit).string().null())
                        .col(ColumnDef::new(Incarcerated::HousingCell).string().null())
                        .col(
                            ColumnDef::new(Incarcerated::EstimatedReleaseDate)
                                .date()
                                .null(),
                        )
                        .col(ColumnDef::new(Incarcerated::Counselor).string().null())
                        .col(ColumnDef::new(Incarcerated::HsDiploma).boolean().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-incarcerated-entity_id")
                                .from(Incarcerated::Table, Incarcerated::EntityId)
                                .to(Entities::Table, Entities::EntityId),
                        )
                        .to_owned(),
                )
                .await?;

            // DOC numbers are the operator-facing key; duplicates would make
            // issue/return lookups ambiguous.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx-incarcerated-doc_number")
                        .table(Incarcerated::Table)
                        .col(Incarcerated::DocNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Employees::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Employees::EntityId)
                                .big_integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Employees::EmployeeId).string().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-employees-entity_id")
                                .from(Employees::Table, Employees::EntityId)
                                .to(Entities::Table, Entities::EntityId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Locations::EntityId)
                                .big_integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Locations::Building).string().null())
                        .col(ColumnDef::new(Locations::RoomNumber).string().null())
                        .col(ColumnDef::new(Locations::RoomName).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-locations-entity_id")
                                .from(Locations::Table, Locations::EntityId)
                                .to(Entities::Table, Entities::EntityId),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Employees::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Incarcerated::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Entities::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum Entities {
        Table,
        EntityId,
        EntityType,
        Enabled,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        EntityId,
        LastName,
        FirstName,
        MiddleName,
    }

    #[derive(DeriveIden)]
    enum Incarcerated {
        Table,
        EntityId,
        DocNumber,
        Facility,
        HousingUnit,
        HousingCell,
        EstimatedReleaseDate,
        Counselor,
        HsDiploma,
    }

    #[derive(DeriveIden)]
    enum Employees {
        Table,
        EntityId,
        EmployeeId,
    }

    #[derive(DeriveIden)]
    enum Locations {
        Table,
        EntityId,
        Building,
        RoomNumber,
        RoomName,
    }
}

mod m20240101_000002_create_asset_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_asset_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AssetTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AssetTypes::AssetType)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(AssetTypes::ChargeLimit).integer().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Assets::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Assets::AssetId)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Assets::AssetType).string().not_null())
                        .col(ColumnDef::new(Assets::AssetCost).decimal().null())
                        .col(
                            ColumnDef::new(Assets::AssetStatus)
                                .string()
                                .not_null()
                                .default("IN_SERVICE"),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-assets-asset_type")
                                .from(Assets::Table, Assets::AssetType)
                                .to(AssetTypes::Table, AssetTypes::AssetType),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Laptops::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Laptops::AssetId)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Laptops::Model).string().not_null())
                        .col(ColumnDef::new(Laptops::SerialNumber).string().not_null())
                        .col(ColumnDef::new(Laptops::DriveSerialNumber).string().null())
                        .col(ColumnDef::new(Laptops::Manufacturer).string().not_null())
                        .col(ColumnDef::new(Laptops::Ram).string().null())
                        .col(ColumnDef::new(Laptops::Cpu).string().null())
                        .col(ColumnDef::new(Laptops::Storage).string().null())
                        .col(ColumnDef::new(Laptops::BiosVersion).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-laptops-asset_id")
                                .from(Laptops::Table, Laptops::AssetId)
                                .to(Assets::Table, Assets::AssetId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Books::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Books::AssetId)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Books::Isbn).string().not_null())
                        .col(ColumnDef::new(Books::Title).string().not_null())
                        .col(ColumnDef::new(Books::Author).string().null())
                        .col(ColumnDef::new(Books::Publisher).string().null())
                        .col(ColumnDef::new(Books::Edition).string().null())
                        .col(ColumnDef::new(Books::Year).integer().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-books-asset_id")
                                .from(Books::Table, Books::AssetId)
                                .to(Assets::Table, Assets::AssetId),
                        )
                        .to_owned(),
                )
                .await?;

            // Duplicate-book detection queries by ISBN across a holder's set.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx-books-isbn")
                        .table(Books::Table)
                        .col(Books::Isbn)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Calculators::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Calculators::AssetId)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Calculators::Model).string().not_null())
                        .col(
                            ColumnDef::new(Calculators::SerialNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Calculators::Manufacturer).string().null())
                        .col(
                            ColumnDef::new(Calculators::ManufacturerDateCode)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(Calculators::Color).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-calculators-asset_id")
                                .from(Calculators::Table, Calculators::AssetId)
                                .to(Assets::Table, Assets::AssetId),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Calculators::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Books::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Laptops::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Assets::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(AssetTypes::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum AssetTypes {
        Table,
        AssetType,
        ChargeLimit,
    }

    #[derive(DeriveIden)]
    enum Assets {
        Table,
        AssetId,
        AssetType,
        AssetCost,
        AssetStatus,
    }

    #[derive(DeriveIden)]
    enum Laptops {
        Table,
        AssetId,
        Model,
        SerialNumber,
        DriveSerialNumber,
        Manufacturer,
        Ram,
        Cpu,
        Storage,
        BiosVersion,
    }

    #[derive(DeriveIden)]
    enum Books {
        Table,
        AssetId,
        Isbn,
        Title,
        Author,
        Publisher,
        Edition,
        Year,
    }

    #[derive(DeriveIden)]
    enum Calculators {
        Table,
        AssetId,
        Model,
        SerialNumber,
        Manufacturer,
        ManufacturerDateCode,
        Color,
    }
}

mod m20240101_000003_create_ledger_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_ledger_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Transactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Transactions::TransactionId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Transactions::EntityId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Transactions::AssetId).string().not_null())
                        .col(
                            ColumnDef::new(Transactions::TransactionType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::TransactionTimestamp)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::TransactionUser)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::TransactionNotes)
                                .string()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-transactions-entity_id")
                                .from(Transactions::Table, Transactions::EntityId)
                                .to(Entities::Table, Entities::EntityId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-transactions-asset_id")
                                .from(Transactions::Table, Transactions::AssetId)
                                .to(Assets::Table, Assets::AssetId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx-transactions-asset_id")
                        .table(Transactions::Table)
                        .col(Transactions::AssetId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx-transactions-entity_id")
                        .table(Transactions::Table)
                        .col(Transactions::EntityId)
                        .to_owned(),
                )
                .await?;

            // One live holder per ordinary asset: the primary key IS the
            // uniqueness guard, so a double-issue race loses with a
            // constraint violation instead of silently double-issuing.
            manager
                .create_table(
                    Table::create()
                        .table(IssuedAssets::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(IssuedAssets::AssetId)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(IssuedAssets::TransactionId)
                                .big_integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-issued_assets-asset_id")
                                .from(IssuedAssets::Table, IssuedAssets::AssetId)
                                .to(Assets::Table, Assets::AssetId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-issued_assets-transaction_id")
                                .from(IssuedAssets::Table, IssuedAssets::TransactionId)
                                .to(Transactions::Table, Transactions::TransactionId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(IssuedAccessories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(IssuedAccessories::AssetId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(IssuedAccessories::EntityId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(IssuedAccessories::TransactionId)
                                .big_integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(IssuedAccessories::AssetId)
                                .col(IssuedAccessories::EntityId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-issued_accessories-asset_id")
                                .from(IssuedAccessories::Table, IssuedAccessories::AssetId)
                                .to(Assets::Table, Assets::AssetId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-issued_accessories-entity_id")
                                .from(IssuedAccessories::Table, IssuedAccessories::EntityId)
                                .to(Entities::Table, Entities::EntityId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-issued_accessories-transaction_id")
                                .from(IssuedAccessories::Table, IssuedAccessories::TransactionId)
                                .to(Transactions::Table, Transactions::TransactionId),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(IssuedAccessories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(IssuedAssets::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Transactions::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum Transactions {
        Table,
        TransactionId,
        EntityId,
        AssetId,
        TransactionType,
        TransactionTimestamp,
        TransactionUser,
        TransactionNotes,
    }

    #[derive(DeriveIden)]
    enum IssuedAssets {
        Table,
        AssetId,
        TransactionId,
    }

    #[derive(DeriveIden)]
    enum IssuedAccessories {
        Table,
        AssetId,
        EntityId,
        TransactionId,
    }

    #[derive(DeriveIden)]
    enum Entities {
        Table,
        EntityId,
    }

    #[derive(DeriveIden)]
    enum Assets {
        Table,
        AssetId,
    }
}

mod m20240101_000004_create_document_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_document_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Documents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Documents::DocumentId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Documents::DocumentType).string().not_null())
                        .col(
                            ColumnDef::new(Documents::DocumentPrintedTimestamp)
                                .timestamp()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Documents::DocumentSignedTimestamp)
                                .timestamp()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Documents::DocumentFileName)
                                .string()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TransactionDocuments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TransactionDocuments::TransactionId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionDocuments::DocumentId)
                                .big_integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(TransactionDocuments::TransactionId)
                                .col(TransactionDocuments::DocumentId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-transaction_documents-transaction_id")
                                .from(
                                    TransactionDocuments::Table,
                                    TransactionDocuments::TransactionId,
                                )
                                .to(Transactions::Table, Transactions::TransactionId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-transaction_documents-document_id")
                                .from(
                                    TransactionDocuments::Table,
                                    TransactionDocuments::DocumentId,
                                )
                                .to(Documents::Table, Documents::DocumentId),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TransactionDocuments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Documents::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum Documents {
        Table,
        DocumentId,
        DocumentType,
        DocumentPrintedTimestamp,
        DocumentSignedTimestamp,
        DocumentFileName,
    }

    #[derive(DeriveIden)]
    enum TransactionDocuments {
        Table,
        TransactionId,
        DocumentId,
    }

    #[derive(DeriveIden)]
    enum Transactions {
        Table,
        TransactionId,
    }
}
