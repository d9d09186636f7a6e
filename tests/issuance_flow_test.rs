mod common;

use assert_matches::assert_matches;
use common::TestApp;
use edu_asset_core::entities::{AssetStatus, AssetType};
use edu_asset_core::ServiceError;

const OPERATOR: &str = "jsmith";

#[tokio::test]
async fn laptop_issuance_creates_documents_and_accessory_prompts() {
    let app = TestApp::new().await;
    app.ensure_asset_type(AssetType::Laptop, Some(1)).await;

    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;
    app.create_laptop("A1", "HP ProBook 445").await;

    let receipt = app
        .services
        .issuance
        .issue_asset(entity_id, "A1", OPERATOR, None)
        .await
        .expect("laptop issuance should succeed");

    // The laptop is now held by the entity via the live link.
    let holder = app
        .services
        .ledger
        .current_holder("A1")
        .await
        .unwrap()
        .expect("laptop should have a current holder");
    assert_eq!(holder.entity_id, entity_id);
    assert_eq!(holder.transaction_id, receipt.transaction_id);
    assert_eq!(holder.transaction_user, OPERATOR);

    // One unprinted agreement and one unprinted labels sheet.
    let outstanding = app.services.documents.outstanding(entity_id).await.unwrap();
    assert!(outstanding.agreement.is_some());
    assert_eq!(outstanding.labels.len(), 1);
    assert_eq!(
        outstanding.agreement.unwrap().document_id,
        receipt.agreement_document_id
    );
    assert_eq!(
        outstanding.labels[0].document_id,
        receipt.labels_document_id.expect("laptop owes labels")
    );

    // Entity holds neither accessory yet, so both bundling prompts fire.
    assert!(receipt.charger_required);
    assert!(receipt.headphones_offered);
}

#[tokio::test]
async fn duplicate_isbn_cannot_be_issued_twice_to_one_entity() {
    let app = TestApp::new().await;
    app.ensure_asset_type(AssetType::Book, None).await;

    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;
    app.create_book("B001", "111", "Intro to Algebra").await;
    app.create_book("B002", "111", "Intro to Algebra").await;

    app.services
        .issuance
        .issue_asset(entity_id, "B001", OPERATOR, None)
        .await
        .expect("first copy should issue");

    let err = app
        .services
        .issuance
        .issue_asset(entity_id, "B002", OPERATOR, None)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::DuplicateBook { isbn } if isbn == "111");

    // A different entity may still take the second copy.
    let other = app.create_incarcerated("654321", "Roe", "Rick").await;
    app.services
        .issuance
        .issue_asset(other, "B002", OPERATOR, None)
        .await
        .expect("second copy should issue to a different entity");
}

#[tokio::test]
async fn broken_asset_is_refused_with_status_and_no_ledger_row() {
    let app = TestApp::new().await;
    app.ensure_asset_type(AssetType::Calculator, Some(1)).await;

    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;
    app.create_calculator("A2", "TI-84").await;
    app.set_asset_status("A2", AssetStatus::Broken).await;

    let err = app
        .services
        .issuance
        .issue_asset(entity_id, "A2", OPERATOR, None)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::AssetUnavailable {
            status: AssetStatus::Broken,
            ..
        }
    );
    assert!(err.to_string().contains("A2"));
    assert!(err.to_string().contains("broken"));

    // Validation failures never write to the ledger.
    let history = app.services.ledger.history_for_asset("A2").await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn charge_limit_blocks_excess_and_return_frees_a_slot() {
    let app = TestApp::new().await;
    app.ensure_asset_type(AssetType::Calculator, Some(1)).await;

    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;
    app.create_calculator("C1", "TI-84").await;
    app.create_calculator("C2", "TI-30").await;

    app.services
        .issuance
        .issue_asset(entity_id, "C1", OPERATOR, None)
        .await
        .expect("first calculator fits the limit");

    let err = app
        .services
        .issuance
        .issue_asset(entity_id, "C2", OPERATOR, None)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::ChargeLimitExceeded {
            asset_type: AssetType::Calculator,
            limit: 1,
        }
    );

    // Returning the first calculator frees the slot.
    app.services
        .returns
        .return_asset("C1", OPERATOR, None)
        .await
        .expect("return should succeed");

    app.services
        .issuance
        .issue_asset(entity_id, "C2", OPERATOR, None)
        .await
        .expect("slot freed by the return");
}

#[tokio::test]
async fn live_holder_conflicts_are_reported_per_requester() {
    let app = TestApp::new().await;
    app.ensure_asset_type(AssetType::Book, None).await;

    let holder = app.create_incarcerated("123456", "Doe", "Jane").await;
    let other = app.create_incarcerated("654321", "Roe", "Rick").await;
    app.create_book("B001", "111", "Intro to Algebra").await;

    app.services
        .issuance
        .issue_asset(holder, "B001", OPERATOR, None)
        .await
        .unwrap();

    let err = app
        .services
        .issuance
        .issue_asset(holder, "B001", OPERATOR, None)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::AlreadyIssuedToSelf { .. });

    let err = app
        .services
        .issuance
        .issue_asset(other, "B001", OPERATOR, None)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::AlreadyIssuedToOther { holder_entity_id, .. } if holder_entity_id == holder
    );
}

#[tokio::test]
async fn unknown_barcode_is_asset_not_found() {
    let app = TestApp::new().await;
    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;

    let err = app
        .services
        .issuance
        .issue_asset(entity_id, "NO-SUCH", OPERATOR, None)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::AssetNotFound(id) if id == "NO-SUCH");
}

#[tokio::test]
async fn issuances_batch_into_one_outstanding_agreement() {
    let app = TestApp::new().await;
    app.ensure_asset_type(AssetType::Book, None).await;

    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;
    app.create_book("B001", "111", "Intro to Algebra").await;
    app.create_book("B002", "222", "World History").await;

    let first = app
        .services
        .issuance
        .issue_asset(entity_id, "B001", OPERATOR, None)
        .await
        .unwrap();
    let second = app
        .services
        .issuance
        .issue_asset(entity_id, "B002", OPERATOR, None)
        .await
        .unwrap();

    // Both transactions share the single unprinted agreement.
    assert_eq!(first.agreement_document_id, second.agreement_document_id);

    let outstanding = app.services.documents.outstanding(entity_id).await.unwrap();
    assert_eq!(
        outstanding.agreement.unwrap().document_id,
        first.agreement_document_id
    );
    assert!(outstanding.labels.is_empty());
}

#[tokio::test]
async fn bundled_charger_reuses_the_laptop_transaction() {
    let app = TestApp::new().await;
    app.ensure_asset_type(AssetType::Laptop, Some(1)).await;
    app.ensure_asset_type(AssetType::Charger, Some(1)).await;
    app.ensure_asset_type(AssetType::Headphones, Some(1)).await;

    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;
    app.create_laptop("A1", "HP ProBook 445").await;
    app.create_accessory("CH1", AssetType::Charger).await;
    app.create_accessory("HP1", AssetType::Headphones).await;

    let receipt = app
        .services
        .issuance
        .issue_asset(entity_id, "A1", OPERATOR, None)
        .await
        .unwrap();
    assert!(receipt.charger_required);

    // Wrong-type scan at the charger prompt is rejected.
    let err = app
        .services
        .issuance
        .issue_bundled_accessory("HP1", entity_id, receipt.transaction_id, AssetType::Charger)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));

    app.services
        .issuance
        .issue_bundled_accessory("CH1", entity_id, receipt.transaction_id, AssetType::Charger)
        .await
        .expect("charger scan should issue");

    // The link row carries the laptop's transaction id for audit linkage,
    // and no second ledger row was written for the charger.
    let link = app
        .services
        .ledger
        .accessory_link("CH1", entity_id)
        .await
        .unwrap()
        .expect("charger link should be live");
    assert_eq!(link.transaction_id, receipt.transaction_id);
    assert!(app
        .services
        .ledger
        .history_for_asset("CH1")
        .await
        .unwrap()
        .is_empty());

    // One physical charger can never be live-issued to a second holder.
    let other = app.create_incarcerated("654321", "Roe", "Rick").await;
    let err = app
        .services
        .issuance
        .issue_bundled_accessory("CH1", other, receipt.transaction_id, AssetType::Charger)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::AlreadyIssuedToOther { holder_entity_id, .. } if holder_entity_id == entity_id
    );
}

#[tokio::test]
async fn held_set_unions_ordinary_assets_and_accessories() {
    let app = TestApp::new().await;
    app.ensure_asset_type(AssetType::Laptop, Some(1)).await;
    app.ensure_asset_type(AssetType::Charger, Some(1)).await;

    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;
    app.create_laptop("A1", "HP ProBook 445").await;
    app.create_accessory("CH1", AssetType::Charger).await;

    let receipt = app
        .services
        .issuance
        .issue_asset(entity_id, "A1", OPERATOR, None)
        .await
        .unwrap();
    app.services
        .issuance
        .issue_bundled_accessory("CH1", entity_id, receipt.transaction_id, AssetType::Charger)
        .await
        .unwrap();

    let held = app
        .services
        .directory
        .list_issued_assets(entity_id)
        .await
        .unwrap();
    assert_eq!(held.len(), 2);

    let laptop = held
        .iter()
        .find(|h| h.asset.asset_type == AssetType::Laptop)
        .expect("laptop in held set");
    assert_eq!(laptop.asset.asset_id, "A1");

    let charger = held
        .iter()
        .find(|h| h.asset.asset_type == AssetType::Charger)
        .expect("charger in held set");
    assert_eq!(charger.issued_to, Some(entity_id));
    assert_eq!(charger.issuing_transaction, Some(receipt.transaction_id));
}
