mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use common::TestApp;
use edu_asset_core::entities::AssetType;
use edu_asset_core::printing::{
    DocumentRenderer, NoopDocumentRenderer, PrintingError, StubSignaturePad,
};
use edu_asset_core::services::{AgreementPrintOutcome, AssetRecord, EntityRecord};
use edu_asset_core::ServiceError;
use async_trait::async_trait;
use mockall::mock;
use std::path::{Path, PathBuf};

const OPERATOR: &str = "jsmith";

mock! {
    Renderer {}

    #[async_trait]
    impl DocumentRenderer for Renderer {
        async fn render_agreement(
            &self,
            entity: &EntityRecord,
            assets: &[AssetRecord],
            signature: &[u8],
            file_name: &str,
        ) -> Result<PathBuf, PrintingError>;

        async fn print(&self, path: &Path) -> Result<(), PrintingError>;
    }
}

#[tokio::test]
async fn new_entity_has_no_outstanding_documents() {
    let app = TestApp::new().await;
    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;

    let outstanding = app.services.documents.outstanding(entity_id).await.unwrap();
    assert!(outstanding.agreement.is_none());
    assert!(outstanding.labels.is_empty());
}

#[tokio::test]
async fn printing_the_agreement_ends_the_batch() {
    let app = TestApp::new().await;
    app.ensure_asset_type(AssetType::Book, None).await;

    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;
    app.create_book("B001", "111", "Intro to Algebra").await;
    app.create_book("B002", "222", "World History").await;
    app.create_book("B003", "333", "Chemistry").await;

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
    assert_eq!(first.agreement_document_id, second.agreement_document_id);

    // Print the batch.
    let now = Utc::now();
    app.services
        .documents
        .mark_printed(first.agreement_document_id, "123456_x.pdf", now, Some(now))
        .await
        .unwrap();

    // The next issuance starts a fresh agreement batch.
    let third = app
        .services
        .issuance
        .issue_asset(entity_id, "B003", OPERATOR, None)
        .await
        .unwrap();
    assert_ne!(third.agreement_document_id, first.agreement_document_id);
}

#[tokio::test]
async fn mark_printed_is_idempotent_last_write_wins() {
    let app = TestApp::new().await;
    app.ensure_asset_type(AssetType::Book, None).await;

    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;
    app.create_book("B001", "111", "Intro to Algebra").await;

    let receipt = app
        .services
        .issuance
        .issue_asset(entity_id, "B001", OPERATOR, None)
        .await
        .unwrap();

    let first_time = Utc::now();
    app.services
        .documents
        .mark_printed(
            receipt.agreement_document_id,
            "first.pdf",
            first_time,
            Some(first_time),
        )
        .await
        .unwrap();

    // Re-printing is safe and the later write wins.
    let second_time = Utc::now();
    let updated = app
        .services
        .documents
        .mark_printed(
            receipt.agreement_document_id,
            "second.pdf",
            second_time,
            Some(second_time),
        )
        .await
        .unwrap();
    assert_eq!(updated.document_file_name.as_deref(), Some("second.pdf"));
    assert!(updated.is_printed());
}

#[tokio::test]
async fn mark_printed_on_unknown_document_is_not_found() {
    let app = TestApp::new().await;

    let err = app
        .services
        .documents
        .mark_printed(9999, "missing.pdf", Utc::now(), None)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn capture_and_print_fulfills_the_agreement() {
    let app = TestApp::new().await;
    app.ensure_asset_type(AssetType::Book, None).await;

    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;
    app.create_book("B001", "111", "Intro to Algebra").await;

    app.services
        .issuance
        .issue_asset(entity_id, "B001", OPERATOR, None)
        .await
        .unwrap();

    let entity = app.services.directory.lookup_by_id(entity_id).await.unwrap();
    let held: Vec<_> = app
        .services
        .directory
        .list_issued_assets(entity_id)
        .await
        .unwrap()
        .into_iter()
        .map(|h| h.asset)
        .collect();

    let mut renderer = MockRenderer::new();
    renderer
        .expect_render_agreement()
        .withf(|_, _, signature, file_name| {
            !signature.is_empty() && file_name.starts_with("123456_") && file_name.ends_with(".pdf")
        })
        .returning(|_, _, _, file_name| Ok(PathBuf::from("agreements").join(file_name)));
    renderer.expect_print().times(1).returning(|_| Ok(()));

    let outcome = app
        .services
        .documents
        .capture_and_print_agreement(&entity, &held, &StubSignaturePad::new(), &renderer)
        .await
        .unwrap();
    assert_matches!(outcome, AgreementPrintOutcome::Printed { .. });

    // Nothing outstanding afterwards.
    let outstanding = app.services.documents.outstanding(entity_id).await.unwrap();
    assert!(outstanding.agreement.is_none());
}

#[tokio::test]
async fn abandoned_signature_leaves_the_agreement_outstanding() {
    let app = TestApp::new().await;
    app.ensure_asset_type(AssetType::Book, None).await;

    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;
    app.create_book("B001", "111", "Intro to Algebra").await;

    app.services
        .issuance
        .issue_asset(entity_id, "B001", OPERATOR, None)
        .await
        .unwrap();

    let entity = app.services.directory.lookup_by_id(entity_id).await.unwrap();
    let renderer = NoopDocumentRenderer::new("agreements");

    let outcome = app
        .services
        .documents
        .capture_and_print_agreement(&entity, &[], &StubSignaturePad::declining(), &renderer)
        .await
        .unwrap();
    assert_eq!(outcome, AgreementPrintOutcome::Abandoned);

    let outstanding = app.services.documents.outstanding(entity_id).await.unwrap();
    assert!(outstanding.agreement.is_some());
}

#[tokio::test]
async fn nothing_outstanding_short_circuits_before_signature_capture() {
    let app = TestApp::new().await;
    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;

    let entity = app.services.directory.lookup_by_id(entity_id).await.unwrap();
    let renderer = NoopDocumentRenderer::new("agreements");

    let outcome = app
        .services
        .documents
        .capture_and_print_agreement(&entity, &[], &StubSignaturePad::new(), &renderer)
        .await
        .unwrap();
    assert_eq!(outcome, AgreementPrintOutcome::NothingOutstanding);
}

#[tokio::test]
async fn laptop_labels_are_tracked_and_marked_printed() {
    let app = TestApp::new().await;
    app.ensure_asset_type(AssetType::Laptop, Some(1)).await;

    let entity_id = app.create_incarcerated("123456", "Doe", "Jane").await;
    app.create_laptop("A1", "HP ProBook 445").await;

    let receipt = app
        .services
        .issuance
        .issue_asset(entity_id, "A1", OPERATOR, None)
        .await
        .unwrap();
    let labels_id = receipt.labels_document_id.unwrap();

    let printed = app
        .services
        .documents
        .mark_labels_printed(entity_id)
        .await
        .unwrap();
    assert_eq!(printed, vec![labels_id]);

    let outstanding = app.services.documents.outstanding(entity_id).await.unwrap();
    assert!(outstanding.labels.is_empty());
}
