/*!
 * External document collaborators.
 *
 * The core never renders PDFs or talks to signature-capture hardware; it
 * calls these narrow traits and records the outcome in the `documents`
 * table. Implementations live outside this crate (desktop shell, print
 * spooler); the no-op versions here back tests and headless runs.
 */

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::services::catalog::AssetRecord;
use crate::services::directory::EntityRecord;

/// Collaborator failures surfaced back to the operator loop.
#[derive(Error, Debug)]
pub enum PrintingError {
    #[error("failed to render document: {0}")]
    RenderFailed(String),
    #[error("failed to print document: {0}")]
    PrintFailed(String),
    #[error("signature capture unavailable: {0}")]
    SignatureUnavailable(String),
}

/// Signature-capture hardware. Blocking from the core's point of view;
/// `Ok(None)` means the operator abandoned the capture, which must leave
/// zero partial state behind.
#[async_trait]
pub trait SignatureCapture: Send + Sync {
    async fn request_signature(
        &self,
        entity: &EntityRecord,
        assets: &[AssetRecord],
    ) -> Result<Option<Vec<u8>>, PrintingError>;
}

/// Agreement/label rendering and the print spooler.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Renders the signed loan agreement and returns the path it was
    /// written to. `file_name` is chosen by the caller so the documents
    /// table and the file system stay in sync.
    async fn render_agreement(
        &self,
        entity: &EntityRecord,
        assets: &[AssetRecord],
        signature: &[u8],
        file_name: &str,
    ) -> Result<PathBuf, PrintingError>;

    /// Sends an already-rendered file to the printer.
    async fn print(&self, path: &Path) -> Result<(), PrintingError>;
}

/// Signature pad stand-in that immediately "signs" with a fixed byte blob.
#[derive(Debug, Default)]
pub struct StubSignaturePad {
    decline: bool,
}

impl StubSignaturePad {
    pub fn new() -> Self {
        Self { decline: false }
    }

    /// A pad whose operator always walks away.
    pub fn declining() -> Self {
        Self { decline: true }
    }
}

#[async_trait]
impl SignatureCapture for StubSignaturePad {
    async fn request_signature(
        &self,
        _entity: &EntityRecord,
        _assets: &[AssetRecord],
    ) -> Result<Option<Vec<u8>>, PrintingError> {
        if self.decline {
            Ok(None)
        } else {
            Ok(Some(b"stub-signature".to_vec()))
        }
    }
}

/// Renderer stand-in that pretends every render and print succeeded.
#[derive(Debug, Default)]
pub struct NoopDocumentRenderer {
    output_dir: PathBuf,
}

impl NoopDocumentRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl DocumentRenderer for NoopDocumentRenderer {
    async fn render_agreement(
        &self,
        _entity: &EntityRecord,
        _assets: &[AssetRecord],
        _signature: &[u8],
        file_name: &str,
    ) -> Result<PathBuf, PrintingError> {
        Ok(self.output_dir.join(file_name))
    }

    async fn print(&self, _path: &Path) -> Result<(), PrintingError> {
        Ok(())
    }
}
