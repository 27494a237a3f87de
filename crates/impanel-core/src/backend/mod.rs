//! Collaborator contracts the engine talks through
//!
//! The engine never speaks a wire protocol itself. Catalog loads, comment
//! listing/creation/deletion, and document upload all go through these
//! traits; `impanel-client` implements them over HTTP and
//! [`memory::MemoryBackend`] implements them in process for tests and
//! offline sessions.

pub mod memory;

use crate::annotations::{Comment, CommentDraft, CommentId};
use crate::catalog::CatalogIndex;
use crate::error::{FetchError, SinkError};
use crate::session::UploadedDocument;

/// Source of the catalog index
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    /// Fetch a complete replacement catalog
    async fn fetch_catalog(&self) -> Result<CatalogIndex, FetchError>;
}

/// The remote comment store
#[allow(async_fn_in_trait)]
pub trait CommentStore {
    /// List comments for one (project, device) pair, in server order
    async fn list_comments(&self, project: &str, device: &str)
        -> Result<Vec<Comment>, FetchError>;

    /// Create a comment from a validated draft; the store assigns the id
    /// and timestamp
    async fn create_comment(&self, draft: &CommentDraft) -> Result<Comment, FetchError>;

    /// Delete one comment by id
    ///
    /// An id the store no longer has fails with [`FetchError::NotFound`].
    async fn delete_comment(&self, id: CommentId) -> Result<(), FetchError>;
}

/// Upload collaborator for review documents
#[allow(async_fn_in_trait)]
pub trait DocumentUpload {
    /// Store a document payload, returning its opaque filename handle
    async fn upload_document(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedDocument, FetchError>;
}

/// Everything a review session needs from its backend
pub trait ReviewBackend: CatalogSource + CommentStore {}

impl<T: CatalogSource + CommentStore> ReviewBackend for T {}

/// Destination for a markdown export
///
/// A failed delivery is reported to the caller and never retried.
pub trait ExportSink {
    fn deliver(&mut self, markdown: &str) -> Result<(), SinkError>;
}

/// Sink that accumulates delivered exports in memory
#[derive(Debug, Default)]
pub struct BufferSink {
    delivered: Vec<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> &[String] {
        &self.delivered
    }

    pub fn last(&self) -> Option<&str> {
        self.delivered.last().map(String::as_str)
    }
}

impl ExportSink for BufferSink {
    fn deliver(&mut self, markdown: &str) -> Result<(), SinkError> {
        self.delivered.push(markdown.to_string());
        Ok(())
    }
}
