//! In-process backend for tests and offline sessions

use std::sync::Mutex;

use chrono::Utc;

use crate::annotations::{Comment, CommentDraft, CommentId};
use crate::catalog::CatalogIndex;
use crate::error::FetchError;
use crate::session::UploadedDocument;

use super::{CatalogSource, CommentStore, DocumentUpload};

/// Backend holding its catalog and comments in process memory
///
/// Ids come from a counter the way the remote store assigns them.
/// Comments can be removed out-of-band to stand in for a concurrent
/// reviewer, and the whole store can be switched into a failing mode to
/// exercise transport error paths.
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

struct MemoryState {
    catalog: CatalogIndex,
    comments: Vec<Comment>,
    next_id: i64,
    uploads: Vec<String>,
    failing: bool,
}

impl MemoryBackend {
    pub fn new(catalog: CatalogIndex) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                catalog,
                comments: Vec::new(),
                next_id: 1,
                uploads: Vec::new(),
                failing: false,
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, FetchError> {
        self.state.lock().map_err(|e| FetchError::Transport {
            message: e.to_string(),
        })
    }

    /// Insert a comment directly, assigning id and timestamp
    pub fn seed_comment(&self, draft: &CommentDraft) -> Result<Comment, FetchError> {
        let mut state = self.lock()?;
        let comment = Comment {
            id: CommentId::new(state.next_id),
            project: draft.project.clone(),
            device: draft.device.clone(),
            page_name: draft.page_name.clone(),
            page_path: draft.page_path.clone(),
            page_number: draft.page_number,
            ui_component: draft.ui_component.clone(),
            body: draft.body.clone(),
            created_at: Utc::now(),
        };
        state.next_id += 1;
        state.comments.push(comment.clone());
        Ok(comment)
    }

    /// Remove a comment without going through delete, as a concurrent
    /// reviewer would; later deletes of this id fail with NotFound
    pub fn remove_direct(&self, id: CommentId) -> Result<bool, FetchError> {
        let mut state = self.lock()?;
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        Ok(state.comments.len() < before)
    }

    /// Swap in a replacement catalog for the next fetch
    pub fn replace_catalog(&self, catalog: CatalogIndex) -> Result<(), FetchError> {
        self.lock()?.catalog = catalog;
        Ok(())
    }

    /// Make every operation fail with a transport error until reset
    pub fn set_failing(&self, failing: bool) -> Result<(), FetchError> {
        self.lock()?.failing = failing;
        Ok(())
    }

    pub fn comment_count(&self) -> Result<usize, FetchError> {
        Ok(self.lock()?.comments.len())
    }

    pub fn uploads(&self) -> Result<Vec<String>, FetchError> {
        Ok(self.lock()?.uploads.clone())
    }

    fn check_failing(state: &MemoryState) -> Result<(), FetchError> {
        if state.failing {
            return Err(FetchError::Transport {
                message: "backend unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl CatalogSource for MemoryBackend {
    async fn fetch_catalog(&self) -> Result<CatalogIndex, FetchError> {
        let state = self.lock()?;
        Self::check_failing(&state)?;
        Ok(state.catalog.clone())
    }
}

impl CommentStore for MemoryBackend {
    async fn list_comments(
        &self,
        project: &str,
        device: &str,
    ) -> Result<Vec<Comment>, FetchError> {
        let state = self.lock()?;
        Self::check_failing(&state)?;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.project == project && c.device == device)
            .cloned()
            .collect())
    }

    async fn create_comment(&self, draft: &CommentDraft) -> Result<Comment, FetchError> {
        {
            let state = self.lock()?;
            Self::check_failing(&state)?;
        }
        self.seed_comment(draft)
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), FetchError> {
        let mut state = self.lock()?;
        Self::check_failing(&state)?;
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        if state.comments.len() == before {
            return Err(FetchError::NotFound);
        }
        Ok(())
    }
}

impl DocumentUpload for MemoryBackend {
    async fn upload_document(
        &self,
        filename: &str,
        _bytes: Vec<u8>,
    ) -> Result<UploadedDocument, FetchError> {
        let mut state = self.lock()?;
        Self::check_failing(&state)?;
        state.uploads.push(filename.to_string());
        Ok(UploadedDocument {
            filename: filename.to_string(),
        })
    }
}
