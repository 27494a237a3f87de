//! Review session orchestration
//!
//! A session composes the catalog, the selection, the uploaded document,
//! and the comment working set, and drives them through a backend:
//! catalog (re)loads reconcile the selection, selection moves retarget
//! and re-list the working set, and the composer gates comment submission
//! on a complete context. Every mutation runs to completion before the
//! next begins; the exclusive borrow on the session is what upholds that.

use serde::{Deserialize, Serialize};

use crate::annotations::{
    export_markdown, parse_page_number, Comment, CommentDraft, CommentId, CommentScope, WorkingSet,
};
use crate::backend::{CommentStore, ReviewBackend};
use crate::catalog::CatalogIndex;
use crate::error::{ReviewError, ReviewResult};
use crate::selection::Selection;

/// Opaque handle for the uploaded document under review
///
/// The upload collaborator returns the handle; the session only threads
/// it into the comments filed while it is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub filename: String,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

/// The complete coordinate the add form files against
///
/// Exists only while project, device, page, and document are all chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewContext {
    pub project: String,
    pub device: String,
    pub page_name: String,
    pub page_path: String,
    pub filename: String,
}

/// In-progress form fields for the next comment
///
/// Raw text as typed; normalization and page-number parsing happen at
/// submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    pub ui_component: String,
    pub body: String,
    pub page_number_input: String,
}

/// One reviewer's session over a document catalog
#[derive(Debug, Default)]
pub struct ReviewSession {
    catalog: Option<CatalogIndex>,
    selection: Selection,
    document: Option<UploadedDocument>,
    working_set: WorkingSet,
    composer: Composer,
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> Option<&CatalogIndex> {
        self.catalog.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn document(&self) -> Option<&UploadedDocument> {
        self.document.as_ref()
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Fetch the catalog and bring the rest of the session in line
    ///
    /// The new index replaces the old one wholesale. The selection is
    /// reconciled against it, the working set is retargeted to whatever
    /// pair survives, and a surviving pair is re-listed since the remote
    /// side stays authoritative across a reload.
    pub async fn load_catalog<B: ReviewBackend>(&mut self, backend: &B) -> ReviewResult<()> {
        let index = backend.fetch_catalog().await?;
        tracing::info!("Loaded catalog with {} projects", index.projects().len());
        self.selection = self.selection.reconcile(&index);
        self.catalog = Some(index);
        self.working_set.retarget(self.comment_scope());
        self.refresh_comments(backend).await
    }

    /// Choose a project; device and page reset, the working set empties
    pub async fn select_project<B: CommentStore>(
        &mut self,
        backend: &B,
        name: &str,
    ) -> ReviewResult<()> {
        let catalog = self.catalog.as_ref().ok_or(ReviewError::NoCatalog)?;
        let next = self.selection.select_project(catalog, name)?;
        self.apply_selection(backend, next).await
    }

    /// Choose a device; the page resets and the new pair's comments load
    pub async fn select_device<B: CommentStore>(
        &mut self,
        backend: &B,
        name: &str,
    ) -> ReviewResult<()> {
        let catalog = self.catalog.as_ref().ok_or(ReviewError::NoCatalog)?;
        let next = self.selection.select_device(catalog, name)?;
        self.apply_selection(backend, next).await
    }

    /// Choose a page; the comment pair is unchanged, so no re-listing
    pub async fn select_page<B: CommentStore>(
        &mut self,
        backend: &B,
        name: &str,
    ) -> ReviewResult<()> {
        let catalog = self.catalog.as_ref().ok_or(ReviewError::NoCatalog)?;
        let next = self.selection.select_page(catalog, name)?;
        self.apply_selection(backend, next).await
    }

    /// Re-fetch the listing for the active pair; a no-op without one
    pub async fn refresh_comments<B: CommentStore>(&mut self, backend: &B) -> ReviewResult<()> {
        let ticket = match self.working_set.begin_listing() {
            Some(ticket) => ticket,
            None => return Ok(()),
        };
        let scope = ticket.scope().clone();
        let comments = backend.list_comments(&scope.project, &scope.device).await?;
        self.working_set.apply_listing(&ticket, comments);
        Ok(())
    }

    /// Attach or replace the document under review
    ///
    /// Documents and selection are orthogonal; replacing one never clears
    /// the other.
    pub fn attach_document(&mut self, document: UploadedDocument) {
        tracing::info!("Active document is now {}", document.filename);
        self.document = Some(document);
    }

    /// The complete coordinate for the add form, once everything is chosen
    pub fn context(&self) -> Option<ReviewContext> {
        let project = self.selection.project()?;
        let device = self.selection.device()?;
        let page = self.selection.page()?;
        let document = self.document.as_ref()?;
        Some(ReviewContext {
            project: project.to_string(),
            device: device.to_string(),
            page_name: page.name.clone(),
            page_path: page.path.clone(),
            filename: document.filename.clone(),
        })
    }

    pub fn set_ui_component(&mut self, text: impl Into<String>) {
        self.composer.ui_component = text.into();
    }

    pub fn set_body(&mut self, text: impl Into<String>) {
        self.composer.body = text.into();
    }

    pub fn set_page_number_input(&mut self, text: impl Into<String>) {
        self.composer.page_number_input = text.into();
    }

    /// Whether the add form is enabled
    pub fn can_submit(&self) -> bool {
        self.context().is_some()
            && !self.composer.ui_component.trim().is_empty()
            && !self.composer.body.trim().is_empty()
    }

    /// Validate the composer and file the comment
    ///
    /// A successful submission clears all three composer fields and
    /// refreshes the listing; any failure leaves the fields as typed so
    /// the reviewer can fix and resubmit. A refresh failure after the
    /// comment landed is logged, not returned, since the submission
    /// itself succeeded.
    pub async fn submit_comment<B: CommentStore>(&mut self, backend: &B) -> ReviewResult<Comment> {
        let context = self.context().ok_or(ReviewError::IncompleteContext)?;
        let page_number = parse_page_number(&self.composer.page_number_input)?;
        let draft = CommentDraft::new(
            &context,
            &self.composer.ui_component,
            &self.composer.body,
            page_number,
        )?;
        let comment = backend.create_comment(&draft).await?;
        tracing::info!("Filed comment {} against {}", comment.id, draft.scope());

        self.composer = Composer::default();
        if let Err(err) = self.refresh_comments(backend).await {
            tracing::warn!("Comment filed but listing refresh failed: {}", err);
        }
        Ok(comment)
    }

    /// Flip selection membership for one listed comment
    pub fn toggle_select(&mut self, id: CommentId) {
        self.working_set.toggle_select(id);
    }

    /// Delete the selected comments and refresh the listing
    ///
    /// A partial failure propagates after the working set has dropped the
    /// confirmed ids; the failed ones stay listed and selected for retry.
    pub async fn delete_selected<B: CommentStore>(
        &mut self,
        backend: &B,
    ) -> ReviewResult<Vec<CommentId>> {
        let deleted = self.working_set.delete_selected(backend).await?;
        if !deleted.is_empty() {
            if let Err(err) = self.refresh_comments(backend).await {
                tracing::warn!("Deletes landed but listing refresh failed: {}", err);
            }
        }
        Ok(deleted)
    }

    /// Render the current working set as a markdown table
    pub fn export_markdown(&self) -> String {
        export_markdown(self.working_set.comments())
    }

    fn comment_scope(&self) -> Option<CommentScope> {
        self.selection
            .pair()
            .map(|(project, device)| CommentScope::new(project, device))
    }

    async fn apply_selection<B: CommentStore>(
        &mut self,
        backend: &B,
        next: Selection,
    ) -> ReviewResult<()> {
        let old_scope = self.comment_scope();
        self.selection = next;
        let new_scope = self.comment_scope();
        self.working_set.retarget(new_scope.clone());
        if new_scope.is_some() && new_scope != old_scope {
            self.refresh_comments(backend).await?;
        }
        Ok(())
    }
}
