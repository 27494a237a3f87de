//! The in-memory working set of comments for the active pair
//!
//! Listing responses come back from the remote store asynchronously, so a
//! response can land after the reviewer has already moved to a different
//! (project, device) pair or after a newer fetch replaced it. Every fetch
//! is stamped with a [`ListingTicket`] up front; [`WorkingSet::apply_listing`]
//! installs a response only while its ticket is still current and discards
//! it otherwise.

use std::collections::BTreeSet;

use crate::backend::CommentStore;
use crate::error::{FetchError, PartialDeleteError};

use super::types::{Comment, CommentId, CommentScope};

/// Ticket stamped when a listing fetch is issued
///
/// Records the pair the fetch was issued for and its issuance order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingTicket {
    scope: CommentScope,
    seq: u64,
}

impl ListingTicket {
    /// The pair this fetch was issued for
    pub fn scope(&self) -> &CommentScope {
        &self.scope
    }
}

/// What [`WorkingSet::apply_listing`] did with a fetched list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOutcome {
    /// The list replaced the working set contents
    Applied,
    /// The response no longer matched the active pair or a newer fetch
    /// superseded it; the working set is untouched
    Stale,
}

/// Comments loaded for the active (project, device) pair, with the
/// multi-selection used by batch delete
///
/// Every id in `selected` always refers to a comment currently in the
/// set; each mutation restores that relation before returning.
#[derive(Debug, Default)]
pub struct WorkingSet {
    scope: Option<CommentScope>,
    comments: Vec<Comment>,
    selected: BTreeSet<CommentId>,
    last_issued: u64,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pair the current contents belong to, if any
    pub fn scope(&self) -> Option<&CommentScope> {
        self.scope.as_ref()
    }

    /// The loaded comments, in server list order
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Selected ids in ascending order
    pub fn selected_ids(&self) -> Vec<CommentId> {
        self.selected.iter().copied().collect()
    }

    pub fn is_selected(&self, id: CommentId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Point the working set at a different pair
    ///
    /// Moving to a new pair (or to none) drops the loaded comments and the
    /// selection immediately; contents scoped to the old pair must never
    /// be shown against the new one. Retargeting to the current pair is a
    /// no-op so page-level selection moves keep the listing.
    pub fn retarget(&mut self, scope: Option<CommentScope>) {
        if self.scope == scope {
            return;
        }
        self.scope = scope;
        self.comments.clear();
        self.selected.clear();
    }

    /// Stamp a ticket for a listing fetch about to be issued
    ///
    /// Returns `None` while no pair is active. Issuing a new ticket
    /// supersedes all earlier ones.
    pub fn begin_listing(&mut self) -> Option<ListingTicket> {
        let scope = self.scope.clone()?;
        self.last_issued += 1;
        Some(ListingTicket {
            scope,
            seq: self.last_issued,
        })
    }

    /// Install a fetched list if its ticket is still current
    ///
    /// A response is stale once the active pair differs from the one the
    /// fetch was issued for, or once a newer fetch has been issued.
    /// Selection survives an applied refresh for ids still present in the
    /// new list; vanished ids are dropped.
    pub fn apply_listing(&mut self, ticket: &ListingTicket, comments: Vec<Comment>) -> ListingOutcome {
        let still_current = self.scope.as_ref() == Some(&ticket.scope) && ticket.seq == self.last_issued;
        if !still_current {
            tracing::debug!("Discarding stale comment listing for {}", ticket.scope);
            return ListingOutcome::Stale;
        }
        let ids: BTreeSet<CommentId> = comments.iter().map(|c| c.id).collect();
        self.selected.retain(|id| ids.contains(id));
        self.comments = comments;
        ListingOutcome::Applied
    }

    /// Flip selection membership for one comment
    ///
    /// Ids not present in the working set are ignored; the comment may
    /// have been deleted by another reviewer between render and click.
    pub fn toggle_select(&mut self, id: CommentId) {
        if !self.comments.iter().any(|c| c.id == id) {
            return;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Delete every selected comment through the store, one at a time
    ///
    /// Deletions are independent: a failure on one id does not stop the
    /// attempts on the others, and the working set is reconciled only
    /// after every outcome is in. Ids the store confirmed are removed
    /// locally; failed ids stay present and selected so the reviewer can
    /// retry. An empty selection returns without calling the store.
    pub async fn delete_selected<S: CommentStore>(
        &mut self,
        store: &S,
    ) -> Result<Vec<CommentId>, PartialDeleteError> {
        let targets = self.selected_ids();
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let mut succeeded: Vec<CommentId> = Vec::new();
        let mut failed: Vec<(CommentId, FetchError)> = Vec::new();
        for id in targets {
            match store.delete_comment(id).await {
                Ok(()) => succeeded.push(id),
                Err(err) => {
                    tracing::warn!("Failed to delete comment {}: {}", id, err);
                    failed.push((id, err));
                }
            }
        }

        self.comments.retain(|c| !succeeded.contains(&c.id));
        for id in &succeeded {
            self.selected.remove(id);
        }
        tracing::info!(
            "Batch delete finished: {} removed, {} failed",
            succeeded.len(),
            failed.len()
        );

        if failed.is_empty() {
            Ok(succeeded)
        } else {
            Err(PartialDeleteError { succeeded, failed })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(id: i64) -> Comment {
        Comment {
            id: CommentId::new(id),
            project: "P1".to_string(),
            device: "Mobile".to_string(),
            page_name: "Home".to_string(),
            page_path: "/home".to_string(),
            page_number: None,
            ui_component: "1-BUTTON".to_string(),
            body: format!("comment {}", id),
            created_at: Utc::now(),
        }
    }

    fn loaded_set(ids: &[i64]) -> WorkingSet {
        let mut set = WorkingSet::new();
        set.retarget(Some(CommentScope::new("P1", "Mobile")));
        let ticket = set.begin_listing().unwrap();
        let outcome = set.apply_listing(&ticket, ids.iter().map(|&id| comment(id)).collect());
        assert_eq!(outcome, ListingOutcome::Applied);
        set
    }

    #[test]
    fn applies_listing_for_current_ticket() {
        let set = loaded_set(&[1, 2, 3]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.comments()[0].id, CommentId::new(1));
    }

    #[test]
    fn discards_listing_after_retarget() {
        let mut set = WorkingSet::new();
        set.retarget(Some(CommentScope::new("P1", "Mobile")));
        let ticket = set.begin_listing().unwrap();

        set.retarget(Some(CommentScope::new("P2", "Mobile")));
        let outcome = set.apply_listing(&ticket, vec![comment(1)]);
        assert_eq!(outcome, ListingOutcome::Stale);
        assert!(set.is_empty());
    }

    #[test]
    fn discards_listing_superseded_by_newer_fetch() {
        let mut set = WorkingSet::new();
        set.retarget(Some(CommentScope::new("P1", "Mobile")));
        let old_ticket = set.begin_listing().unwrap();
        let new_ticket = set.begin_listing().unwrap();

        assert_eq!(set.apply_listing(&old_ticket, vec![comment(1)]), ListingOutcome::Stale);
        assert_eq!(
            set.apply_listing(&new_ticket, vec![comment(2)]),
            ListingOutcome::Applied
        );
        assert_eq!(set.comments()[0].id, CommentId::new(2));
    }

    #[test]
    fn discards_listing_when_scope_cleared() {
        let mut set = WorkingSet::new();
        set.retarget(Some(CommentScope::new("P1", "Mobile")));
        let ticket = set.begin_listing().unwrap();

        set.retarget(None);
        assert_eq!(set.apply_listing(&ticket, vec![comment(1)]), ListingOutcome::Stale);
    }

    #[test]
    fn no_listing_without_scope() {
        let mut set = WorkingSet::new();
        assert!(set.begin_listing().is_none());
    }

    #[test]
    fn retarget_to_same_pair_keeps_contents() {
        let mut set = loaded_set(&[1, 2]);
        set.toggle_select(CommentId::new(1));
        set.retarget(Some(CommentScope::new("P1", "Mobile")));
        assert_eq!(set.len(), 2);
        assert!(set.is_selected(CommentId::new(1)));
    }

    #[test]
    fn retarget_to_other_pair_clears_contents() {
        let mut set = loaded_set(&[1, 2]);
        set.toggle_select(CommentId::new(1));
        set.retarget(Some(CommentScope::new("P1", "Desktop")));
        assert!(set.is_empty());
        assert_eq!(set.selection_len(), 0);
    }

    #[test]
    fn toggle_select_flips_membership() {
        let mut set = loaded_set(&[1, 2]);
        let id = CommentId::new(1);
        set.toggle_select(id);
        assert!(set.is_selected(id));
        set.toggle_select(id);
        assert!(!set.is_selected(id));
    }

    #[test]
    fn toggle_select_ignores_unknown_id() {
        let mut set = loaded_set(&[1, 2]);
        set.toggle_select(CommentId::new(99));
        assert_eq!(set.selection_len(), 0);
    }

    #[test]
    fn refresh_retains_surviving_selection_only() {
        let mut set = loaded_set(&[1, 2, 3]);
        set.toggle_select(CommentId::new(1));
        set.toggle_select(CommentId::new(3));

        let ticket = set.begin_listing().unwrap();
        let outcome = set.apply_listing(&ticket, vec![comment(1), comment(2)]);
        assert_eq!(outcome, ListingOutcome::Applied);
        assert_eq!(set.selected_ids(), vec![CommentId::new(1)]);
    }

    #[test]
    fn stale_listing_leaves_selection_alone() {
        let mut set = loaded_set(&[1, 2]);
        set.toggle_select(CommentId::new(2));
        let ticket = set.begin_listing().unwrap();
        let _ = set.begin_listing().unwrap();

        assert_eq!(set.apply_listing(&ticket, vec![comment(9)]), ListingOutcome::Stale);
        assert_eq!(set.selected_ids(), vec![CommentId::new(2)]);
        assert_eq!(set.len(), 2);
    }
}
