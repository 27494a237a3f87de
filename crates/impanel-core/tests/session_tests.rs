//! End-to-end review session flows against the in-memory backend
//!
//! Each test drives a full user-visible flow: load the catalog, walk the
//! selection cascade, file and delete comments, survive catalog reloads,
//! and export the working set.

mod common;

use common::fixtures::{catalog_without_mobile, empty_backend, home_draft, seeded_backend};
use impanel_core::{
    BufferSink, DocumentUpload, ExportSink, FetchError, ReviewError, ReviewSession,
    SelectionStage, UploadedDocument,
};

// === Catalog and Cascade ===

#[tokio::test]
async fn test_load_catalog_exposes_projects() {
    let backend = empty_backend();
    let mut session = ReviewSession::new();
    session.load_catalog(&backend).await.unwrap();

    let catalog = session.catalog().unwrap();
    assert_eq!(catalog.projects(), &["P1".to_string(), "P2".to_string()]);
    assert_eq!(
        catalog.devices("P1"),
        &["Mobile".to_string(), "Desktop".to_string()]
    );
}

#[tokio::test]
async fn selecting_before_any_catalog_is_rejected() {
    let backend = seeded_backend();
    let mut session = ReviewSession::new();
    assert!(matches!(
        session.select_project(&backend, "P1").await,
        Err(ReviewError::NoCatalog)
    ));
}

#[tokio::test]
async fn walkthrough_to_a_page_loads_the_pair_comments() {
    let backend = seeded_backend();
    let mut session = ReviewSession::new();
    session.load_catalog(&backend).await.unwrap();

    session.select_project(&backend, "P1").await.unwrap();
    assert!(session.working_set().is_empty());

    session.select_device(&backend, "Mobile").await.unwrap();
    assert_eq!(session.working_set().len(), 3);

    session.select_page(&backend, "Home").await.unwrap();
    assert_eq!(session.selection().stage(), SelectionStage::Page);
    assert_eq!(session.selection().page_path(), Some("/screens/home"));
    // Page moves stay within the pair, so the listing is untouched
    assert_eq!(session.working_set().len(), 3);
}

#[tokio::test]
async fn switching_device_swaps_the_listing() {
    let backend = seeded_backend();
    let mut session = ReviewSession::new();
    session.load_catalog(&backend).await.unwrap();
    session.select_project(&backend, "P1").await.unwrap();
    session.select_device(&backend, "Mobile").await.unwrap();
    session.select_page(&backend, "Home").await.unwrap();

    session.select_device(&backend, "Desktop").await.unwrap();
    assert_eq!(session.selection().page(), None);
    assert_eq!(session.working_set().len(), 1);
    assert_eq!(session.working_set().comments()[0].body, "desktop only");
}

#[tokio::test]
async fn rejected_selection_leaves_the_session_unchanged() {
    let backend = seeded_backend();
    let mut session = ReviewSession::new();
    session.load_catalog(&backend).await.unwrap();
    session.select_project(&backend, "P1").await.unwrap();
    session.select_device(&backend, "Mobile").await.unwrap();

    let err = session.select_project(&backend, "P9").await.unwrap_err();
    assert!(matches!(err, ReviewError::InvalidSelection(_)));
    assert_eq!(session.selection().pair(), Some(("P1", "Mobile")));
    assert_eq!(session.working_set().len(), 3);
}

#[tokio::test]
async fn manual_refresh_picks_up_concurrent_comments() {
    let backend = seeded_backend();
    let mut session = ReviewSession::new();
    session.load_catalog(&backend).await.unwrap();
    session.select_project(&backend, "P1").await.unwrap();
    session.select_device(&backend, "Mobile").await.unwrap();
    assert_eq!(session.working_set().len(), 3);

    backend
        .seed_comment(&home_draft("4-Hero", "late arrival"))
        .unwrap();
    session.refresh_comments(&backend).await.unwrap();
    assert_eq!(session.working_set().len(), 4);
}

// === Comment Submission ===

async fn session_at_home(backend: &impanel_core::MemoryBackend) -> ReviewSession {
    let mut session = ReviewSession::new();
    session.load_catalog(backend).await.unwrap();
    session.select_project(backend, "P1").await.unwrap();
    session.select_device(backend, "Mobile").await.unwrap();
    session.select_page(backend, "Home").await.unwrap();
    session.attach_document(UploadedDocument::new("wireframes.pdf"));
    session
}

#[tokio::test]
async fn successful_submit_files_the_comment_and_clears_the_composer() {
    let backend = empty_backend();
    let mut session = session_at_home(&backend).await;

    session.set_ui_component("3a-Nav Bar");
    session.set_body("logo is off-grid");
    session.set_page_number_input(" 4 ");
    assert!(session.can_submit());

    let comment = session.submit_comment(&backend).await.unwrap();
    assert_eq!(comment.ui_component, "3A-NAV BAR");
    assert_eq!(comment.page_number, Some(4));
    assert_eq!(comment.page_path, "/screens/home");

    assert_eq!(session.composer().ui_component, "");
    assert_eq!(session.composer().body, "");
    assert_eq!(session.composer().page_number_input, "");
    assert_eq!(session.working_set().len(), 1);
    assert_eq!(backend.comment_count().unwrap(), 1);
}

#[tokio::test]
async fn failed_submit_keeps_the_composer_for_retry() {
    let backend = empty_backend();
    let mut session = session_at_home(&backend).await;
    session.set_ui_component("1-Button");
    session.set_body("align left");
    session.set_page_number_input("4.5");

    let err = session.submit_comment(&backend).await.unwrap_err();
    assert!(matches!(err, ReviewError::Validation(_)));
    assert_eq!(session.composer().body, "align left");
    assert_eq!(backend.comment_count().unwrap(), 0);

    session.set_page_number_input("4");
    backend.set_failing(true).unwrap();
    let err = session.submit_comment(&backend).await.unwrap_err();
    assert!(matches!(
        err,
        ReviewError::Fetch(FetchError::Transport { .. })
    ));
    assert_eq!(session.composer().body, "align left");

    backend.set_failing(false).unwrap();
    session.submit_comment(&backend).await.unwrap();
    assert_eq!(session.composer().body, "");
    assert_eq!(backend.comment_count().unwrap(), 1);
}

#[tokio::test]
async fn submit_without_a_document_is_rejected() {
    let backend = empty_backend();
    let mut session = ReviewSession::new();
    session.load_catalog(&backend).await.unwrap();
    session.select_project(&backend, "P1").await.unwrap();
    session.select_device(&backend, "Mobile").await.unwrap();
    session.select_page(&backend, "Home").await.unwrap();

    session.set_ui_component("1-Button");
    session.set_body("align left");
    assert!(!session.can_submit());
    assert!(matches!(
        session.submit_comment(&backend).await,
        Err(ReviewError::IncompleteContext)
    ));
}

// === Batch Deletion ===

#[tokio::test]
async fn batch_delete_removes_the_selected_comments() {
    let backend = seeded_backend();
    let mut session = ReviewSession::new();
    session.load_catalog(&backend).await.unwrap();
    session.select_project(&backend, "P1").await.unwrap();
    session.select_device(&backend, "Mobile").await.unwrap();

    let ids: Vec<_> = session.working_set().comments().iter().map(|c| c.id).collect();
    session.toggle_select(ids[0]);
    session.toggle_select(ids[2]);

    let deleted = session.delete_selected(&backend).await.unwrap();
    assert_eq!(deleted, vec![ids[0], ids[2]]);
    assert_eq!(session.working_set().len(), 1);
    assert_eq!(session.working_set().comments()[0].id, ids[1]);
    assert_eq!(session.working_set().selection_len(), 0);
    // The desktop comment is untouched
    assert_eq!(backend.comment_count().unwrap(), 2);
}

#[tokio::test]
async fn partial_delete_keeps_failed_ids_listed_and_selected() {
    let backend = seeded_backend();
    let mut session = ReviewSession::new();
    session.load_catalog(&backend).await.unwrap();
    session.select_project(&backend, "P1").await.unwrap();
    session.select_device(&backend, "Mobile").await.unwrap();

    let ids: Vec<_> = session.working_set().comments().iter().map(|c| c.id).collect();
    session.toggle_select(ids[0]);
    session.toggle_select(ids[1]);

    // Another reviewer removed one of the targets in the meantime
    assert!(backend.remove_direct(ids[1]).unwrap());

    let err = session.delete_selected(&backend).await.unwrap_err();
    let partial = match err {
        ReviewError::PartialDelete(partial) => partial,
        other => panic!("Expected partial delete, got {}", other),
    };
    assert_eq!(partial.succeeded, vec![ids[0]]);
    assert_eq!(partial.failed, vec![(ids[1], FetchError::NotFound)]);

    // The confirmed id is gone locally; the failed one stays for retry
    assert!(session
        .working_set()
        .comments()
        .iter()
        .all(|c| c.id != ids[0]));
    assert!(session.working_set().is_selected(ids[1]));
    assert_eq!(session.working_set().len(), 2);
}

#[tokio::test]
async fn delete_with_empty_selection_calls_no_store() {
    let backend = seeded_backend();
    let mut session = ReviewSession::new();
    session.load_catalog(&backend).await.unwrap();
    session.select_project(&backend, "P1").await.unwrap();
    session.select_device(&backend, "Mobile").await.unwrap();

    // A failing store proves nothing was called
    backend.set_failing(true).unwrap();
    let deleted = session.delete_selected(&backend).await.unwrap();
    assert!(deleted.is_empty());
    assert_eq!(session.working_set().len(), 3);
    backend.set_failing(false).unwrap();
}

// === Catalog Reloads ===

#[tokio::test]
async fn reload_that_drops_the_device_clears_dependent_state() {
    let backend = seeded_backend();
    let mut session = ReviewSession::new();
    session.load_catalog(&backend).await.unwrap();
    session.select_project(&backend, "P1").await.unwrap();
    session.select_device(&backend, "Mobile").await.unwrap();
    session.select_page(&backend, "Home").await.unwrap();
    let first_id = session.working_set().comments()[0].id;
    session.toggle_select(first_id);

    backend.replace_catalog(catalog_without_mobile()).unwrap();
    session.load_catalog(&backend).await.unwrap();

    assert_eq!(session.selection().project(), Some("P1"));
    assert_eq!(session.selection().device(), None);
    assert_eq!(session.selection().page(), None);
    assert!(session.working_set().is_empty());
    assert_eq!(session.working_set().selection_len(), 0);
}

#[tokio::test]
async fn reload_that_keeps_the_pair_relists_from_the_store() {
    let backend = seeded_backend();
    let mut session = ReviewSession::new();
    session.load_catalog(&backend).await.unwrap();
    session.select_project(&backend, "P1").await.unwrap();
    session.select_device(&backend, "Mobile").await.unwrap();
    session.select_page(&backend, "Settings").await.unwrap();

    backend
        .seed_comment(&home_draft("5-Badge", "added while away"))
        .unwrap();
    session.load_catalog(&backend).await.unwrap();

    assert_eq!(session.selection().pair(), Some(("P1", "Mobile")));
    assert_eq!(session.selection().page_name(), Some("Settings"));
    assert_eq!(session.working_set().len(), 4);
}

#[tokio::test]
async fn failed_reload_leaves_the_previous_catalog_in_place() {
    let backend = seeded_backend();
    let mut session = ReviewSession::new();
    session.load_catalog(&backend).await.unwrap();
    session.select_project(&backend, "P1").await.unwrap();
    session.select_device(&backend, "Mobile").await.unwrap();

    backend.set_failing(true).unwrap();
    let err = session.load_catalog(&backend).await.unwrap_err();
    assert!(matches!(err, ReviewError::Fetch(_)));
    assert_eq!(session.selection().pair(), Some(("P1", "Mobile")));
    assert_eq!(session.working_set().len(), 3);
    backend.set_failing(false).unwrap();
}

// === Export and Upload ===

#[tokio::test]
async fn export_renders_the_loaded_listing() {
    let backend = empty_backend();
    let mut session = session_at_home(&backend).await;

    session.set_ui_component("1-button");
    session.set_body("align left");
    session.set_page_number_input("2");
    session.submit_comment(&backend).await.unwrap();

    session.set_ui_component("2-nav");
    session.set_body("crowded header");
    session.submit_comment(&backend).await.unwrap();

    let markdown = session.export_markdown();
    let expected = "| Page No. | Page Name | Page Path | UI Component | Comment |\n\
                    | --- | --- | --- | --- | --- |\n\
                    | 2 | Home | /screens/home | 1-BUTTON | align left |\n\
                    |  | Home | /screens/home | 2-NAV | crowded header |";
    assert_eq!(markdown, expected);

    let mut sink = BufferSink::new();
    sink.deliver(&markdown).unwrap();
    assert_eq!(sink.last(), Some(markdown.as_str()));
}

#[tokio::test]
async fn upload_then_attach_enables_the_form() {
    let backend = empty_backend();
    let mut session = ReviewSession::new();
    session.load_catalog(&backend).await.unwrap();
    session.select_project(&backend, "P1").await.unwrap();
    session.select_device(&backend, "Mobile").await.unwrap();
    session.select_page(&backend, "Home").await.unwrap();

    let document = backend
        .upload_document("redesign-v3.pdf", vec![0x25, 0x50, 0x44, 0x46])
        .await
        .unwrap();
    session.attach_document(document);
    assert_eq!(backend.uploads().unwrap(), vec!["redesign-v3.pdf".to_string()]);

    session.set_ui_component("1-Button");
    session.set_body("align left");
    assert!(session.can_submit());

    let comment = session.submit_comment(&backend).await.unwrap();
    assert_eq!(comment.project, "P1");
    assert_eq!(comment.page_name, "Home");
}
