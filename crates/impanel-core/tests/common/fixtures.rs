//! Catalog and backend fixtures shared across the integration tests

use std::collections::BTreeMap;

use impanel_core::{CatalogIndex, CommentDraft, MemoryBackend, PageRef, ReviewContext};

/// Catalog with two projects; P1 carries Mobile and Desktop devices
pub fn sample_catalog() -> CatalogIndex {
    let projects = vec!["P1".to_string(), "P2".to_string()];
    let mut devices = BTreeMap::new();
    devices.insert(
        "P1".to_string(),
        vec!["Mobile".to_string(), "Desktop".to_string()],
    );
    devices.insert("P2".to_string(), vec!["Tablet".to_string()]);
    let mut pages = BTreeMap::new();
    pages.insert(
        ("P1".to_string(), "Mobile".to_string()),
        vec![
            PageRef::new("Home", "/screens/home"),
            PageRef::new("Settings", "/screens/settings"),
            PageRef::new("Checkout", "/screens/checkout"),
        ],
    );
    pages.insert(
        ("P1".to_string(), "Desktop".to_string()),
        vec![
            PageRef::new("Home", "/desktop/home"),
            PageRef::new("Dashboard", "/desktop/dashboard"),
        ],
    );
    pages.insert(
        ("P2".to_string(), "Tablet".to_string()),
        vec![PageRef::new("Landing", "/tablet/landing")],
    );
    CatalogIndex::from_parts(projects, devices, pages).expect("fixture catalog is valid")
}

/// The sample catalog after the P1 Mobile device was removed upstream
pub fn catalog_without_mobile() -> CatalogIndex {
    let projects = vec!["P1".to_string(), "P2".to_string()];
    let mut devices = BTreeMap::new();
    devices.insert("P1".to_string(), vec!["Desktop".to_string()]);
    devices.insert("P2".to_string(), vec!["Tablet".to_string()]);
    let mut pages = BTreeMap::new();
    pages.insert(
        ("P1".to_string(), "Desktop".to_string()),
        vec![
            PageRef::new("Home", "/desktop/home"),
            PageRef::new("Dashboard", "/desktop/dashboard"),
        ],
    );
    pages.insert(
        ("P2".to_string(), "Tablet".to_string()),
        vec![PageRef::new("Landing", "/tablet/landing")],
    );
    CatalogIndex::from_parts(projects, devices, pages).expect("fixture catalog is valid")
}

/// Context for the P1 / Mobile / Home coordinate
pub fn home_context() -> ReviewContext {
    ReviewContext {
        project: "P1".to_string(),
        device: "Mobile".to_string(),
        page_name: "Home".to_string(),
        page_path: "/screens/home".to_string(),
        filename: "wireframes.pdf".to_string(),
    }
}

/// Draft against P1 / Mobile / Home
pub fn home_draft(ui_component: &str, body: &str) -> CommentDraft {
    CommentDraft::new(&home_context(), ui_component, body, None).expect("fixture draft is valid")
}

/// Backend serving the sample catalog with no comments yet
pub fn empty_backend() -> MemoryBackend {
    MemoryBackend::new(sample_catalog())
}

/// Backend with three comments under P1/Mobile and one under P1/Desktop
pub fn seeded_backend() -> MemoryBackend {
    let backend = empty_backend();
    backend
        .seed_comment(&home_draft("1-Button", "align left"))
        .unwrap();
    backend
        .seed_comment(&home_draft("2-Nav", "wrong icon"))
        .unwrap();
    backend
        .seed_comment(&home_draft("3-Footer", "cut off at 320px"))
        .unwrap();

    let desktop = ReviewContext {
        device: "Desktop".to_string(),
        page_path: "/desktop/home".to_string(),
        ..home_context()
    };
    let draft =
        CommentDraft::new(&desktop, "1-Button", "desktop only", None).expect("draft is valid");
    backend.seed_comment(&draft).unwrap();
    backend
}
