//! impanel-core - Selection and annotation engine for design review
//!
//! This crate provides the core state machinery for impanel, a review tool
//! for walking through wireframe documents page by page and leaving
//! positioned comments on them.
//!
//! # Key Components
//!
//! - **CatalogIndex**: The project / device / page hierarchy served by the backend
//! - **Selection**: Cascading project > device > page coordinate with reset-on-change
//! - **WorkingSet**: Loaded comments for the current scope, with multi-select and
//!   stale-listing fencing
//! - **ReviewSession**: Orchestrates catalog loads, selection moves, the comment
//!   composer, and markdown export
//! - **AccessGate**: Shared-password gate issuing time-boxed sessions
//!
//! All remote traffic goes through the [`backend`] traits; the engine itself
//! never touches a socket, so every state transition is testable against the
//! in-memory backend.

pub mod annotations;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gate;
pub mod selection;
pub mod session;

pub use annotations::*;
pub use backend::memory::MemoryBackend;
pub use backend::{
    BufferSink, CatalogSource, CommentStore, DocumentUpload, ExportSink, ReviewBackend,
};
pub use catalog::{CatalogError, CatalogIndex, PageRef};
pub use config::{BackendConfig, GateConfig, ImpanelConfig};
pub use error::*;
pub use gate::{AccessGate, GateSession};
pub use selection::{Selection, SelectionStage};
pub use session::{Composer, ReviewContext, ReviewSession, UploadedDocument};
