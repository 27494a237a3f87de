//! impanel-client - HTTP access to the impanel review backend
//!
//! Implements the `impanel-core` backend traits over the review server's
//! REST API: catalog fetch, comment listing/creation/deletion, and PDF
//! upload. The `cli` feature adds the `impanel` command-line tool.

pub mod client;
pub mod wire;

pub use client::ReviewClient;
pub use wire::CatalogPayload;
