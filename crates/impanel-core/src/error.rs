//! Error types for impanel-core
//!
//! Provides error handling for:
//! - Selection moves validated against the catalog index
//! - Comment draft validation
//! - Catalog and comment transfers to the remote store
//! - Batch deletion with per-id outcomes

use thiserror::Error;

use crate::annotations::CommentId;

/// Top-level error for review session operations
#[derive(Error, Debug)]
pub enum ReviewError {
    /// Selection moves rejected by the catalog index
    #[error("Invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),

    /// Comment draft rejected before any network call
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Remote store failures
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Batch delete finished with at least one failed id
    #[error("{0}")]
    PartialDelete(#[from] PartialDeleteError),

    /// Submit attempted without project, device, page, and document all set
    #[error("Review context is incomplete")]
    IncompleteContext,

    /// Selection move attempted before any catalog was loaded
    #[error("No catalog loaded")]
    NoCatalog,
}

/// Errors from the selection state machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Project name not present in the catalog
    #[error("Unknown project: {name}")]
    UnknownProject { name: String },

    /// Device name not listed under the selected project
    #[error("Unknown device '{name}' for project '{project}'")]
    UnknownDevice { name: String, project: String },

    /// Page name not listed under the selected (project, device) pair
    #[error("Unknown page '{name}' for {project}/{device}")]
    UnknownPage {
        name: String,
        project: String,
        device: String,
    },

    /// Device chosen before a project
    #[error("No project selected")]
    NoProject,

    /// Page chosen before a device
    #[error("No device selected")]
    NoDevice,
}

/// Errors detected in a comment draft before submission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// UI component tag is empty or whitespace-only
    #[error("UI component must not be empty")]
    EmptyUiComponent,

    /// Comment body is empty or whitespace-only
    #[error("Comment text must not be empty")]
    EmptyBody,

    /// Page number input is neither blank nor a positive integer
    #[error("Page number must be a positive integer, got '{input}'")]
    InvalidPageNumber { input: String },
}

/// Errors from the remote store and catalog source
///
/// Carries messages rather than source errors so it stays independent of
/// any particular transport crate and can cross the backend trait boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection or send failure
    #[error("Request failed: {message}")]
    Transport { message: String },

    /// Non-success HTTP status
    #[error("Server returned status {status}")]
    Status { status: u16 },

    /// Target resource does not exist (already deleted, bad id)
    #[error("Not found")]
    NotFound,

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    /// Base or request URL could not be built
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Request timed out
    #[error("Request timed out")]
    Timeout,
}

/// Outcome of a batch delete where at least one id failed
///
/// The working set has already been reconciled to drop the succeeded ids;
/// the failed ids remain present and selected so the user can retry.
#[derive(Error, Debug)]
#[error("{} of {} selected comments could not be deleted", .failed.len(), .succeeded.len() + .failed.len())]
pub struct PartialDeleteError {
    /// Ids confirmed deleted by the store
    pub succeeded: Vec<CommentId>,

    /// Ids still present remotely, with the failure for each
    pub failed: Vec<(CommentId, FetchError)>,
}

/// Errors from the shared-secret access gate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// Supplied password does not match the shared secret
    #[error("Incorrect password")]
    IncorrectPassword,

    /// Session expiry timestamp is already in the past
    #[error("Access session has expired")]
    Expired,
}

/// Errors from the export sink boundary
#[derive(Error, Debug, Clone)]
pub enum SinkError {
    /// Sink refused or failed to take the payload
    #[error("Failed to deliver export: {message}")]
    Delivery { message: String },
}

/// Configuration loading and validation errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config: {message}")]
    Io { message: String },

    /// Config file is not valid TOML for the expected shape
    #[error("Failed to parse config: {message}")]
    Parse { message: String },

    /// Values parsed but fail validation
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Result type alias for review session operations
pub type ReviewResult<T> = Result<T, ReviewError>;

/// Result type alias for selection operations
pub type SelectionResult<T> = Result<T, SelectionError>;

/// Result type alias for remote store operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Validation utilities
pub mod validation {
    use super::*;

    /// Validate a UI component tag
    pub fn require_ui_component(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyUiComponent);
        }
        Ok(())
    }

    /// Validate a comment body
    pub fn require_body(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        Ok(())
    }
}
