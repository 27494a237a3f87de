//! Comment type definitions

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{validation, ValidationError};
use crate::session::ReviewContext;

/// Identifier assigned to a comment by the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(i64);

impl CommentId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The (project, device) pair a comment listing is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentScope {
    pub project: String,
    pub device: String,
}

impl CommentScope {
    pub fn new(project: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            device: device.into(),
        }
    }
}

impl fmt::Display for CommentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.device)
    }
}

/// A review comment filed against one catalog coordinate
///
/// Immutable once created. The coordinate is captured at creation time
/// and is not re-validated against later catalog reloads; the store
/// assigns `id` and `created_at`. The body travels as `comment` on the
/// wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub project: String,
    pub device: String,
    pub page_name: String,
    pub page_path: String,
    /// Reviewer-entered page number; absent when the field was left blank
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    pub ui_component: String,
    #[serde(rename = "comment")]
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn scope(&self) -> CommentScope {
        CommentScope::new(self.project.clone(), self.device.clone())
    }
}

/// A validated comment ready to submit to the store
///
/// Built through [`CommentDraft::new`], which rejects blank required
/// fields and uppercases the component tag the way the store expects.
/// Serializes to the create-comment request body; an absent page number
/// is omitted from the payload entirely, never sent as null or zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentDraft {
    pub project: String,
    pub device: String,
    pub page_name: String,
    pub page_path: String,
    pub filename: String,
    pub ui_component: String,
    #[serde(rename = "comment")]
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

impl CommentDraft {
    /// Validate raw form input against a complete review context
    pub fn new(
        context: &ReviewContext,
        ui_component: &str,
        body: &str,
        page_number: Option<u32>,
    ) -> Result<Self, ValidationError> {
        validation::require_ui_component(ui_component)?;
        validation::require_body(body)?;
        Ok(Self {
            project: context.project.clone(),
            device: context.device.clone(),
            page_name: context.page_name.clone(),
            page_path: context.page_path.clone(),
            filename: context.filename.clone(),
            ui_component: ui_component.to_uppercase(),
            body: body.to_string(),
            page_number,
        })
    }

    pub fn scope(&self) -> CommentScope {
        CommentScope::new(self.project.clone(), self.device.clone())
    }
}

/// Interpret the raw page-number input from the comment form
///
/// Blank input means the reviewer left the field empty and stays absent
/// rather than becoming zero. Anything non-blank must be a positive
/// integer.
pub fn parse_page_number(input: &str) -> Result<Option<u32>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(Some(n)),
        _ => Err(ValidationError::InvalidPageNumber {
            input: input.to_string(),
        }),
    }
}
