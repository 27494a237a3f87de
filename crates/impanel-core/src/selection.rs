//! Selection state machine for the review cascade
//!
//! Holds the chosen project/device/page and enforces the cascade-reset
//! rule: changing an ancestor clears everything below it. Every move is
//! validated against the catalog index, so a selection can never point at
//! a coordinate the catalog does not contain. Setters return a fresh
//! snapshot instead of mutating in place; boundary layers render purely
//! from the latest snapshot.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogIndex, PageRef};
use crate::error::{SelectionError, SelectionResult};

/// How deep the current selection reaches
///
/// The four stages form a strict linear lattice: each stage requires all
/// the ones above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionStage {
    Empty,
    Project,
    Device,
    Page,
}

/// The currently chosen (project, device, page) coordinate
///
/// The page leaf stores the whole [`PageRef`], so the page path always
/// matches the catalog entry the name was chosen from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    project: Option<String>,
    device: Option<String>,
    page: Option<PageRef>,
}

impl Selection {
    /// The empty selection a session starts with
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    pub fn page(&self) -> Option<&PageRef> {
        self.page.as_ref()
    }

    pub fn page_name(&self) -> Option<&str> {
        self.page.as_ref().map(|p| p.name.as_str())
    }

    pub fn page_path(&self) -> Option<&str> {
        self.page.as_ref().map(|p| p.path.as_str())
    }

    /// The (project, device) pair comments are scoped to, once both are chosen
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (self.project.as_deref(), self.device.as_deref()) {
            (Some(project), Some(device)) => Some((project, device)),
            _ => None,
        }
    }

    pub fn stage(&self) -> SelectionStage {
        match (&self.project, &self.device, &self.page) {
            (None, _, _) => SelectionStage::Empty,
            (Some(_), None, _) => SelectionStage::Project,
            (Some(_), Some(_), None) => SelectionStage::Device,
            (Some(_), Some(_), Some(_)) => SelectionStage::Page,
        }
    }

    /// Choose a project, clearing device and page
    ///
    /// The downstream fields are cleared even when `name` equals the
    /// current project: device and page validity is defined only relative
    /// to a project choice, so any project move invalidates both.
    pub fn select_project(&self, index: &CatalogIndex, name: &str) -> SelectionResult<Selection> {
        if !index.has_project(name) {
            return Err(SelectionError::UnknownProject {
                name: name.to_string(),
            });
        }
        Ok(Selection {
            project: Some(name.to_string()),
            device: None,
            page: None,
        })
    }

    /// Choose a device under the current project, clearing the page
    pub fn select_device(&self, index: &CatalogIndex, name: &str) -> SelectionResult<Selection> {
        let project = self.project.as_deref().ok_or(SelectionError::NoProject)?;
        if !index.has_device(project, name) {
            return Err(SelectionError::UnknownDevice {
                name: name.to_string(),
                project: project.to_string(),
            });
        }
        Ok(Selection {
            project: self.project.clone(),
            device: Some(name.to_string()),
            page: None,
        })
    }

    /// Choose a page under the current (project, device) pair
    ///
    /// The path is copied out of the matching catalog entry, never taken
    /// from the caller.
    pub fn select_page(&self, index: &CatalogIndex, name: &str) -> SelectionResult<Selection> {
        let project = self.project.as_deref().ok_or(SelectionError::NoProject)?;
        let device = self.device.as_deref().ok_or(SelectionError::NoDevice)?;
        let page = index
            .page(project, device, name)
            .ok_or_else(|| SelectionError::UnknownPage {
                name: name.to_string(),
                project: project.to_string(),
                device: device.to_string(),
            })?;
        Ok(Selection {
            project: self.project.clone(),
            device: self.device.clone(),
            page: Some(page.clone()),
        })
    }

    /// Re-validate against a replacement catalog after a reload
    ///
    /// Trims only the deepest invalid suffix: a vanished project empties
    /// everything, a vanished device clears device and page, a vanished
    /// page clears the page alone. A page that survives under the same
    /// name adopts the path of the replacement entry. Idempotent.
    pub fn reconcile(&self, index: &CatalogIndex) -> Selection {
        let project = match self.project.as_deref() {
            Some(p) if index.has_project(p) => p,
            _ => return Selection::new(),
        };
        let device = match self.device.as_deref() {
            Some(d) if index.has_device(project, d) => d,
            _ => {
                return Selection {
                    project: self.project.clone(),
                    device: None,
                    page: None,
                }
            }
        };
        let page = self
            .page
            .as_ref()
            .and_then(|p| index.page(project, device, &p.name))
            .cloned();
        Selection {
            project: self.project.clone(),
            device: self.device.clone(),
            page,
        }
    }
}
