//! Catalog index of reviewable coordinates
//!
//! A three-level lookup describing what exists in the current document
//! catalog: projects, devices per project, and pages per (project, device)
//! pair. The index is immutable once built and is replaced wholesale on
//! reload, never patched in place.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A reviewable page within one (project, device) pair
///
/// Page names are unique within their pair; paths need not be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub name: String,
    pub path: String,
}

impl PageRef {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Errors from catalog index construction
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Duplicate project name: {project}")]
    DuplicateProject { project: String },

    #[error("Devices listed for unknown project: {project}")]
    DevicesForUnknownProject { project: String },

    #[error("Duplicate device '{device}' under project '{project}'")]
    DuplicateDevice { project: String, device: String },

    #[error("Pages keyed by unknown pair: {project}/{device}")]
    PagesForUnknownPair { project: String, device: String },

    #[error("Duplicate page '{name}' under {project}/{device}")]
    DuplicatePage {
        project: String,
        device: String,
        name: String,
    },
}

/// The immutable per-load catalog of selectable coordinates
///
/// Projects, device lists, and page lists keep the order the source
/// reported them in; the maps exist only for lookup. Every device list is
/// keyed by a known project and every page list by a known (project,
/// device) pair, enforced at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogIndex {
    projects: Vec<String>,
    devices_by_project: BTreeMap<String, Vec<String>>,
    pages_by_pair: BTreeMap<(String, String), Vec<PageRef>>,
}

impl CatalogIndex {
    /// An index with no projects at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from its three levels, validating referential
    /// integrity and name uniqueness
    pub fn from_parts(
        projects: Vec<String>,
        devices_by_project: BTreeMap<String, Vec<String>>,
        pages_by_pair: BTreeMap<(String, String), Vec<PageRef>>,
    ) -> Result<Self, CatalogError> {
        let mut seen_projects = BTreeSet::new();
        for project in &projects {
            if !seen_projects.insert(project.clone()) {
                return Err(CatalogError::DuplicateProject {
                    project: project.clone(),
                });
            }
        }

        for (project, devices) in &devices_by_project {
            if !seen_projects.contains(project) {
                return Err(CatalogError::DevicesForUnknownProject {
                    project: project.clone(),
                });
            }
            let mut seen_devices = BTreeSet::new();
            for device in devices {
                if !seen_devices.insert(device.clone()) {
                    return Err(CatalogError::DuplicateDevice {
                        project: project.clone(),
                        device: device.clone(),
                    });
                }
            }
        }

        for ((project, device), pages) in &pages_by_pair {
            let known_device = devices_by_project
                .get(project)
                .map(|devices| devices.iter().any(|d| d == device))
                .unwrap_or(false);
            if !known_device {
                return Err(CatalogError::PagesForUnknownPair {
                    project: project.clone(),
                    device: device.clone(),
                });
            }
            let mut seen_pages = BTreeSet::new();
            for page in pages {
                if !seen_pages.insert(page.name.clone()) {
                    return Err(CatalogError::DuplicatePage {
                        project: project.clone(),
                        device: device.clone(),
                        name: page.name.clone(),
                    });
                }
            }
        }

        Ok(Self {
            projects,
            devices_by_project,
            pages_by_pair,
        })
    }

    /// All project names, in catalog order
    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    /// Device names for a project, in catalog order; empty for unknown projects
    pub fn devices(&self, project: &str) -> &[String] {
        self.devices_by_project
            .get(project)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Pages for a (project, device) pair, in catalog order; empty for unknown pairs
    pub fn pages(&self, project: &str, device: &str) -> &[PageRef] {
        self.pages_by_pair
            .get(&(project.to_string(), device.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look up one page by name within a pair
    pub fn page(&self, project: &str, device: &str, name: &str) -> Option<&PageRef> {
        self.pages(project, device).iter().find(|p| p.name == name)
    }

    pub fn has_project(&self, project: &str) -> bool {
        self.projects.iter().any(|p| p == project)
    }

    pub fn has_device(&self, project: &str, device: &str) -> bool {
        self.devices(project).iter().any(|d| d == device)
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
