//! Wire shapes for the review server's REST API
//!
//! The catalog endpoint keys its page lists by a `{project}_{device}`
//! composite string. The payload here mirrors that shape verbatim;
//! [`CatalogPayload::into_index`] resolves the composite keys back into
//! real pairs and hands off to the validated index type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use impanel_core::{CatalogIndex, FetchError, PageRef};

/// Body of the catalog endpoint response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPayload {
    pub projects: Vec<String>,
    #[serde(default)]
    pub devices_by_project: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub pages_by_project_device: BTreeMap<String, Vec<PageRef>>,
}

impl CatalogPayload {
    /// Resolve composite keys and build the validated catalog index
    ///
    /// A page-list key that matches no known (project, device) pair, and
    /// any uniqueness violation the index rejects, surfaces as
    /// [`FetchError::Decode`].
    pub fn into_index(self) -> Result<CatalogIndex, FetchError> {
        let CatalogPayload {
            projects,
            devices_by_project,
            pages_by_project_device,
        } = self;

        let mut pages_by_pair = BTreeMap::new();
        for (key, pages) in pages_by_project_device {
            let pair = match split_composite_key(&key, &devices_by_project) {
                Some(pair) => pair,
                None => {
                    return Err(FetchError::Decode {
                        message: format!("Unresolvable page list key '{}'", key),
                    })
                }
            };
            pages_by_pair.insert(pair, pages);
        }

        CatalogIndex::from_parts(projects, devices_by_project, pages_by_pair).map_err(|e| {
            FetchError::Decode {
                message: e.to_string(),
            }
        })
    }
}

/// Split a `{project}_{device}` key against the known device lists
///
/// Project and device names may themselves contain underscores, so the
/// key is matched against actual pairs rather than split at the first
/// underscore. Candidates are tried in map order, so an ambiguous key
/// resolves deterministically.
fn split_composite_key(
    key: &str,
    devices_by_project: &BTreeMap<String, Vec<String>>,
) -> Option<(String, String)> {
    for (project, devices) in devices_by_project {
        if let Some(rest) = key.strip_prefix(project.as_str()) {
            if let Some(device) = rest.strip_prefix('_') {
                if devices.iter().any(|d| d == device) {
                    return Some((project.clone(), device.to_string()));
                }
            }
        }
    }
    None
}
