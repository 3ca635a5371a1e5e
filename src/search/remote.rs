//! Remote package indexes

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::reference::Reference;
use crate::search::SearchSource;
use crate::search::error::SearchError;
use crate::search::query::{CaseMatch, SearchPattern};

/// A named remote that can be searched for references
pub trait Remote: Send + Sync {
    fn name(&self) -> &str;

    fn search(
        &self,
        pattern: &SearchPattern,
        case: CaseMatch,
    ) -> Result<Vec<Reference>, SearchError>;
}

/// Searches an ordered list of remotes
///
/// The result of the first remote returning any match is used; later
/// remotes are not consulted.
#[derive(Default)]
pub struct RemoteSearch {
    remotes: Vec<Box<dyn Remote>>,
}

impl RemoteSearch {
    pub fn new(remotes: Vec<Box<dyn Remote>>) -> Self {
        Self { remotes }
    }

    pub fn is_empty(&self) -> bool {
        self.remotes.is_empty()
    }
}

impl SearchSource for RemoteSearch {
    fn search(
        &self,
        pattern: &SearchPattern,
        case: CaseMatch,
    ) -> Result<Vec<Reference>, SearchError> {
        for remote in &self.remotes {
            let found = remote.search(pattern, case)?;
            if !found.is_empty() {
                debug!(
                    "Remote '{}' found {} references for '{}'",
                    remote.name(),
                    found.len(),
                    pattern
                );
                return Ok(found);
            }
        }

        debug!("No remote found references for '{}'", pattern);
        Ok(Vec::new())
    }
}

/// On-disk index document listing the references a remote publishes
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct IndexDocument {
    pub references: Vec<String>,
}

/// Remote backed by a JSON index file: `{"references": ["name/version@user/channel#rev", ...]}`
///
/// The file is re-read on every search.
pub struct IndexRemote {
    name: String,
    path: PathBuf,
}

impl IndexRemote {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    fn load(&self) -> Result<Vec<Reference>, SearchError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| SearchError::Io {
            path: self.path.clone(),
            source,
        })?;
        let document: IndexDocument =
            serde_json::from_str(&content).map_err(|source| SearchError::InvalidIndex {
                path: self.path.clone(),
                source,
            })?;

        let references = document
            .references
            .iter()
            .filter_map(|entry| {
                entry
                    .parse::<Reference>()
                    .inspect_err(|e| {
                        warn!("Skipping entry of remote '{}': {}", self.name, e)
                    })
                    .ok()
            })
            .collect();

        Ok(references)
    }
}

impl Remote for IndexRemote {
    fn name(&self) -> &str {
        &self.name
    }

    fn search(
        &self,
        pattern: &SearchPattern,
        case: CaseMatch,
    ) -> Result<Vec<Reference>, SearchError> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|reference| pattern.matches(reference, case))
            .collect())
    }
}
