//! Candidate reference sources
//!
//! # Modules
//!
//! - [`query`]: Search queries, glob patterns and case matching
//! - [`local`]: SQLite-backed cache of references available locally
//! - [`remote`]: Remotes and the ordered search across them
//! - [`error`]: Error types for search sources

pub mod error;
pub mod local;
pub mod query;
pub mod remote;

#[cfg(test)]
use mockall::automock;

use crate::reference::Reference;
use crate::search::error::SearchError;
use crate::search::query::{CaseMatch, SearchPattern};

/// Trait for looking up references matching a search pattern
#[cfg_attr(test, automock)]
pub trait SearchSource: Send + Sync {
    /// Returns every known reference whose textual form matches `pattern`
    ///
    /// An empty result means nothing matched; errors are failures of the
    /// underlying store and are not retried by callers.
    fn search(
        &self,
        pattern: &SearchPattern,
        case: CaseMatch,
    ) -> Result<Vec<Reference>, SearchError>;
}
