//! Ordering of local and remote searches

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::notify::Notifier;
use crate::reference::Reference;
use crate::resolve::candidates::CandidateSet;
use crate::resolve::revision::latest_revisions;
use crate::search::SearchSource;
use crate::search::error::SearchError;
use crate::search::query::{CaseMatch, SearchQuery};
use crate::version::comparator::VersionComparator;
use crate::version::range::VersionRange;

/// Which source is consulted first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchStrategy {
    /// Local cache first, then remotes
    #[default]
    PreferCache,
    /// Remotes first (possibly newer data), then the local cache
    PreferFresh,
}

impl SearchStrategy {
    /// Map the `update` flag: updating prefers fresh remote data
    pub fn from_update(update: bool) -> Self {
        if update {
            SearchStrategy::PreferFresh
        } else {
            SearchStrategy::PreferCache
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Local,
    Remote,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Local => f.write_str("local cache"),
            SourceKind::Remote => f.write_str("remotes"),
        }
    }
}

pub struct SearchOrchestrator {
    local: Option<Arc<dyn SearchSource>>,
    remote: Arc<dyn SearchSource>,
    strategy: SearchStrategy,
}

impl SearchOrchestrator {
    pub fn new(
        local: Option<Arc<dyn SearchSource>>,
        remote: Arc<dyn SearchSource>,
        strategy: SearchStrategy,
    ) -> Self {
        Self {
            local,
            remote,
            strategy,
        }
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Sources in consultation order
    fn sources(&self) -> Vec<(SourceKind, &dyn SearchSource)> {
        let local = self
            .local
            .as_deref()
            .map(|source| (SourceKind::Local, source));
        let remote = Some((SourceKind::Remote, self.remote.as_ref()));

        let order = match self.strategy {
            SearchStrategy::PreferCache => [local, remote],
            SearchStrategy::PreferFresh => [remote, local],
        };
        order.into_iter().flatten().collect()
    }

    /// Find the best reference satisfying `range`
    ///
    /// Sources are consulted in strategy order and the first one producing a
    /// satisfying reference wins; the remaining sources are not searched.
    pub fn find(
        &self,
        query: &SearchQuery,
        range: &VersionRange,
        comparator: &dyn VersionComparator,
        notifier: &dyn Notifier,
    ) -> Result<Option<Reference>, SearchError> {
        for (kind, source) in self.sources() {
            if let Some(found) = Self::find_in(kind, source, query, range, comparator, notifier)? {
                debug!("Resolved '{}' from {} to {}", range, kind, found);
                return Ok(Some(found));
            }
        }

        Ok(None)
    }

    fn find_in(
        kind: SourceKind,
        source: &dyn SearchSource,
        query: &SearchQuery,
        range: &VersionRange,
        comparator: &dyn VersionComparator,
        notifier: &dyn Notifier,
    ) -> Result<Option<Reference>, SearchError> {
        let pattern = query.pattern()?;
        // References must match the exact case of the query
        let found = source.search(&pattern, CaseMatch::Exact)?;
        debug!("Searched {} for '{}': {} references", kind, pattern, found.len());

        let candidates = CandidateSet::from_references(latest_revisions(found, query));
        if candidates.is_empty() {
            return Ok(None);
        }

        let best = comparator.satisfying(&candidates.versions(), range, notifier);
        Ok(best.and_then(|version| candidates.get(&version).cloned()))
    }
}
