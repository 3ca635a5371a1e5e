use std::sync::Arc;

use tracing::debug;

use crate::notify::Notifier;
use crate::reference::Reference;
use crate::resolve::error::ResolveError;
use crate::resolve::orchestrator::{SearchOrchestrator, SearchStrategy};
use crate::resolve::requirement::Requirement;
use crate::search::SearchSource;
use crate::search::query::SearchQuery;
use crate::version::comparator::{LooseSemverComparator, VersionComparator};
use crate::version::range::VersionRange;

/// Outcome of resolving one requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The range resolved to this reference
    Resolved(Reference),
    /// Nothing to change: no range, or the pinned reference already satisfies it
    Unchanged,
}

impl Resolution {
    /// Write the outcome back into `requirement`
    pub fn apply(self, requirement: &mut Requirement) {
        if let Resolution::Resolved(reference) = self {
            requirement.reference = reference;
            requirement.resolved = true;
        }
    }
}

/// Resolves version-range requirements against a local cache and remotes
///
/// Holds only immutable configuration and can be reused for any number of
/// sequential `resolve` calls.
pub struct RequirementResolver {
    orchestrator: SearchOrchestrator,
    comparator: Arc<dyn VersionComparator>,
    notifier: Arc<dyn Notifier>,
}

impl RequirementResolver {
    pub fn new(
        local: Option<Arc<dyn SearchSource>>,
        remote: Arc<dyn SearchSource>,
        strategy: SearchStrategy,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            orchestrator: SearchOrchestrator::new(local, remote, strategy),
            comparator: Arc::new(LooseSemverComparator),
            notifier,
        }
    }

    /// Replace the version comparator (loose SemVer by default)
    pub fn with_comparator(mut self, comparator: Arc<dyn VersionComparator>) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.orchestrator.strategy()
    }

    /// Resolve `requirement`, declared by `requester`
    ///
    /// The requirement itself is never modified; apply the returned
    /// [`Resolution`] to write a resolved reference back.
    pub fn resolve(
        &self,
        requirement: &Requirement,
        requester: &str,
    ) -> Result<Resolution, ResolveError> {
        let Some(range_expr) = requirement.version_range.as_deref() else {
            return Ok(Resolution::Unchanged);
        };
        let range = VersionRange::parse(range_expr)?;

        if requirement.is_resolved() {
            return self.validate_fixed(requirement, &range, requester);
        }

        let query = SearchQuery::any_version(&requirement.reference);
        debug!("Resolving '{}' for {} with query {}", range, requester, query);

        let found = self.orchestrator.find(
            &query,
            &range,
            self.comparator.as_ref(),
            self.notifier.as_ref(),
        )?;

        match found {
            Some(reference) => {
                self.notifier.success(&format!(
                    "Version range '{}' required by '{}' resolved to '{}'",
                    range, requester, reference
                ));
                Ok(Resolution::Resolved(reference))
            }
            None => Err(ResolveError::Unresolvable {
                range: range_expr.to_string(),
                requirement: requirement.to_string(),
            }),
        }
    }

    /// The pinned reference is the only candidate
    fn validate_fixed(
        &self,
        requirement: &Requirement,
        range: &VersionRange,
        requester: &str,
    ) -> Result<Resolution, ResolveError> {
        let reference = &requirement.reference;
        let satisfied = self
            .comparator
            .satisfying(
                std::slice::from_ref(&reference.version),
                range,
                self.notifier.as_ref(),
            )
            .is_some();

        if !satisfied {
            return Err(ResolveError::RangeMismatch {
                range: range.to_string(),
                requester: requester.to_string(),
                reference: reference.clone(),
            });
        }

        self.notifier.success(&format!(
            "Version range '{}' required by '{}' valid for downstream requirement '{}'",
            range, requester, reference
        ));
        Ok(Resolution::Unchanged)
    }
}
