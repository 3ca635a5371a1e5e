mod common;

use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use common::{RecordingNotifier, create_test_cache, create_test_remotes, reference};
use require_resolver::resolve::error::ResolveError;
use require_resolver::resolve::orchestrator::SearchStrategy;
use require_resolver::resolve::requirement::Requirement;
use require_resolver::resolve::resolver::{Resolution, RequirementResolver};
use require_resolver::search::SearchSource;
use require_resolver::search::remote::{IndexRemote, Remote, RemoteSearch};

fn resolver(
    local: Option<Arc<dyn SearchSource>>,
    remote: Arc<dyn SearchSource>,
    strategy: SearchStrategy,
) -> (RequirementResolver, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let resolver = RequirementResolver::new(local, remote, strategy, notifier.clone());
    (resolver, notifier)
}

#[test]
fn resolves_highest_satisfying_version_from_local_cache() {
    let dir = TempDir::new().unwrap();
    let cache = create_test_cache(
        &dir,
        &[
            "zlib/1.0.0@conan/stable",
            "zlib/1.2.0@conan/stable",
            "zlib/2.0.0@conan/stable",
            "zlib/notaversion@conan/stable",
        ],
    );
    let remotes = create_test_remotes(&dir, &[]);
    let (resolver, notifier) = resolver(Some(Arc::new(cache)), remotes, SearchStrategy::PreferCache);

    let mut requirement: Requirement = "zlib/[>=1.0.0,<2.0.0]@conan/stable".parse().unwrap();
    let resolution = resolver.resolve(&requirement, "app/1.0@user/testing").unwrap();
    resolution.apply(&mut requirement);

    assert_eq!(requirement.reference, reference("zlib/1.2.0@conan/stable"));
    assert!(requirement.is_resolved());
    assert_eq!(
        notifier.warnings(),
        vec!["Version 'notaversion' is not semver, cannot be compared with a range"]
    );
    assert_eq!(
        notifier.successes(),
        vec![
            "Version range '>=1.0.0,<2.0.0' required by 'app/1.0@user/testing' resolved to 'zlib/1.2.0@conan/stable'"
        ]
    );
}

#[rstest]
#[case(SearchStrategy::PreferCache, "zlib/1.2.0@conan/stable")]
#[case(SearchStrategy::PreferFresh, "zlib/1.3.0@conan/stable#2")]
fn strategy_decides_which_source_wins(#[case] strategy: SearchStrategy, #[case] expected: &str) {
    let dir = TempDir::new().unwrap();
    let cache = create_test_cache(&dir, &["zlib/1.2.0@conan/stable"]);
    let remotes = create_test_remotes(
        &dir,
        &[("center", &["zlib/1.3.0@conan/stable#1", "zlib/1.3.0@conan/stable#2"])],
    );
    let (resolver, _notifier) = resolver(Some(Arc::new(cache)), remotes, strategy);

    let requirement: Requirement = "zlib/[~1]@conan/stable".parse().unwrap();
    let resolution = resolver.resolve(&requirement, "app/1.0").unwrap();

    assert_eq!(resolution, Resolution::Resolved(reference(expected)));
}

#[test]
fn falls_back_to_remotes_in_configuration_order() {
    let dir = TempDir::new().unwrap();
    let cache = create_test_cache(&dir, &["zlib/0.9.0@conan/stable"]);
    let remotes = create_test_remotes(
        &dir,
        &[
            ("empty", &[]),
            ("center", &["zlib/1.1.0@conan/stable"]),
            ("mirror", &["zlib/1.5.0@conan/stable"]),
        ],
    );
    let (resolver, _notifier) = resolver(Some(Arc::new(cache)), remotes, SearchStrategy::PreferCache);

    let requirement: Requirement = "zlib/[>=1.0]@conan/stable".parse().unwrap();

    assert_eq!(
        resolver.resolve(&requirement, "app/1.0").unwrap(),
        Resolution::Resolved(reference("zlib/1.1.0@conan/stable"))
    );
}

#[test]
fn other_channels_and_names_are_not_candidates() {
    let dir = TempDir::new().unwrap();
    let cache = create_test_cache(
        &dir,
        &[
            "zlib/1.9.0@conan/testing",
            "ZLIB/1.8.0@conan/stable",
            "zlib-ng/1.7.0@conan/stable",
            "zlib/1.1.0@conan/stable",
        ],
    );
    let remotes = create_test_remotes(&dir, &[]);
    let (resolver, _notifier) = resolver(Some(Arc::new(cache)), remotes, SearchStrategy::PreferCache);

    let requirement: Requirement = "zlib/[>=1.0]@conan/stable".parse().unwrap();

    assert_eq!(
        resolver.resolve(&requirement, "app/1.0").unwrap(),
        Resolution::Resolved(reference("zlib/1.1.0@conan/stable"))
    );
}

#[test]
fn unresolvable_range_reports_requirement() {
    let dir = TempDir::new().unwrap();
    let cache = create_test_cache(&dir, &["zlib/1.0.0@conan/stable"]);
    let remotes = create_test_remotes(&dir, &[("center", &["zlib/1.1.0@conan/stable"])]);
    let (resolver, notifier) = resolver(Some(Arc::new(cache)), remotes, SearchStrategy::PreferCache);

    let requirement: Requirement = "zlib/[>=3.0]@conan/stable".parse().unwrap();
    let err = resolver.resolve(&requirement, "app/1.0").unwrap_err();

    assert!(matches!(err, ResolveError::Unresolvable { .. }));
    assert_eq!(
        err.to_string(),
        "The version in '>=3.0' from requirement 'zlib/[>=3.0]@conan/stable' could not be resolved"
    );
    assert!(notifier.successes().is_empty());
}

#[test]
fn resolves_from_remotes_without_local_cache() {
    let dir = TempDir::new().unwrap();
    let remotes = create_test_remotes(
        &dir,
        &[("center", &["fmt/8.0.1", "fmt/8.1.1", "fmt/9.0.0"])],
    );
    let (resolver, _notifier) = resolver(None, remotes, SearchStrategy::PreferCache);

    let requirement: Requirement = "fmt/[^8]".parse().unwrap();

    assert_eq!(
        resolver.resolve(&requirement, "app/1.0").unwrap(),
        Resolution::Resolved(reference("fmt/8.1.1"))
    );
}

#[test]
fn fixed_requirement_is_validated_without_searching() {
    let dir = TempDir::new().unwrap();
    // A missing index would fail if the remote were searched
    let missing = IndexRemote::new("missing", dir.path().join("missing.json"));
    let remotes = Arc::new(RemoteSearch::new(vec![Box::new(missing) as Box<dyn Remote>]));
    let (resolver, notifier) = resolver(None, remotes, SearchStrategy::PreferFresh);

    let satisfied = Requirement::fixed(">=1.0", reference("zlib/1.2.11@conan/stable"));
    assert_eq!(
        resolver.resolve(&satisfied, "app/1.0").unwrap(),
        Resolution::Unchanged
    );
    assert_eq!(notifier.successes().len(), 1);

    let violated = Requirement::fixed(">=2.0", reference("zlib/1.2.11@conan/stable"));
    let err = resolver.resolve(&violated, "app/1.0").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Version range '>=2.0' required by 'app/1.0' not valid for downstream requirement 'zlib/1.2.11@conan/stable'"
    );
}

#[test]
fn resolver_is_reusable_across_requirements() {
    let dir = TempDir::new().unwrap();
    let cache = create_test_cache(
        &dir,
        &["zlib/1.2.11@conan/stable", "bzip2/1.0.6@conan/stable", "bzip2/1.0.8@conan/stable"],
    );
    let remotes = create_test_remotes(&dir, &[]);
    let (resolver, notifier) = resolver(Some(Arc::new(cache)), remotes, SearchStrategy::PreferCache);

    let zlib: Requirement = "zlib/[~1.2]@conan/stable".parse().unwrap();
    let bzip2: Requirement = "bzip2/[1.0.x]@conan/stable".parse().unwrap();

    assert_eq!(
        resolver.resolve(&zlib, "app/1.0").unwrap(),
        Resolution::Resolved(reference("zlib/1.2.11@conan/stable"))
    );
    assert_eq!(
        resolver.resolve(&bzip2, "app/1.0").unwrap(),
        Resolution::Resolved(reference("bzip2/1.0.8@conan/stable"))
    );
    assert_eq!(notifier.successes().len(), 2);
}
