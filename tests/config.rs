mod common;

use std::sync::Arc;

use tempfile::TempDir;

use common::{RecordingNotifier, reference, write_index};
use require_resolver::config::{CacheConfig, RemoteConfig, ResolverConfig};
use require_resolver::resolve::orchestrator::SearchStrategy;
use require_resolver::resolve::requirement::Requirement;
use require_resolver::resolve::resolver::{Resolution, RequirementResolver};
use require_resolver::search::SearchSource;

fn config(dir: &TempDir, remotes: Vec<RemoteConfig>, strategy: SearchStrategy) -> ResolverConfig {
    ResolverConfig {
        strategy,
        cache: CacheConfig {
            enabled: true,
            path: Some(dir.path().join("data/cache.db")),
        },
        remotes,
    }
}

fn resolver_from(config: &ResolverConfig) -> (RequirementResolver, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let local = config
        .open_local_cache()
        .unwrap()
        .map(|cache| Arc::new(cache) as Arc<dyn SearchSource>);
    let resolver = RequirementResolver::new(
        local,
        Arc::new(config.remote_search()),
        config.strategy,
        notifier.clone(),
    );
    (resolver, notifier)
}

#[test]
fn configured_sources_resolve_requirement() {
    let dir = TempDir::new().unwrap();
    let index = write_index(&dir, "center", &["zlib/1.2.13@conan/stable#1"]);
    let remote: RemoteConfig = format!("center={}", index.display()).parse().unwrap();
    let config = config(&dir, vec![remote], SearchStrategy::PreferCache);

    // Seed the cache through the same configuration
    config
        .open_local_cache()
        .unwrap()
        .unwrap()
        .add(&reference("zlib/1.2.11@conan/stable"))
        .unwrap();

    let (resolver, notifier) = resolver_from(&config);
    let requirement: Requirement = "zlib/[~1.2]@conan/stable".parse().unwrap();

    assert_eq!(
        resolver.resolve(&requirement, "app/1.0").unwrap(),
        Resolution::Resolved(reference("zlib/1.2.11@conan/stable"))
    );
    assert_eq!(notifier.successes().len(), 1);
}

#[test]
fn update_strategy_prefers_configured_remotes() {
    let dir = TempDir::new().unwrap();
    let index = write_index(&dir, "center", &["zlib/1.2.13@conan/stable#1"]);
    let config = config(
        &dir,
        vec![RemoteConfig {
            name: "center".to_string(),
            index,
        }],
        SearchStrategy::from_update(true),
    );
    config
        .open_local_cache()
        .unwrap()
        .unwrap()
        .add(&reference("zlib/1.2.11@conan/stable"))
        .unwrap();

    let (resolver, _notifier) = resolver_from(&config);
    let requirement: Requirement = "zlib/[~1.2]@conan/stable".parse().unwrap();

    assert_eq!(resolver.strategy(), SearchStrategy::PreferFresh);
    assert_eq!(
        resolver.resolve(&requirement, "app/1.0").unwrap(),
        Resolution::Resolved(reference("zlib/1.2.13@conan/stable#1"))
    );
}

#[test]
fn disabled_cache_is_never_consulted() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir, Vec::new(), SearchStrategy::PreferCache);
    config
        .open_local_cache()
        .unwrap()
        .unwrap()
        .add(&reference("zlib/1.2.11@conan/stable"))
        .unwrap();
    config.cache.enabled = false;

    let (resolver, notifier) = resolver_from(&config);
    let requirement: Requirement = "zlib/[~1.2]@conan/stable".parse().unwrap();

    assert!(resolver.resolve(&requirement, "app/1.0").is_err());
    assert!(notifier.successes().is_empty());
}
