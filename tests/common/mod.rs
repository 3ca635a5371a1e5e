//! Shared fixtures for resolver integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde_json::json;
use tempfile::TempDir;

use require_resolver::notify::Notifier;
use require_resolver::reference::Reference;
use require_resolver::search::local::LocalCache;
use require_resolver::search::remote::{IndexRemote, Remote, RemoteSearch};

/// Notifier keeping every message for later assertions
#[derive(Default)]
pub struct RecordingNotifier {
    warnings: Mutex<Vec<String>>,
    successes: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }
}

pub fn reference(s: &str) -> Reference {
    s.parse().unwrap()
}

/// Create a local cache holding `references`
pub fn create_test_cache(dir: &TempDir, references: &[&str]) -> LocalCache {
    let cache = LocalCache::open(&dir.path().join("cache.db")).unwrap();
    for r in references {
        cache.add(&reference(r)).unwrap();
    }
    cache
}

/// Write a remote index file and return its path
pub fn write_index(dir: &TempDir, name: &str, references: &[&str]) -> PathBuf {
    let path = dir.path().join(format!("{}.json", name));
    let document = json!({ "references": references });
    std::fs::write(&path, document.to_string()).unwrap();
    path
}

/// Remote search over one index file per `(name, references)` entry, in order
pub fn create_test_remotes(dir: &TempDir, remotes: &[(&str, &[&str])]) -> Arc<RemoteSearch> {
    let remotes = remotes
        .iter()
        .map(|(name, references)| {
            let path = write_index(dir, name, references);
            Box::new(IndexRemote::new(*name, path)) as Box<dyn Remote>
        })
        .collect();
    Arc::new(RemoteSearch::new(remotes))
}
