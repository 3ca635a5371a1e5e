use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

use crate::resolve::orchestrator::SearchStrategy;
use crate::search::error::SearchError;
use crate::search::local::LocalCache;
use crate::search::remote::{IndexRemote, Remote, RemoteSearch};

/// Application directory name under the XDG data home
pub const APP_NAME: &str = "require-resolver";

/// Resolver configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    pub strategy: SearchStrategy,
    pub cache: CacheConfig,
    pub remotes: Vec<RemoteConfig>,
}

/// Local cache configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    pub enabled: bool,
    /// Database path, defaults to [`db_path`]
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

/// A remote backed by an index file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RemoteConfig {
    pub name: String,
    pub index: PathBuf,
}

impl FromStr for RemoteConfig {
    type Err = String;

    /// Parse `NAME=PATH`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, index)) if !name.is_empty() && !index.is_empty() => Ok(Self {
                name: name.to_string(),
                index: PathBuf::from(index),
            }),
            _ => Err(format!("expected NAME=PATH, got '{}'", s)),
        }
    }
}

impl ResolverConfig {
    /// Open the local cache, creating its directory when needed
    ///
    /// Returns None when the cache is disabled.
    pub fn open_local_cache(&self) -> Result<Option<LocalCache>, SearchError> {
        if !self.cache.enabled {
            return Ok(None);
        }

        let path = self.cache.path.clone().unwrap_or_else(db_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SearchError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        LocalCache::open(&path).map(Some)
    }

    /// Remotes in configuration order
    pub fn remote_search(&self) -> RemoteSearch {
        RemoteSearch::new(
            self.remotes
                .iter()
                .map(|remote| {
                    Box::new(IndexRemote::new(&remote.name, &remote.index)) as Box<dyn Remote>
                })
                .collect(),
        )
    }
}

/// Returns the path to the data directory for require-resolver.
/// Uses $XDG_DATA_HOME/require-resolver if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/require-resolver,
/// or ./require-resolver if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the local cache database.
pub fn db_path() -> PathBuf {
    data_dir().join("cache.db")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_NAME)
}
