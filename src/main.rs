mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use require_resolver::config::{CacheConfig, RemoteConfig, ResolverConfig};
use require_resolver::notify::TracingNotifier;
use require_resolver::reference::Reference;
use require_resolver::resolve::orchestrator::SearchStrategy;
use require_resolver::resolve::requirement::Requirement;
use require_resolver::resolve::resolver::{Resolution, RequirementResolver};
use require_resolver::search::SearchSource;
use require_resolver::search::local::LocalCache;
use require_resolver::search::query::{CaseMatch, SearchPattern};

#[derive(Parser)]
#[command(name = "require-resolver")]
#[command(version, about = "Resolve version-range requirements against a local cache and remotes")]
struct Cli {
    #[command(flatten)]
    sources: SourceArgs,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SourceArgs {
    /// Remote index, searched in the given order
    #[arg(long = "remote", value_name = "NAME=PATH", global = true)]
    remotes: Vec<RemoteConfig>,

    /// Local cache database
    #[arg(long, value_name = "PATH", global = true)]
    cache: Option<PathBuf>,

    /// Do not use the local cache
    #[arg(long, global = true, conflicts_with = "cache")]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a requirement such as `zlib/[>=1.2 <2]@conan/stable`
    Resolve {
        requirement: String,

        /// Reference of the package declaring the requirement
        #[arg(long, default_value = "consumer")]
        requester: String,

        /// Prefer remotes over the local cache
        #[arg(long)]
        update: bool,
    },
    /// Manage the local cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// List cached and remote references matching a glob pattern
    Search {
        pattern: String,

        #[arg(long)]
        ignore_case: bool,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Record references as present in the cache
    Add {
        #[arg(required = true)]
        references: Vec<String>,
    },
    /// Remove a reference; without a revision every revision is removed
    Remove { reference: String },
    /// List cached references
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init("info", cli.log_file.as_deref(), cli.log_json)?;

    match cli.command {
        Command::Resolve {
            requirement,
            requester,
            update,
        } => {
            let config = config_from(&cli.sources, SearchStrategy::from_update(update));
            resolve(&config, &requirement, &requester)
        }
        Command::Cache { action } => {
            let config = config_from(&cli.sources, SearchStrategy::default());
            cache(&config, action)
        }
        Command::Search {
            pattern,
            ignore_case,
        } => {
            let config = config_from(&cli.sources, SearchStrategy::default());
            let case = if ignore_case {
                CaseMatch::Insensitive
            } else {
                CaseMatch::Exact
            };
            search(&config, &pattern, case)
        }
    }
}

fn config_from(sources: &SourceArgs, strategy: SearchStrategy) -> ResolverConfig {
    ResolverConfig {
        strategy,
        cache: CacheConfig {
            enabled: !sources.no_cache,
            path: sources.cache.clone(),
        },
        remotes: sources.remotes.clone(),
    }
}

fn resolve(config: &ResolverConfig, requirement: &str, requester: &str) -> anyhow::Result<()> {
    let mut requirement: Requirement = requirement
        .parse()
        .with_context(|| format!("Invalid requirement '{}'", requirement))?;

    let local = config
        .open_local_cache()?
        .map(|cache| Arc::new(cache) as Arc<dyn SearchSource>);
    let resolver = RequirementResolver::new(
        local,
        Arc::new(config.remote_search()),
        config.strategy,
        Arc::new(TracingNotifier),
    );

    let resolution = resolver.resolve(&requirement, requester)?;
    if resolution == Resolution::Unchanged {
        tracing::debug!("Requirement '{}' left unchanged", requirement);
    }
    resolution.apply(&mut requirement);

    println!("{}", requirement);
    Ok(())
}

fn open_cache(config: &ResolverConfig) -> anyhow::Result<LocalCache> {
    config
        .open_local_cache()?
        .context("The local cache is disabled")
}

fn cache(config: &ResolverConfig, action: CacheAction) -> anyhow::Result<()> {
    let cache = open_cache(config)?;

    match action {
        CacheAction::Add { references } => {
            for reference in references {
                let reference: Reference = reference.parse()?;
                if !cache.add(&reference)? {
                    tracing::info!("'{}' is already cached", reference);
                }
            }
        }
        CacheAction::Remove { reference } => {
            let reference: Reference = reference.parse()?;
            let removed = cache.remove(&reference)?;
            tracing::info!("Removed {} references matching '{}'", removed, reference);
        }
        CacheAction::List => {
            for reference in cache.list()? {
                println!("{}", reference);
            }
        }
    }

    Ok(())
}

fn search(config: &ResolverConfig, pattern: &str, case: CaseMatch) -> anyhow::Result<()> {
    let pattern = SearchPattern::new(pattern)?;

    if let Some(cache) = config.open_local_cache()? {
        for reference in cache.search(&pattern, case)? {
            println!("{} (cache)", reference);
        }
    }
    for reference in config.remote_search().search(&pattern, case)? {
        println!("{} (remote)", reference);
    }

    Ok(())
}
