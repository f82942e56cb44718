use std::path::PathBuf;

use clap::Args;

use crate::api::{API_BASE, UNIVERSE_LIMIT};

pub const BACKEND_URL: &str = "http://localhost:4000/api";

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Catalog service base url
    #[arg(long, env = "POKEPICK_API_BASE", default_value = API_BASE)]
    pub api_base: String,
    /// Backend base url (the `/team` and `/contact` routes live under it)
    #[arg(
        long,
        alias = "team-url",
        env = "POKEPICK_BACKEND_URL",
        default_value = BACKEND_URL
    )]
    pub backend_url: String,
    /// Keep the team and the inbox in memory instead of talking to the backend
    #[arg(long, alias = "offline-team")]
    pub offline: bool,
    /// How many catalog entries make up the searchable universe
    #[arg(long, default_value_t = UNIVERSE_LIMIT)]
    pub universe_limit: usize,
    #[arg(long, env = "POKEPICK_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
    /// Disable the on-disk response cache
    #[arg(long)]
    pub no_cache: bool,
    #[arg(long, env = "POKEPICK_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    pub api_base: String,
    pub backend_url: String,
    pub offline: bool,
    pub universe_limit: usize,
    pub cache_dir: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl RuntimeConfig {
    pub fn from_args(args: ConfigArgs) -> Self {
        let data_dir = args.cache_dir.unwrap_or_else(default_cache_dir);
        let log_file = args
            .log_file
            .unwrap_or_else(|| data_dir.join("pokepick.log"));
        Self {
            api_base: args.api_base,
            backend_url: args.backend_url,
            offline: args.offline,
            universe_limit: args.universe_limit.max(1),
            cache_dir: (!args.no_cache).then_some(data_dir),
            log_file,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            backend_url: BACKEND_URL.to_string(),
            offline: false,
            universe_limit: UNIVERSE_LIMIT,
            cache_dir: Some(default_cache_dir()),
            log_file: default_cache_dir().join("pokepick.log"),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    let base = std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    base.join(".cache").join("pokepick")
}
