use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::filter::MatchFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub esb_path: PathBuf,
    pub scraper_path: PathBuf,
    pub match_path: PathBuf,
    /// Point cap per layer; the match source is capped at half of it.
    pub max_points: NonZeroUsize,
    /// Default confidence/distance filter when a caller supplies none.
    pub match_filter: MatchFilter,
}
