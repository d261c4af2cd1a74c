pub mod analytics;
pub mod app_config;
pub mod columns;
pub mod config;
pub mod error;
pub mod filter;
pub mod records;

pub use analytics::{match_details, DatasetCounts, MatchDetail, MatchSummary};
pub use app_config::{AppConfig, Environment};
pub use columns::ColumnProjection;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use filter::MatchFilter;
pub use records::{
    Collection, DatasetBundle, GeoPoint, LocationRecord, MatchRecord, Record, SourceKind,
};
