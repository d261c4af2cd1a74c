use crate::app_config::{AppConfig, Environment};
use crate::filter::MatchFilter;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// development config pointing at the CSV files in the working directory.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::num::NonZeroUsize;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_f32 = |var: &str, default: &str| -> Result<f32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<f32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("ESBMAP_ENV", "development"))?;

    let bind_addr = or_default("ESBMAP_BIND_ADDR", "0.0.0.0:8501")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("ESBMAP_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("ESBMAP_LOG_LEVEL", "info");

    let esb_path = PathBuf::from(or_default(
        "ESBMAP_ESB_PATH",
        "Tarikan_data_ESB_3_Pulau_2025.csv",
    ));
    let scraper_path = PathBuf::from(or_default("ESBMAP_SCRAPER_PATH", "data_3_pulau_final.csv"));
    let match_path = PathBuf::from(or_default(
        "ESBMAP_MATCH_PATH",
        "esb_3pulau_exact_matching_matches.csv",
    ));

    let max_points = or_default("ESBMAP_MAX_POINTS", "1000")
        .trim()
        .parse::<NonZeroUsize>()
        .map_err(|e| invalid("ESBMAP_MAX_POINTS", e.to_string()))?;

    let min_confidence = parse_f32("ESBMAP_MIN_CONFIDENCE", "0.6")?;
    let max_distance = parse_f32("ESBMAP_MAX_DISTANCE", "1000")?;
    let match_filter = MatchFilter::new(min_confidence, max_distance).map_err(|e| {
        let var = match e {
            crate::CoreError::InvalidDistance(_) => "ESBMAP_MAX_DISTANCE",
            _ => "ESBMAP_MIN_CONFIDENCE",
        };
        invalid(var, e.to_string())
    })?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        esb_path,
        scraper_path,
        match_path,
        max_points,
        match_filter,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ESBMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
