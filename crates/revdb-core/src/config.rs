use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing is decoupled from the process environment so it can be tested with
/// a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_num = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let value = parse_num(var, default)?;
        u32::try_from(value).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = parse_num(var, default)?;
        usize::try_from(value).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("REVDB_ENV", "development"))?;
    let log_level = or_default("REVDB_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("REVDB_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("REVDB_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_num("REVDB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let extractor_timeout_secs = parse_num("REVDB_EXTRACTOR_TIMEOUT_SECS", "15")?;
    let max_concurrent_sources = parse_usize("REVDB_MAX_CONCURRENT_SOURCES", "2")?;
    let max_snippets_per_source = parse_usize("REVDB_MAX_SNIPPETS_PER_SOURCE", "25")?;
    let min_snippet_chars = parse_usize("REVDB_MIN_SNIPPET_CHARS", "10")?;
    let max_review_chars = parse_usize("REVDB_MAX_REVIEW_CHARS", "1000")?;
    let freshness_window_secs = parse_num("REVDB_FRESHNESS_WINDOW_SECS", "86400")?;
    let freshness_min_rows = i64::from(parse_u32("REVDB_FRESHNESS_MIN_ROWS", "5")?);
    let fetch_timeout_secs = parse_num("REVDB_FETCH_TIMEOUT_SECS", "10")?;

    let amazon_base_url = or_default("REVDB_AMAZON_BASE_URL", "https://www.amazon.in");
    let flipkart_base_url = or_default("REVDB_FLIPKART_BASE_URL", "https://www.flipkart.com");

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        extractor_timeout_secs,
        max_concurrent_sources,
        max_snippets_per_source,
        min_snippet_chars,
        max_review_chars,
        freshness_window_secs,
        freshness_min_rows,
        fetch_timeout_secs,
        amazon_base_url: amazon_base_url.trim_end_matches('/').to_string(),
        flipkart_base_url: flipkart_base_url.trim_end_matches('/').to_string(),
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REVDB_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}
