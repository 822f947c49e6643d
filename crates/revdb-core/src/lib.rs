//! Shared domain types and configuration for the review ingestion workspace.

mod app_config;
mod config;
mod ingest_config;
mod review;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use ingest_config::IngestConfig;
pub use review::{truncate_chars, ScoredReview, SentimentLabel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid sentiment label: {0}")]
    InvalidSentimentLabel(String),
}
