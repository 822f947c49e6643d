use std::time::Duration;

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

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub extractor_timeout_secs: u64,
    pub max_concurrent_sources: usize,
    pub max_snippets_per_source: usize,
    pub min_snippet_chars: usize,
    pub max_review_chars: usize,
    pub freshness_window_secs: u64,
    pub freshness_min_rows: i64,
    pub fetch_timeout_secs: u64,
    pub amazon_base_url: String,
    pub flipkart_base_url: String,
}

impl AppConfig {
    #[must_use]
    pub fn extractor_timeout(&self) -> Duration {
        Duration::from_secs(self.extractor_timeout_secs)
    }

    #[must_use]
    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.freshness_window_secs)
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("extractor_timeout_secs", &self.extractor_timeout_secs)
            .field("max_concurrent_sources", &self.max_concurrent_sources)
            .field("max_snippets_per_source", &self.max_snippets_per_source)
            .field("min_snippet_chars", &self.min_snippet_chars)
            .field("max_review_chars", &self.max_review_chars)
            .field("freshness_window_secs", &self.freshness_window_secs)
            .field("freshness_min_rows", &self.freshness_min_rows)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("amazon_base_url", &self.amazon_base_url)
            .field("flipkart_base_url", &self.flipkart_base_url)
            .finish()
    }
}
