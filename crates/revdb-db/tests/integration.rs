//! Offline unit tests for revdb-db pool configuration and row types.
//! These tests do not require a live database connection.

use revdb_core::{AppConfig, Environment, SentimentLabel};
use revdb_db::{PoolConfig, ReviewRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        extractor_timeout_secs: 15,
        max_concurrent_sources: 2,
        max_snippets_per_source: 25,
        min_snippet_chars: 10,
        max_review_chars: 1000,
        freshness_window_secs: 86_400,
        freshness_min_rows: 5,
        fetch_timeout_secs: 10,
        amazon_base_url: "https://www.amazon.in".to_string(),
        flipkart_base_url: "https://www.flipkart.com".to_string(),
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`ReviewRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn review_row_has_expected_fields() {
    use chrono::Utc;

    let row = ReviewRow {
        id: 7_i64,
        product_name: "wireless mouse".to_string(),
        review_text: "Battery died in 2 days".to_string(),
        sentiment_label: "Negative".to_string(),
        sentiment_score: -0.6_f64,
        source: "Flipkart".to_string(),
        created_at: Utc::now(),
    };

    assert_eq!(row.id, 7);
    assert_eq!(row.product_name, "wireless mouse");
    assert_eq!(row.source, "Flipkart");
    assert_eq!(row.label().unwrap(), SentimentLabel::Negative);
}
