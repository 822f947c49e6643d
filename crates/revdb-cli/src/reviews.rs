//! Read-only review query handlers.

use revdb_core::{truncate_chars, AppConfig};

use crate::db::connect;

const PREVIEW_CHARS: usize = 60;

/// Print the most recent reviews, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or `limit` is not positive.
pub(crate) async fn run_list(
    config: &AppConfig,
    product: Option<&str>,
    limit: i64,
    json: bool,
) -> anyhow::Result<()> {
    if limit <= 0 {
        anyhow::bail!("--limit must be positive, got {limit}");
    }

    let pool = connect(config).await?;
    let rows = revdb_db::list_recent_reviews(&pool, product, limit).await?;
    pool.close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!(
            "no reviews stored{}; run `revdb ingest <query>` first",
            product
                .map(|p| format!(" matching '{p}'"))
                .unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "{:<18}{:<24}{:<10}{:<10}{:>7}  TEXT",
        "CREATED", "PRODUCT", "SOURCE", "LABEL", "SCORE"
    );
    for row in &rows {
        let created = row.created_at.format("%Y-%m-%d %H:%M").to_string();
        println!(
            "{:<18}{:<24}{:<10}{:<10}{:>7.3}  {}",
            created,
            truncate_chars(&row.product_name, 22),
            row.source,
            row.sentiment_label,
            row.sentiment_score,
            truncate_chars(&row.review_text, PREVIEW_CHARS)
        );
    }

    Ok(())
}
