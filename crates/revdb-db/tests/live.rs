//! Live integration tests for revdb-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. They need `DATABASE_URL` pointing at a server the test
//! user may create databases on, so they are ignored by default:
//!
//! ```sh
//! cargo test -p revdb-db --test live -- --ignored
//! ```

use chrono::{Duration, Utc};
use revdb_core::{ScoredReview, SentimentLabel};
use revdb_db::{count_recent_reviews, delete_all_reviews, insert_review, list_recent_reviews};

fn review(query: &str, text: &str, score: f64) -> ScoredReview {
    ScoredReview {
        product_query: query.to_string(),
        text: text.to_string(),
        sentiment_label: SentimentLabel::from_score(score),
        sentiment_score: score,
        source_name: "Amazon".to_string(),
        created_at: Utc::now(),
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn insert_then_list_returns_newest_first(pool: sqlx::PgPool) {
    let first = insert_review(&pool, &review("wireless mouse", "Great clicky buttons", 0.8))
        .await
        .expect("first insert failed");
    let second = insert_review(&pool, &review("wireless mouse", "Battery died in 2 days", -0.6))
        .await
        .expect("second insert failed");
    assert!(second > first);

    let rows = list_recent_reviews(&pool, None, 10)
        .await
        .expect("list failed");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].review_text, "Battery died in 2 days");
    assert_eq!(rows[0].label().unwrap(), SentimentLabel::Negative);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn count_recent_matches_substring_case_insensitively(pool: sqlx::PgPool) {
    for text in ["one review", "two review", "three review"] {
        insert_review(&pool, &review("Logitech Wireless Mouse", text, 0.0))
            .await
            .expect("insert failed");
    }
    insert_review(&pool, &review("keyboard", "unrelated row", 0.0))
        .await
        .expect("insert failed");

    let since = Utc::now() - Duration::hours(24);
    let count = count_recent_reviews(&pool, "wireless mouse", since)
        .await
        .expect("count failed");
    assert_eq!(count, 3);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn count_recent_ignores_rows_outside_window(pool: sqlx::PgPool) {
    let mut old = review("wireless mouse", "an old review", 0.0);
    old.created_at = Utc::now() - Duration::hours(48);
    insert_review(&pool, &old).await.expect("insert failed");

    let since = Utc::now() - Duration::hours(24);
    let count = count_recent_reviews(&pool, "wireless mouse", since)
        .await
        .expect("count failed");
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn count_recent_treats_wildcards_literally(pool: sqlx::PgPool) {
    insert_review(&pool, &review("wireless mouse", "some review text", 0.0))
        .await
        .expect("insert failed");

    let since = Utc::now() - Duration::hours(24);
    let count = count_recent_reviews(&pool, "%", since)
        .await
        .expect("count failed");
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn out_of_range_score_is_rejected_by_constraint(pool: sqlx::PgPool) {
    let bad = review("wireless mouse", "impossible score", 2.0);
    let result = insert_review(&pool, &bad).await;
    assert!(result.is_err(), "expected CHECK constraint violation");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn delete_all_reviews_empties_table(pool: sqlx::PgPool) {
    insert_review(&pool, &review("wireless mouse", "some review text", 0.0))
        .await
        .expect("insert failed");
    let deleted = delete_all_reviews(&pool).await.expect("delete failed");
    assert_eq!(deleted, 1);
    let rows = list_recent_reviews(&pool, None, 10)
        .await
        .expect("list failed");
    assert!(rows.is_empty());
}
