#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use lang_portal_backend::create_app;
use lang_portal_backend::db::Database;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    _tmp: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let db_path = tmp.path().join("test.db");
    let url = format!("sqlite:{}?mode=rwc", db_path.display());

    let db = Database::connect(&url).await.expect("failed to open test db");
    db.init_schema().await.expect("failed to apply schema");

    let pool = db.pool().clone();
    TestApp {
        router: create_app(db),
        pool,
        _tmp: tmp,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        read_json(response).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        read_json(response).await
    }

    /// POST with no body and no content type, for the missing-JSON cases.
    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        read_json(response).await
    }
}

async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn insert_group(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query("INSERT INTO groups (name, created_at) VALUES (?, datetime('now'))")
        .bind(name)
        .execute(pool)
        .await
        .expect("failed to insert group")
        .last_insert_rowid()
}

pub async fn insert_activity(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query("INSERT INTO study_activities (name, created_at) VALUES (?, datetime('now'))")
        .bind(name)
        .execute(pool)
        .await
        .expect("failed to insert activity")
        .last_insert_rowid()
}

pub async fn insert_word(pool: &SqlitePool, kanji: &str, romaji: &str, english: &str) -> i64 {
    sqlx::query(
        "INSERT INTO words (kanji, romaji, english, created_at) VALUES (?, ?, ?, datetime('now'))",
    )
    .bind(kanji)
    .bind(romaji)
    .bind(english)
    .execute(pool)
    .await
    .expect("failed to insert word")
    .last_insert_rowid()
}

pub async fn insert_session_at(
    pool: &SqlitePool,
    group_id: i64,
    activity_id: i64,
    created_at: &str,
) -> i64 {
    sqlx::query(
        r#"
        INSERT INTO study_sessions (group_id, study_activity_id, completed, created_at)
        VALUES (?, ?, 0, ?)
        "#,
    )
    .bind(group_id)
    .bind(activity_id)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("failed to insert session")
    .last_insert_rowid()
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    // Test-only helper; table names come from string literals in the tests.
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("failed to count rows")
}

pub async fn word_counters(pool: &SqlitePool, word_id: i64) -> (i64, i64) {
    sqlx::query_as("SELECT correct_count, wrong_count FROM words WHERE id = ?")
        .bind(word_id)
        .fetch_one(pool)
        .await
        .expect("failed to read word counters")
}
