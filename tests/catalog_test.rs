use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{insert_activity, insert_group, insert_word, spawn_app};

#[tokio::test]
async fn words_list_is_paginated_and_ordered() {
    let app = spawn_app().await;
    insert_word(&app.pool, "水", "mizu", "water").await;
    insert_word(&app.pool, "犬", "inu", "dog").await;
    insert_word(&app.pool, "猫", "neko", "cat").await;

    let (status, body) = app.get("/api/words?page=1&per_page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(3));
    assert_eq!(body["total_pages"], json!(2));

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    // Ordered by kanji code point: 水 (U+6C34) < 犬 (U+72AC) < 猫 (U+732B).
    assert_eq!(items[0]["kanji"], json!("水"));
    assert_eq!(items[1]["kanji"], json!("犬"));
    assert_eq!(items[0]["correct_count"], json!(0));
    assert_eq!(items[0]["wrong_count"], json!(0));
}

#[tokio::test]
async fn non_numeric_page_params_fall_back_to_defaults() {
    let app = spawn_app().await;
    insert_word(&app.pool, "犬", "inu", "dog").await;

    let (status, body) = app.get("/api/words?page=abc&per_page=xyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], json!(1));
    assert_eq!(body["per_page"], json!(10));
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn word_lookup_by_id() {
    let app = spawn_app().await;
    let word_id = insert_word(&app.pool, "犬", "inu", "dog").await;

    let (status, body) = app.get(&format!("/api/words/{word_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kanji"], json!("犬"));
    assert_eq!(body["romaji"], json!("inu"));
    assert_eq!(body["english"], json!("dog"));

    let (status, body) = app.get("/api/words/99999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Word not found"));
}

#[tokio::test]
async fn groups_list_and_lookup() {
    let app = spawn_app().await;
    let group_id = insert_group(&app.pool, "Core Verbs").await;
    insert_group(&app.pool, "Animals").await;

    let (status, body) = app.get("/api/groups").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(2));
    let items = body["items"].as_array().unwrap();
    assert_eq!(items[0]["name"], json!("Animals"));

    let (status, body) = app.get(&format!("/api/groups/{group_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("Core Verbs"));

    let (status, body) = app.get("/api/groups/99999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Group not found"));
}

#[tokio::test]
async fn activities_list_is_unpaginated() {
    let app = spawn_app().await;
    insert_activity(&app.pool, "Typing Tutor").await;
    insert_activity(&app.pool, "Flashcards").await;

    let (status, body) = app.get("/api/study-activities").await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], json!("Flashcards"));
}

#[tokio::test]
async fn health_reports_connected_database() {
    let app = spawn_app().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["database"], json!("connected"));

    let (status, body) = app.get("/health/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], json!("lang-portal-backend"));
}

#[tokio::test]
async fn unknown_routes_get_json_404() {
    let app = spawn_app().await;

    let (status, body) = app.get("/nonexistent/path").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Route not found"));
}
