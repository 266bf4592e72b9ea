use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::db::operations::placeholders;

/// A study session joined with its group/activity names and item count.
/// `end_time` mirrors `start_time`; a distinct end-of-session timestamp is
/// not tracked.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: i64,
    pub group_id: i64,
    pub group_name: String,
    pub activity_id: i64,
    pub activity_name: String,
    pub start_time: String,
    pub end_time: String,
    pub review_items_count: i64,
}

/// One reviewed word with counts scoped to a single session, as opposed to
/// the lifetime counters on the `words` row.
#[derive(Debug, Clone, Serialize)]
pub struct WordReviewSummary {
    pub id: i64,
    pub kanji: String,
    pub romaji: String,
    pub english: String,
    pub correct_count: i64,
    pub wrong_count: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReviewStats {
    pub total_reviews: i64,
    pub correct_count: i64,
    pub wrong_count: i64,
}

const SUMMARY_SELECT: &str = r#"
    SELECT
        ss.id,
        ss.group_id,
        g.name AS group_name,
        sa.id AS activity_id,
        sa.name AS activity_name,
        ss.created_at,
        COUNT(wri.id) AS review_items_count
    FROM study_sessions ss
    JOIN groups g ON g.id = ss.group_id
    JOIN study_activities sa ON sa.id = ss.study_activity_id
    LEFT JOIN word_review_items wri ON wri.study_session_id = ss.id
"#;

pub async fn group_and_activity_exist(
    pool: &SqlitePool,
    group_id: i64,
    study_activity_id: i64,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT g.id
        FROM groups g, study_activities sa
        WHERE g.id = ? AND sa.id = ?
        "#,
    )
    .bind(group_id)
    .bind(study_activity_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

pub async fn insert_session(
    tx: &mut Transaction<'_, Sqlite>,
    group_id: i64,
    study_activity_id: i64,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO study_sessions (group_id, study_activity_id, completed, created_at)
        VALUES (?, ?, 0, datetime('now'))
        "#,
    )
    .bind(group_id)
    .bind(study_activity_id)
    .execute(&mut **tx)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_review_item(
    tx: &mut Transaction<'_, Sqlite>,
    session_id: i64,
    word_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO word_review_items (study_session_id, word_id, correct, created_at)
        VALUES (?, ?, 0, datetime('now'))
        "#,
    )
    .bind(session_id)
    .bind(word_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn fetch_session_summary(
    pool: &SqlitePool,
    session_id: i64,
) -> Result<Option<SessionSummary>, sqlx::Error> {
    let sql = format!("{SUMMARY_SELECT} WHERE ss.id = ? GROUP BY ss.id");
    let row = sqlx::query(&sql).bind(session_id).fetch_optional(pool).await?;
    Ok(row.as_ref().map(map_session_summary))
}

pub async fn count_sessions(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM study_sessions")
        .fetch_one(pool)
        .await
}

pub async fn list_session_summaries(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<SessionSummary>, sqlx::Error> {
    let sql = format!(
        "{SUMMARY_SELECT} GROUP BY ss.id ORDER BY ss.created_at DESC, ss.id DESC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(map_session_summary).collect())
}

/// Distinguishes a missing session from an already-completed one after
/// the compare-and-set in [`complete_session`] matched zero rows.
pub async fn session_exists(
    tx: &mut Transaction<'_, Sqlite>,
    session_id: i64,
) -> Result<bool, sqlx::Error> {
    let row: Option<i64> = sqlx::query_scalar("SELECT 1 FROM study_sessions WHERE id = ?")
        .bind(session_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row.is_some())
}

pub async fn count_review_items(
    tx: &mut Transaction<'_, Sqlite>,
    session_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM word_review_items WHERE study_session_id = ?")
        .bind(session_id)
        .fetch_one(&mut **tx)
        .await
}

/// Counts how many of the submitted word ids have a review item in this
/// session. Duplicate submissions collapse under DISTINCT, so any mismatch
/// with the submission size means an unknown or repeated word.
pub async fn count_matching_review_items(
    tx: &mut Transaction<'_, Sqlite>,
    session_id: i64,
    word_ids: &[i64],
) -> Result<i64, sqlx::Error> {
    if word_ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "SELECT COUNT(DISTINCT word_id) FROM word_review_items \
         WHERE study_session_id = ? AND word_id IN ({})",
        placeholders(word_ids.len())
    );
    let mut query = sqlx::query_scalar(&sql).bind(session_id);
    for word_id in word_ids {
        query = query.bind(word_id);
    }
    query.fetch_one(&mut **tx).await
}

pub async fn set_review_verdict(
    tx: &mut Transaction<'_, Sqlite>,
    session_id: i64,
    word_id: i64,
    correct: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE word_review_items
        SET correct = ?, updated_at = datetime('now')
        WHERE study_session_id = ? AND word_id = ?
        "#,
    )
    .bind(correct as i64)
    .bind(session_id)
    .bind(word_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Compare-and-set on the completion flag. Returns false when the session
/// is missing or another transaction already completed it.
///
/// Must be the first statement of the submission transaction: the update
/// takes the write lock before any read happens, so a concurrent submitter
/// waits here and then sees the committed flag instead of a stale snapshot.
pub async fn complete_session(
    tx: &mut Transaction<'_, Sqlite>,
    session_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE study_sessions
        SET completed = 1, updated_at = datetime('now')
        WHERE id = ? AND completed = 0
        "#,
    )
    .bind(session_id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Aggregates the stats from the persisted review items rather than echoing
/// the request payload.
pub async fn review_stats(
    tx: &mut Transaction<'_, Sqlite>,
    session_id: i64,
) -> Result<ReviewStats, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            COUNT(*) AS total_reviews,
            COALESCE(SUM(CASE WHEN correct = 1 THEN 1 ELSE 0 END), 0) AS correct_count,
            COALESCE(SUM(CASE WHEN correct = 0 THEN 1 ELSE 0 END), 0) AS wrong_count
        FROM word_review_items
        WHERE study_session_id = ?
        "#,
    )
    .bind(session_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(ReviewStats {
        total_reviews: row.try_get("total_reviews").unwrap_or(0),
        correct_count: row.try_get("correct_count").unwrap_or(0),
        wrong_count: row.try_get("wrong_count").unwrap_or(0),
    })
}

pub async fn list_session_words(
    pool: &SqlitePool,
    session_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<WordReviewSummary>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            w.id,
            w.kanji,
            w.romaji,
            w.english,
            COALESCE(SUM(CASE WHEN wri.correct = 1 THEN 1 ELSE 0 END), 0) AS session_correct_count,
            COALESCE(SUM(CASE WHEN wri.correct = 0 THEN 1 ELSE 0 END), 0) AS session_wrong_count
        FROM words w
        JOIN word_review_items wri ON wri.word_id = w.id
        WHERE wri.study_session_id = ?
        GROUP BY w.id
        ORDER BY w.kanji
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(session_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .iter()
        .map(|row| WordReviewSummary {
            id: row.try_get("id").unwrap_or_default(),
            kanji: row.try_get("kanji").unwrap_or_default(),
            romaji: row.try_get("romaji").unwrap_or_default(),
            english: row.try_get("english").unwrap_or_default(),
            correct_count: row.try_get("session_correct_count").unwrap_or(0),
            wrong_count: row.try_get("session_wrong_count").unwrap_or(0),
        })
        .collect())
}

pub async fn count_session_words(
    pool: &SqlitePool,
    session_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(DISTINCT w.id)
        FROM words w
        JOIN word_review_items wri ON wri.word_id = w.id
        WHERE wri.study_session_id = ?
        "#,
    )
    .bind(session_id)
    .fetch_one(pool)
    .await
}

/// Review items first: they carry the foreign key onto sessions.
pub async fn delete_all_history(tx: &mut Transaction<'_, Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM word_review_items")
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM study_sessions")
        .execute(&mut **tx)
        .await?;
    Ok(())
}

fn map_session_summary(row: &SqliteRow) -> SessionSummary {
    let created_at: String = row.try_get("created_at").unwrap_or_default();
    SessionSummary {
        id: row.try_get("id").unwrap_or_default(),
        group_id: row.try_get("group_id").unwrap_or_default(),
        group_name: row.try_get("group_name").unwrap_or_default(),
        activity_id: row.try_get("activity_id").unwrap_or_default(),
        activity_name: row.try_get("activity_name").unwrap_or_default(),
        start_time: created_at.clone(),
        end_time: created_at,
        review_items_count: row.try_get("review_items_count").unwrap_or(0),
    }
}
