use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::db::operations::placeholders;

/// A vocabulary word with its lifetime review counters.
#[derive(Debug, Clone, Serialize)]
pub struct Word {
    pub id: i64,
    pub kanji: String,
    pub romaji: String,
    pub english: String,
    pub correct_count: i64,
    pub wrong_count: i64,
}

pub async fn count_words(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM words")
        .fetch_one(pool)
        .await
}

pub async fn list_words(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Word>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, kanji, romaji, english, correct_count, wrong_count
        FROM words
        ORDER BY kanji
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(map_word).collect())
}

pub async fn fetch_word(pool: &SqlitePool, word_id: i64) -> Result<Option<Word>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, kanji, romaji, english, correct_count, wrong_count
        FROM words
        WHERE id = ?
        "#,
    )
    .bind(word_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(map_word))
}

/// Batch existence check: counts how many of the given ids resolve to a
/// word row. The id list is bound, never interpolated.
pub async fn count_existing(pool: &SqlitePool, word_ids: &[i64]) -> Result<i64, sqlx::Error> {
    if word_ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "SELECT COUNT(*) FROM words WHERE id IN ({})",
        placeholders(word_ids.len())
    );
    let mut query = sqlx::query_scalar(&sql);
    for word_id in word_ids {
        query = query.bind(word_id);
    }
    query.fetch_one(pool).await
}

/// Adds exactly one to the counter matching the verdict. Counters only ever
/// grow.
pub async fn bump_counter(
    tx: &mut Transaction<'_, Sqlite>,
    word_id: i64,
    correct: bool,
) -> Result<(), sqlx::Error> {
    let sql = if correct {
        "UPDATE words SET correct_count = correct_count + 1 WHERE id = ?"
    } else {
        "UPDATE words SET wrong_count = wrong_count + 1 WHERE id = ?"
    };
    sqlx::query(sql).bind(word_id).execute(&mut **tx).await?;
    Ok(())
}

fn map_word(row: &SqliteRow) -> Word {
    Word {
        id: row.try_get("id").unwrap_or_default(),
        kanji: row.try_get("kanji").unwrap_or_default(),
        romaji: row.try_get("romaji").unwrap_or_default(),
        english: row.try_get("english").unwrap_or_default(),
        correct_count: row.try_get("correct_count").unwrap_or(0),
        wrong_count: row.try_get("wrong_count").unwrap_or(0),
    }
}
