use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudyActivity {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

pub async fn count_groups(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM groups")
        .fetch_one(pool)
        .await
}

pub async fn list_groups(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Group>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT id, name, created_at FROM groups ORDER BY name LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(map_group).collect())
}

pub async fn fetch_group(pool: &SqlitePool, group_id: i64) -> Result<Option<Group>, sqlx::Error> {
    let row = sqlx::query("SELECT id, name, created_at FROM groups WHERE id = ?")
        .bind(group_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(map_group))
}

/// The activity catalog is small and read rarely; no pagination.
pub async fn list_activities(pool: &SqlitePool) -> Result<Vec<StudyActivity>, sqlx::Error> {
    let rows = sqlx::query("SELECT id, name, created_at FROM study_activities ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows
        .iter()
        .map(|row| StudyActivity {
            id: row.try_get("id").unwrap_or_default(),
            name: row.try_get("name").unwrap_or_default(),
            created_at: row.try_get("created_at").unwrap_or_default(),
        })
        .collect())
}

fn map_group(row: &SqliteRow) -> Group {
    Group {
        id: row.try_get("id").unwrap_or_default(),
        name: row.try_get("name").unwrap_or_default(),
        created_at: row.try_get("created_at").unwrap_or_default(),
    }
}
