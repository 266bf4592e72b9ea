use crate::db::Database;

struct SeedWord {
    kanji: &'static str,
    romaji: &'static str,
    english: &'static str,
}

const SEED_WORDS: &[SeedWord] = &[
    SeedWord { kanji: "犬", romaji: "inu", english: "dog" },
    SeedWord { kanji: "猫", romaji: "neko", english: "cat" },
    SeedWord { kanji: "水", romaji: "mizu", english: "water" },
    SeedWord { kanji: "食べる", romaji: "taberu", english: "to eat" },
    SeedWord { kanji: "飲む", romaji: "nomu", english: "to drink" },
    SeedWord { kanji: "本", romaji: "hon", english: "book" },
    SeedWord { kanji: "学校", romaji: "gakkou", english: "school" },
    SeedWord { kanji: "先生", romaji: "sensei", english: "teacher" },
];

const SEED_ACTIVITIES: &[&str] = &["Flashcards", "Typing Tutor"];

/// Seeds a starter group, activities and word list for development and
/// tests. Skipped entirely when any group already exists.
pub async fn seed_starter_data(db: &Database) -> Result<(), sqlx::Error> {
    let pool = db.pool();

    let groups: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM groups")
        .fetch_one(pool)
        .await?;
    if groups > 0 {
        tracing::debug!("starter data already present, skipping seed");
        return Ok(());
    }

    sqlx::query("INSERT INTO groups (name, created_at) VALUES (?, datetime('now'))")
        .bind("Core Words")
        .execute(pool)
        .await?;

    for activity in SEED_ACTIVITIES {
        sqlx::query("INSERT INTO study_activities (name, created_at) VALUES (?, datetime('now'))")
            .bind(activity)
            .execute(pool)
            .await?;
    }

    for word in SEED_WORDS {
        sqlx::query(
            r#"
            INSERT INTO words (kanji, romaji, english, created_at)
            VALUES (?, ?, ?, datetime('now'))
            "#,
        )
        .bind(word.kanji)
        .bind(word.romaji)
        .bind(word.english)
        .execute(pool)
        .await?;
    }

    tracing::info!(
        words = SEED_WORDS.len(),
        activities = SEED_ACTIVITIES.len(),
        "seeded starter data"
    );
    Ok(())
}
