//! Study-session lifecycle: creation with its fixed set of review items,
//! listing, detail, the single-shot review submission, and the
//! administrative history reset.
//!
//! A session moves `pending -> completed` exactly once. Submission must
//! cover every review item of the session in one call; the word counters
//! and the completion flag change together inside one transaction.

use serde_json::Value;
use thiserror::Error;

use crate::db::operations::sessions::{self, ReviewStats, SessionSummary, WordReviewSummary};
use crate::db::operations::words;
use crate::db::Database;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Malformed or mistyped request payload. Client-correctable.
    #[error("{0}")]
    Validation(String),
    /// Well-formed payload referencing rows that do not exist.
    #[error("{0}")]
    Reference(String),
    #[error("Study session not found")]
    NotFound,
    /// The completion flag is terminal; a second submission is refused.
    #[error("Study session is already completed")]
    AlreadyCompleted,
    /// Partial or over-complete submissions are rejected wholesale.
    #[error("All words in the session must be reviewed")]
    IncompleteReview { expected: i64, submitted: i64 },
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct CreateSessionRequest {
    pub group_id: i64,
    pub study_activity_id: i64,
    pub word_ids: Vec<i64>,
}

impl CreateSessionRequest {
    /// Field-by-field validation of the raw payload; the first failing rule
    /// names the offending field.
    pub fn from_json(payload: &Value) -> Result<Self, SessionError> {
        let body = payload
            .as_object()
            .ok_or_else(|| SessionError::Validation("Request must be JSON".to_string()))?;

        for field in ["group_id", "study_activity_id", "word_ids"] {
            if !body.contains_key(field) {
                return Err(SessionError::Validation(format!(
                    "Missing required field: {field}"
                )));
            }
        }

        let group_id = body["group_id"]
            .as_i64()
            .ok_or_else(|| SessionError::Validation("group_id must be an integer".to_string()))?;
        let study_activity_id = body["study_activity_id"].as_i64().ok_or_else(|| {
            SessionError::Validation("study_activity_id must be an integer".to_string())
        })?;

        let word_ids = body["word_ids"]
            .as_array()
            .and_then(|items| items.iter().map(Value::as_i64).collect::<Option<Vec<_>>>())
            .ok_or_else(|| {
                SessionError::Validation("word_ids must be an array of integers".to_string())
            })?;
        if word_ids.is_empty() {
            return Err(SessionError::Validation(
                "word_ids cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            group_id,
            study_activity_id,
            word_ids,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReviewEntry {
    pub word_id: i64,
    pub is_correct: bool,
}

pub fn parse_reviews(payload: &Value) -> Result<Vec<ReviewEntry>, SessionError> {
    let body = payload
        .as_object()
        .ok_or_else(|| SessionError::Validation("Request must be JSON".to_string()))?;

    let reviews = body
        .get("reviews")
        .ok_or_else(|| SessionError::Validation("Missing reviews array".to_string()))?;
    let reviews = reviews
        .as_array()
        .ok_or_else(|| SessionError::Validation("Reviews must be an array".to_string()))?;

    reviews
        .iter()
        .map(|entry| {
            let entry = entry.as_object().ok_or_else(|| {
                SessionError::Validation("Each review must be an object".to_string())
            })?;
            if !entry.contains_key("word_id") || !entry.contains_key("is_correct") {
                return Err(SessionError::Validation(
                    "Each review must include word_id and is_correct".to_string(),
                ));
            }
            let word_id = entry["word_id"].as_i64().ok_or_else(|| {
                SessionError::Validation("word_id must be an integer".to_string())
            })?;
            let is_correct = entry["is_correct"].as_bool().ok_or_else(|| {
                SessionError::Validation("is_correct must be a boolean".to_string())
            })?;
            Ok(ReviewEntry {
                word_id,
                is_correct,
            })
        })
        .collect()
}

#[derive(Debug)]
pub struct SessionDetail {
    pub session: SessionSummary,
    pub words: Vec<WordReviewSummary>,
    pub total_words: i64,
}

/// Creates a session and one pending review item per word, atomically.
/// Reference checks run before anything is written.
pub async fn create_session(
    db: &Database,
    request: &CreateSessionRequest,
) -> Result<SessionSummary, SessionError> {
    let pool = db.pool();

    if !sessions::group_and_activity_exist(pool, request.group_id, request.study_activity_id)
        .await?
    {
        tracing::warn!(
            group_id = request.group_id,
            study_activity_id = request.study_activity_id,
            "session creation rejected: unknown group or activity"
        );
        return Err(SessionError::Reference(
            "Invalid group_id or study_activity_id".to_string(),
        ));
    }

    let existing = words::count_existing(pool, &request.word_ids).await?;
    if existing != request.word_ids.len() as i64 {
        tracing::warn!(
            submitted = request.word_ids.len(),
            resolved = existing,
            "session creation rejected: unknown word ids"
        );
        return Err(SessionError::Reference(
            "One or more word_ids are invalid".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;
    let session_id = sessions::insert_session(&mut tx, request.group_id, request.study_activity_id)
        .await?;
    for word_id in &request.word_ids {
        sessions::insert_review_item(&mut tx, session_id, *word_id).await?;
    }
    tx.commit().await?;

    tracing::info!(
        session_id,
        group_id = request.group_id,
        study_activity_id = request.study_activity_id,
        review_items = request.word_ids.len(),
        "study session created"
    );

    sessions::fetch_session_summary(pool, session_id)
        .await?
        .ok_or(SessionError::NotFound)
}

pub async fn list_sessions(
    db: &Database,
    limit: i64,
    offset: i64,
) -> Result<(Vec<SessionSummary>, i64), SessionError> {
    let pool = db.pool();
    let total = sessions::count_sessions(pool).await?;
    let items = sessions::list_session_summaries(pool, limit, offset).await?;
    Ok((items, total))
}

pub async fn session_detail(
    db: &Database,
    session_id: i64,
    limit: i64,
    offset: i64,
) -> Result<SessionDetail, SessionError> {
    let pool = db.pool();
    let session = sessions::fetch_session_summary(pool, session_id)
        .await?
        .ok_or(SessionError::NotFound)?;
    let words = sessions::list_session_words(pool, session_id, limit, offset).await?;
    let total_words = sessions::count_session_words(pool, session_id).await?;
    Ok(SessionDetail {
        session,
        words,
        total_words,
    })
}

/// Applies one verdict per review item and flips the session to completed,
/// all inside one transaction. Any rejection rolls back untouched state.
///
/// The conditional completion update is the first statement of the
/// transaction, so the write lock is held before anything is read. Racing
/// submissions serialize there: the loser observes the winner's commit,
/// matches zero rows, and gets `AlreadyCompleted` rather than a stale
/// snapshot it would later fail to write over.
pub async fn submit_review(
    db: &Database,
    session_id: i64,
    reviews: &[ReviewEntry],
) -> Result<ReviewStats, SessionError> {
    let mut tx = db.pool().begin().await?;

    if !sessions::complete_session(&mut tx, session_id).await? {
        let exists = sessions::session_exists(&mut tx, session_id).await?;
        let _ = tx.rollback().await;
        return Err(if exists {
            SessionError::AlreadyCompleted
        } else {
            SessionError::NotFound
        });
    }

    let expected = sessions::count_review_items(&mut tx, session_id).await?;
    let submitted = reviews.len() as i64;
    if submitted != expected {
        let _ = tx.rollback().await;
        return Err(SessionError::IncompleteReview {
            expected,
            submitted,
        });
    }

    let word_ids: Vec<i64> = reviews.iter().map(|review| review.word_id).collect();
    let matched = sessions::count_matching_review_items(&mut tx, session_id, &word_ids).await?;
    if matched != submitted {
        let _ = tx.rollback().await;
        return Err(SessionError::Validation(
            "One or more word_ids do not belong to this study session".to_string(),
        ));
    }

    for review in reviews {
        sessions::set_review_verdict(&mut tx, session_id, review.word_id, review.is_correct)
            .await?;
        words::bump_counter(&mut tx, review.word_id, review.is_correct).await?;
    }

    let stats = sessions::review_stats(&mut tx, session_id).await?;
    tx.commit().await?;

    tracing::info!(
        session_id,
        total_reviews = stats.total_reviews,
        correct = stats.correct_count,
        wrong = stats.wrong_count,
        "study session review submitted"
    );

    Ok(stats)
}

/// Wipes all review history. Administrative operation; there is no
/// selective delete.
pub async fn reset_history(db: &Database) -> Result<(), SessionError> {
    let mut tx = db.pool().begin().await?;
    sessions::delete_all_history(&mut tx).await?;
    tx.commit().await?;
    tracing::info!("study history cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validation_message(err: SessionError) -> String {
        match err {
            SessionError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_request_parses_valid_payload() {
        let payload = json!({
            "group_id": 1,
            "study_activity_id": 2,
            "word_ids": [10, 11]
        });
        let request = CreateSessionRequest::from_json(&payload).unwrap();
        assert_eq!(request.group_id, 1);
        assert_eq!(request.study_activity_id, 2);
        assert_eq!(request.word_ids, vec![10, 11]);
    }

    #[test]
    fn create_request_names_missing_field() {
        let err = CreateSessionRequest::from_json(&json!({})).unwrap_err();
        assert_eq!(validation_message(err), "Missing required field: group_id");
    }

    #[test]
    fn create_request_rejects_mistyped_group_id() {
        let payload = json!({
            "group_id": "not an integer",
            "study_activity_id": 1,
            "word_ids": [1]
        });
        let err = CreateSessionRequest::from_json(&payload).unwrap_err();
        assert_eq!(validation_message(err), "group_id must be an integer");
    }

    #[test]
    fn create_request_rejects_mixed_word_ids() {
        let payload = json!({
            "group_id": 1,
            "study_activity_id": 1,
            "word_ids": [1, "two"]
        });
        let err = CreateSessionRequest::from_json(&payload).unwrap_err();
        assert_eq!(
            validation_message(err),
            "word_ids must be an array of integers"
        );
    }

    #[test]
    fn create_request_rejects_empty_word_ids() {
        let payload = json!({
            "group_id": 1,
            "study_activity_id": 1,
            "word_ids": []
        });
        let err = CreateSessionRequest::from_json(&payload).unwrap_err();
        assert_eq!(validation_message(err), "word_ids cannot be empty");
    }

    #[test]
    fn reviews_require_the_array() {
        let err = parse_reviews(&json!({})).unwrap_err();
        assert_eq!(validation_message(err), "Missing reviews array");

        let err = parse_reviews(&json!({"reviews": "not an array"})).unwrap_err();
        assert_eq!(validation_message(err), "Reviews must be an array");
    }

    #[test]
    fn reviews_validate_entry_types() {
        let err = parse_reviews(&json!({
            "reviews": [{"word_id": "not a number", "is_correct": "not a boolean"}]
        }))
        .unwrap_err();
        assert_eq!(validation_message(err), "word_id must be an integer");

        let err = parse_reviews(&json!({
            "reviews": [{"word_id": 1, "is_correct": "nope"}]
        }))
        .unwrap_err();
        assert_eq!(validation_message(err), "is_correct must be a boolean");

        let err = parse_reviews(&json!({"reviews": [{"word_id": 1}]})).unwrap_err();
        assert_eq!(
            validation_message(err),
            "Each review must include word_id and is_correct"
        );
    }

    #[test]
    fn reviews_parse_valid_entries() {
        let entries = parse_reviews(&json!({
            "reviews": [
                {"word_id": 10, "is_correct": true},
                {"word_id": 11, "is_correct": false}
            ]
        }))
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].word_id, 10);
        assert!(entries[0].is_correct);
        assert!(!entries[1].is_correct);
    }
}
