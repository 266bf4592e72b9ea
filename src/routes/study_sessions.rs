use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::db::operations::sessions::{ReviewStats, SessionSummary, WordReviewSummary};
use crate::response::AppError;
use crate::routes::{PageQuery, Paginated};
use crate::services::study_sessions::{
    self, CreateSessionRequest, SessionError,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct SessionDetailResponse {
    session: SessionSummary,
    words: Vec<WordReviewSummary>,
    total: i64,
    page: i64,
    per_page: i64,
    total_pages: i64,
}

#[derive(Debug, Serialize)]
struct ReviewResponse {
    message: &'static str,
    stats: ReviewStats,
}

#[derive(Debug, Serialize)]
struct ResetResponse {
    message: &'static str,
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/reset", post(reset_sessions))
        .route("/:id", get(session_detail))
        .route("/:id/review", post(submit_review))
}

async fn create_session(
    State(state): State<AppState>,
    payload: Option<Json<Value>>,
) -> Result<impl IntoResponse, AppError> {
    let Some(Json(payload)) = payload else {
        return Err(AppError::validation("Request must be JSON"));
    };
    let request = CreateSessionRequest::from_json(&payload).map_err(map_service_err)?;
    let session = study_sessions::create_session(state.db(), &request)
        .await
        .map_err(map_service_err)?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let params = query.resolve();
    let (items, total) =
        study_sessions::list_sessions(state.db(), params.per_page, params.offset())
            .await
            .map_err(map_service_err)?;
    Ok(Json(Paginated::new(items, total, params)))
}

async fn session_detail(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let params = query.resolve();
    let detail =
        study_sessions::session_detail(state.db(), session_id, params.per_page, params.offset())
            .await
            .map_err(map_service_err)?;
    Ok(Json(SessionDetailResponse {
        session: detail.session,
        words: detail.words,
        total: detail.total_words,
        page: params.page,
        per_page: params.per_page,
        total_pages: params.total_pages(detail.total_words),
    }))
}

async fn submit_review(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    payload: Option<Json<Value>>,
) -> Result<impl IntoResponse, AppError> {
    let Some(Json(payload)) = payload else {
        return Err(AppError::validation("Request must be JSON"));
    };
    let reviews = study_sessions::parse_reviews(&payload).map_err(map_service_err)?;
    let stats = study_sessions::submit_review(state.db(), session_id, &reviews)
        .await
        .map_err(map_service_err)?;
    Ok(Json(ReviewResponse {
        message: "Review submitted successfully",
        stats,
    }))
}

async fn reset_sessions(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    study_sessions::reset_history(state.db())
        .await
        .map_err(map_service_err)?;
    Ok(Json(ResetResponse {
        message: "Study history cleared successfully",
    }))
}

fn map_service_err(err: SessionError) -> AppError {
    match err {
        SessionError::Validation(message) => AppError::validation(message),
        SessionError::Reference(message) => AppError::bad_request(message),
        SessionError::NotFound => AppError::not_found("Study session not found"),
        SessionError::AlreadyCompleted => {
            AppError::conflict("Study session is already completed")
        }
        SessionError::IncompleteReview {
            expected,
            submitted,
        } => {
            let mut detail = Map::new();
            detail.insert("expected_count".to_string(), Value::from(expected));
            detail.insert("submitted_count".to_string(), Value::from(submitted));
            AppError::validation("All words in the session must be reviewed").with_detail(detail)
        }
        SessionError::Db(err) => {
            tracing::error!(error = %err, "study session store failure");
            AppError::internal(err.to_string())
        }
    }
}
