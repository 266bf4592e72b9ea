use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;

use crate::db::operations::words;
use crate::response::AppError;
use crate::routes::{PageQuery, Paginated};
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list_words))
        .route("/:id", get(get_word))
}

async fn list_words(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let params = query.resolve();
    let pool = state.db().pool();
    let total = words::count_words(pool).await.map_err(store_err)?;
    let items = words::list_words(pool, params.per_page, params.offset())
        .await
        .map_err(store_err)?;
    Ok(Json(Paginated::new(items, total, params)))
}

async fn get_word(
    State(state): State<AppState>,
    Path(word_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let word = words::fetch_word(state.db().pool(), word_id)
        .await
        .map_err(store_err)?
        .ok_or_else(|| AppError::not_found("Word not found"))?;
    Ok(Json(word))
}

pub(crate) fn store_err(err: sqlx::Error) -> AppError {
    tracing::error!(error = %err, "store query failed");
    AppError::internal(err.to_string())
}
