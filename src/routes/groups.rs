use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;

use crate::db::operations::catalog;
use crate::response::AppError;
use crate::routes::words::store_err;
use crate::routes::{PageQuery, Paginated};
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list_groups))
        .route("/:id", get(get_group))
}

async fn list_groups(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let params = query.resolve();
    let pool = state.db().pool();
    let total = catalog::count_groups(pool).await.map_err(store_err)?;
    let items = catalog::list_groups(pool, params.per_page, params.offset())
        .await
        .map_err(store_err)?;
    Ok(Json(Paginated::new(items, total, params)))
}

async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let group = catalog::fetch_group(state.db().pool(), group_id)
        .await
        .map_err(store_err)?
        .ok_or_else(|| AppError::not_found("Group not found"))?;
    Ok(Json(group))
}
