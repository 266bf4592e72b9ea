use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;

use crate::db::operations::catalog;
use crate::response::AppError;
use crate::routes::words::store_err;
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/", get(list_activities))
}

async fn list_activities(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let activities = catalog::list_activities(state.db().pool())
        .await
        .map_err(store_err)?;
    Ok(Json(activities))
}
