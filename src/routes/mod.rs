mod groups;
mod health;
mod study_activities;
mod study_sessions;
mod words;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest("/api/study-sessions", study_sessions::router())
        .nest("/api/words", words::router())
        .nest("/api/groups", groups::router())
        .nest("/api/study-activities", study_activities::router())
        .fallback(fallback_handler)
        .with_state(state)
}

/// `?page=&per_page=` as sent by clients; absent, non-numeric or
/// out-of-range values fall back to page 1 with 10 rows.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub per_page: Option<i64>,
}

/// Query values arrive as strings; anything that does not parse as an
/// integer is treated as absent rather than rejected.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: i64,
    pub per_page: i64,
}

impl PageQuery {
    pub fn resolve(self) -> PageParams {
        PageParams {
            page: self.page.unwrap_or(1).max(1),
            per_page: self.per_page.unwrap_or(10).clamp(1, 100),
        }
    }
}

impl PageParams {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.per_page - 1) / self.per_page
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, params: PageParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
            total_pages: params.total_pages(total),
        }
    }
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "Route not found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn page_query_defaults_and_clamps() {
        let params = PageQuery {
            page: None,
            per_page: None,
        }
        .resolve();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 10);

        let params = PageQuery {
            page: Some(-3),
            per_page: Some(1000),
        }
        .resolve();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 100);
    }

    proptest! {
        #[test]
        fn total_pages_covers_every_row(total in 0i64..100_000, per_page in 1i64..=100) {
            let params = PageParams { page: 1, per_page };
            let pages = params.total_pages(total);
            prop_assert!(pages * per_page >= total);
            if total > 0 {
                prop_assert!((pages - 1) * per_page < total);
            } else {
                prop_assert_eq!(pages, 0);
            }
        }
    }
}
