use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};

/// Error carried out of a handler and rendered as `{"error": message}`,
/// optionally with extra diagnostic fields merged into the body.
#[derive(Debug, Clone)]
pub struct AppError {
    status: StatusCode,
    message: String,
    detail: Option<Map<String, Value>>,
    is_operational: bool,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, message)
    }

    /// State-machine refusals surface as 400, not 409: the request is
    /// well-formed but the transition is forbidden.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            detail: None,
            is_operational: false,
        }
    }

    pub fn with_detail(mut self, detail: Map<String, Value>) -> Self {
        self.detail = Some(detail);
        self
    }

    fn operational(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
            is_operational: true,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal messages may carry store details; keep them out of the
        // wire format.
        let message = if self.is_operational {
            self.message
        } else {
            "Internal server error".to_string()
        };

        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(message));
        if let Some(detail) = self.detail {
            body.extend(detail);
        }

        (self.status, Json(Value::Object(body))).into_response()
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> AppError {
    AppError {
        status,
        message: message.into(),
        detail: None,
        is_operational: true,
    }
}
