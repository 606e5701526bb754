use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use herald_insights::InsightError;
use serde_json::json;

/// Error body returned to HTTP callers as `{"error": message}`.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<InsightError> for HttpError {
    fn from(value: InsightError) -> Self {
        match value {
            InsightError::MissingCredential => {
                HttpError::internal("insight generation is not configured")
            }
            InsightError::Upstream { status, .. } => {
                HttpError::internal(format!("AI service error: {status}"))
            }
            InsightError::Transport(_) | InsightError::InvalidResponse(_) => {
                HttpError::internal("AI service unavailable")
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_body_is_not_exposed() {
        let err = HttpError::from(InsightError::Upstream {
            status: 401,
            body: "invalid api key sk-****".into(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "AI service error: 401");
    }
}
