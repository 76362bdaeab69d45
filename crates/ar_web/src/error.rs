use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Error envelope: `{success: false, message}` plus `error` detail on 500s.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            detail: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            detail: None,
        }
    }

    pub fn internal(message: impl Into<String>, detail: impl ToString) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            detail: Some(detail.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.detail {
            Some(detail) => json!({ "success": false, "message": self.message, "error": detail }),
            None => json!({ "success": false, "message": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Maps domain errors onto the envelope, with `message` as the 500 summary.
pub trait OrFail<T> {
    fn or_fail(self, message: &str) -> Result<T, ApiError>;
}

impl<T> OrFail<T> for ar_core::Result<T> {
    fn or_fail(self, message: &str) -> Result<T, ApiError> {
        self.map_err(|e| match e {
            ar_core::Error::Validation(m) => ApiError::bad_request(m),
            ar_core::Error::NotFound(m) => ApiError::not_found(m),
            e => {
                error!("{}: {}", message, e);
                ApiError::internal(message, e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ar_core::Error;

    #[test]
    fn test_domain_errors_map_to_status() {
        let err = Err::<(), _>(Error::Validation("Title and content are required".into()))
            .or_fail("Failed to create article")
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = Err::<(), _>(Error::NotFound("No articles found".into()))
            .or_fail("Failed to scrape articles")
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = Err::<(), _>(Error::Persistence("locked".into()))
            .or_fail("Failed to fetch articles")
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail.as_deref(), Some("Persistence error: locked"));
    }
}
