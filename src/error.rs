use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

/// Every failure a handler can surface to a caller.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Enquiry already claimed")]
    AlreadyClaimed,
    #[error("Unauthorized to claim enquiries")]
    Forbidden,
    #[error("Unauthorized")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyClaimed => "ALREADY_CLAIMED",
            Self::Forbidden => "FORBIDDEN",
            Self::MissingToken | Self::InvalidToken => "UNAUTHENTICATED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::DuplicateEmail | Self::AlreadyClaimed => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::MissingToken | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected request body");
        Self::Validation(rejection.body_text())
    }
}

/// `Json` extractor whose rejections come back as [`AppError::Validation`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn assert_error(error: AppError, expected_status: StatusCode, expected_message: &str) {
        let resp = error.into_response();
        assert_eq!(resp.status(), expected_status);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["message"], expected_message);
    }

    #[tokio::test]
    async fn claim_failures_map_to_documented_statuses() {
        assert_error(
            AppError::NotFound("Enquiry"),
            StatusCode::NOT_FOUND,
            "Enquiry not found",
        )
        .await;
        assert_error(
            AppError::AlreadyClaimed,
            StatusCode::BAD_REQUEST,
            "Enquiry already claimed",
        )
        .await;
        assert_error(
            AppError::Forbidden,
            StatusCode::FORBIDDEN,
            "Unauthorized to claim enquiries",
        )
        .await;
    }

    #[tokio::test]
    async fn auth_failures_are_unauthorized() {
        assert_error(AppError::MissingToken, StatusCode::UNAUTHORIZED, "Unauthorized").await;
        assert_error(AppError::InvalidToken, StatusCode::UNAUTHORIZED, "Invalid token").await;
        assert_error(
            AppError::InvalidCredentials,
            StatusCode::UNAUTHORIZED,
            "Invalid email or password",
        )
        .await;
    }

    #[tokio::test]
    async fn duplicate_email_is_bad_request() {
        assert_error(
            AppError::DuplicateEmail,
            StatusCode::BAD_REQUEST,
            "Email already exists",
        )
        .await;
    }

    #[tokio::test]
    async fn internal_error_hides_cause() {
        let resp = AppError::Internal(anyhow::anyhow!("connection reset by peer")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["kind"], "INTERNAL");
        assert_eq!(json["message"], "Internal server error");
        assert!(!String::from_utf8_lossy(&bytes).contains("connection reset"));
    }
}
