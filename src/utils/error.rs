use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No message provided")]
    MissingMessage,

    #[error("No text provided")]
    MissingText,

    #[error("Failed to write message to conversation file")]
    ConversationWrite(#[source] std::io::Error),

    #[error("Timeout waiting for response")]
    ResponseTimeout,

    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("Serde JSON错误: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// 错误响应体，与前端约定为 `{"error": ..., "suggestion": ...}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl AppError {
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            AppError::ConversationWrite(_) => {
                Some("Check if conversation file path is accessible")
            }
            AppError::ResponseTimeout => Some("Claude might be busy or didn't respond in time"),
            _ => None,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingMessage | AppError::MissingText => StatusCode::BAD_REQUEST,
            AppError::ConversationWrite(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ResponseTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::IoError(_) | AppError::SerdeJsonError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            suggestion: self.suggestion().map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_timeout_maps_to_gateway_timeout_with_suggestion() {
        let resp = AppError::ResponseTimeout.error_response();
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Timeout waiting for response");
        assert_eq!(
            json["suggestion"],
            "Claude might be busy or didn't respond in time"
        );
    }

    #[actix_web::test]
    async fn test_bad_request_has_no_suggestion() {
        let resp = AppError::MissingMessage.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "No message provided");
        assert!(json.get("suggestion").is_none());
    }

    #[test]
    fn test_write_failure_is_service_unavailable() {
        let err = AppError::ConversationWrite(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
