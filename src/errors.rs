use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use derive_more::Display;
use validator::ValidationErrors;

use crate::domain::rules;
use crate::renderer::rendercv::RenderError;

#[derive(Debug, Display)]
pub enum ApiError {
    #[display("Validation failed")]
    Validation(Vec<String>),

    #[display("Could not validate credentials")]
    Unauthorized,

    #[display("Rate limit exceeded")]
    RateLimited(u64),

    #[display("Payload too large. Maximum size is 2MB.")]
    PayloadTooLarge,

    #[display("Invalid host header")]
    InvalidHost,

    #[display("Path {_0} not found")]
    NotFound(String),

    #[display("rendercv failed: {_0}")]
    RenderFailed(String),

    #[display("{_0}")]
    RenderMissingOutput(String),

    #[display("Internal server error: {_0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(messages) => {
                HttpResponse::build(self.status_code()).json(serde_json::json!({
                    "detail": "Please fix the following issues:",
                    "errors": messages
                }))
            }
            ApiError::RateLimited(retry_after) => {
                HttpResponse::build(self.status_code())
                    .insert_header((header::RETRY_AFTER, retry_after.to_string()))
                    .json(serde_json::json!({
                        "detail": format!("Rate limit exceeded. Retry after {retry_after} seconds.")
                    }))
            }
            _ => HttpResponse::build(self.status_code()).json(serde_json::json!({
                "detail": self.to_string()
            })),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized => StatusCode::FORBIDDEN,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InvalidHost => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RenderFailed(_)
            | ApiError::RenderMissingOutput(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(rules::friendly_messages(&errors))
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::CommandFailed(diagnostic) => ApiError::RenderFailed(diagnostic),
            RenderError::MissingOutputDir { stdout, stderr } => ApiError::RenderMissingOutput(
                format!("Output directory not created. stdout: {stdout}, stderr: {stderr}"),
            ),
            RenderError::NoPdfProduced(files) => ApiError::RenderMissingOutput(format!(
                "No PDF was generated. Files in output: {files:?}"
            )),
            RenderError::Io(e) => ApiError::Internal(format!("renderer I/O error: {e}")),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}
