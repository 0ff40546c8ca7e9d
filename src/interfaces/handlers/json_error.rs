use actix_web::{
    error::{JsonPayloadError, PayloadError, ResponseError},
    HttpRequest, HttpResponse,
};

use crate::errors::ApiError;

/// Map JSON extractor failures onto the service error taxonomy: body-size
/// overflow becomes 413 before any parsing, everything else is reported as
/// a validation problem.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let api_error = match &err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            ApiError::PayloadTooLarge
        }
        JsonPayloadError::Payload(PayloadError::Overflow) => ApiError::PayloadTooLarge,
        JsonPayloadError::Deserialize(de) => {
            ApiError::Validation(vec![format!("Request body: {de}")])
        }
        _ => ApiError::Validation(vec![format!("Request body: {err}")]),
    };
    api_error.into()
}

/// Default service for unmatched routes.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    tracing::warn!(path = req.path(), "no route matched");
    ApiError::NotFound(req.path().to_string()).error_response()
}
