use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use cep_weather_core::{ErrorReport, LookupError};
use serde::Serialize;

const INTERNAL_ERROR_BODY: &[u8] = br#"{"message":"internal server error"}"#;

/// Serializes `body` as the JSON payload of a response with `status`.
///
/// A body that fails to serialize becomes a generic 500.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => with_json_content_type(status, bytes),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize response body");
            with_json_content_type(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY.to_vec())
        }
    }
}

fn with_json_content_type(status: StatusCode, bytes: Vec<u8>) -> Response {
    (status, [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))], bytes)
        .into_response()
}

/// A failed lookup on its way out as `{ "message": ... }`.
#[derive(Debug)]
pub struct ApiError(pub LookupError);

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &self.0 {
            LookupError::InvalidZipcode(_) => tracing::debug!("rejected malformed zipcode"),
            err => tracing::warn!(status = status.as_u16(), error = %error_chain(err), "lookup failed"),
        }

        json_response(status, &ErrorReport::new(self.0.public_message()))
    }
}

/// Joins an error and its sources into one line for logging.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
