//! API error type mapping core outcomes to HTTP responses
//!
//! Every error class gets a stable machine-readable `detail` code;
//! internal errors are logged with their full cause but never leak raw
//! text to callers.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use scorekeeper::{Decision, RejectReason};

use crate::types::ErrorBody;

pub enum ApiError {
    /// Token bucket exhausted; carries the limiter decision for headers
    RateLimited(Decision),
    /// Business-rule rejection on the single-submission path
    Rejected(RejectReason),
    /// Bulk batch over the size boundary; nothing was stored
    BatchTooLarge,
    /// Request-shape problems the schema layer catches (e.g. limit out
    /// of range); message is safe to show
    Validation(String),
    /// Internal errors - logged but return a generic 500 to the caller
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::RateLimited(decision) => {
                let retry_after = decision.retry_after.ceil() as u64;
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ErrorBody {
                        detail: "RATE_LIMITED".into(),
                    }),
                )
                    .into_response();

                let headers = response.headers_mut();
                headers.insert(header::RETRY_AFTER, int_header(retry_after));
                headers.insert("x-ratelimit-limit", int_header(decision.limit as u64));
                headers.insert(
                    "x-ratelimit-remaining",
                    int_header(decision.remaining.max(0) as u64),
                );
                headers.insert(
                    "x-ratelimit-reset",
                    int_header(decision.reset_after.ceil() as u64),
                );
                response
            }
            ApiError::Rejected(reason) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    detail: reason.as_str().into(),
                }),
            )
                .into_response(),
            ApiError::BatchTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorBody {
                    detail: "BATCH_TOO_LARGE".into(),
                }),
            )
                .into_response(),
            ApiError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody { detail: msg }),
            )
                .into_response(),
            ApiError::Internal(err) => {
                tracing::error!("internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        detail: "INTERNAL_ERROR".into(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

pub(crate) fn int_header(value: u64) -> HeaderValue {
    // Plain integers are always valid header values
    HeaderValue::from_str(&value.to_string()).unwrap_or(HeaderValue::from_static("0"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rate_limited_carries_retry_after_ceiling() {
        let err = ApiError::RateLimited(Decision {
            allowed: false,
            retry_after: 1.2,
            reset_after: 59.4,
            remaining: 0,
            limit: 30,
        });
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "2");
        assert_eq!(response.headers()["x-ratelimit-limit"], "30");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "0");
        assert_eq!(response.headers()["x-ratelimit-reset"], "60");
    }

    #[tokio::test]
    async fn rejection_maps_to_400_with_reason_code() {
        let response = ApiError::Rejected(RejectReason::NicknameTooLong).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let err: ApiError = anyhow::anyhow!("secret connection string leaked").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!body.contains("secret"));
        assert!(body.contains("INTERNAL_ERROR"));
    }

    #[tokio::test]
    async fn batch_too_large_maps_to_413() {
        let response = ApiError::BatchTooLarge.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
