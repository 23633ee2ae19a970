//! Error categorization.
//!
//! Maps structured fetch errors onto the counter categories tracked by
//! [`super::ServiceStats`], so diagnostics distinguish timeouts from 429s
//! from decode failures.

use super::types::{ErrorType, FetchError};

/// Categorizes a [`FetchError`] into an [`ErrorType`] counter.
pub fn categorize_fetch_error(error: &FetchError) -> ErrorType {
    match error {
        FetchError::RequestError(e) => categorize_reqwest_error(e),
        FetchError::StatusError(status) if status.as_u16() == 429 => {
            ErrorType::UpstreamTooManyRequests
        }
        FetchError::StatusError(_) => ErrorType::UpstreamStatus,
        FetchError::ParseError(_) => ErrorType::UpstreamDecode,
    }
}

/// Categorizes a raw `reqwest::Error` into an [`ErrorType`] counter.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if let Some(status) = error.status() {
        if status.as_u16() == 429 {
            return ErrorType::UpstreamTooManyRequests;
        }
        if status.is_client_error() || status.is_server_error() {
            return ErrorType::UpstreamStatus;
        }
    }

    if error.is_timeout() {
        ErrorType::UpstreamTimeout
    } else if error.is_connect() {
        ErrorType::UpstreamConnect
    } else if error.is_decode() {
        ErrorType::UpstreamDecode
    } else {
        ErrorType::UpstreamOther
    }
}
