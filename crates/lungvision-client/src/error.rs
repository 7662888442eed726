//! Errors raised while talking to the prediction service.

use lungvision_core::PredictionError;
use thiserror::Error;

/// API errors. The display text is shown to the patient as-is.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("Cannot connect to server. Please ensure the backend is running.")]
    Unreachable { url: String },

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid prediction: {0}")]
    Prediction(#[from] PredictionError),

    #[error("Request failed: {0}")]
    Request(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Classify a transport error.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unreachable {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Request(err.to_string())
        }
    }

    /// Whether the same request may succeed if re-issued.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::Timeout | ApiError::Unreachable { .. } | ApiError::Status { status: 500.., .. }
        )
    }
}
