use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON error body returned for every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Errors surfaced by the HTTP handlers.
///
/// Validation failures map to 400 and fail before any external call.
/// Extraction and download failures carry the extractor's raw message text
/// and always map to 500; the user-facing detail is derived from the message
/// by substring classification.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Invalid TikTok URL. Please provide a valid TikTok video link.")]
    InvalidUrl,

    #[error("{0}")]
    InfoFailed(String),

    #[error("{0}")]
    DownloadFailed(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl | ApiError::InvalidUrl => StatusCode::BAD_REQUEST,
            ApiError::InfoFailed(_) | ApiError::DownloadFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// User-facing detail string. Extraction failures are classified by
    /// pattern-matching the underlying message text; unmatched messages are
    /// wrapped verbatim.
    pub fn detail(&self) -> String {
        match self {
            ApiError::MissingUrl | ApiError::InvalidUrl => self.to_string(),
            ApiError::InfoFailed(msg) => {
                if msg.contains("Unable to extract") {
                    "Could not extract video info. The video might be private, deleted, or unavailable.".into()
                } else if msg.contains("HTTP Error 404") {
                    "Video not found. Please check if the URL is correct.".into()
                } else if msg.contains("HTTP Error 403") {
                    "Access denied. The video might be private or region-locked.".into()
                } else {
                    format!("Failed to get video info: {msg}")
                }
            }
            ApiError::DownloadFailed(msg) => {
                if msg.contains("Unable to extract") {
                    "Could not extract video. The video might be private, deleted, or unavailable.".into()
                } else if msg.contains("HTTP Error 404") {
                    "Video not found. Please check if the URL is correct.".into()
                } else if msg.contains("HTTP Error 403") {
                    "Access denied. The video might be private or region-locked.".into()
                } else {
                    format!("Failed to download: {msg}")
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.detail();
        (self.status(), Json(ErrorBody { detail })).into_response()
    }
}
