use crate::AppState;
use crate::error::ApiError;
use crate::extractor::ExtractorOptions;
use crate::format::DownloadFormat;
use crate::info::VideoInfo;
use crate::resolve::{reported_filename, resolve_output};
use crate::validate::validate_tiktok_url;
use axum::body::Body;
use axum::extract::{Extension, Query};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use tracing::{error, info};

#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

/// Liveness/identity response.
pub async fn root() -> impl IntoResponse {
    Json(StatusResponse {
        status: "ok".into(),
        message: "TikTok Downloader API v2.0".into(),
    })
}

#[derive(Deserialize)]
pub struct InfoRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

pub async fn info_get(
    Extension(state): Extension<AppState>,
    Query(params): Query<InfoRequest>,
) -> Result<Json<VideoInfo>, ApiError> {
    handle_info(state, params.url.unwrap_or_default()).await
}

pub async fn info_post(
    Extension(state): Extension<AppState>,
    Json(body): Json<InfoRequest>,
) -> Result<Json<VideoInfo>, ApiError> {
    handle_info(state, body.url.unwrap_or_default()).await
}

pub async fn download_get(
    Extension(state): Extension<AppState>,
    Query(params): Query<DownloadRequest>,
) -> Result<Response, ApiError> {
    handle_download(state, params.url.unwrap_or_default(), params.format).await
}

pub async fn download_post(
    Extension(state): Extension<AppState>,
    Json(body): Json<DownloadRequest>,
) -> Result<Response, ApiError> {
    handle_download(state, body.url.unwrap_or_default(), body.format).await
}

/// Shared info handler behind both HTTP bindings.
async fn handle_info(state: AppState, url: String) -> Result<Json<VideoInfo>, ApiError> {
    validate_tiktok_url(&url)?;

    let opts = ExtractorOptions::metadata();
    let raw = state
        .extractor
        .fetch_metadata(&url, &opts)
        .await
        .map_err(|error| {
            error!(%error, "Info extraction failed");
            ApiError::InfoFailed(error.to_string())
        })?;

    Ok(Json(VideoInfo::project(&raw, &url)))
}

/// Shared download handler behind both HTTP bindings.
async fn handle_download(
    state: AppState,
    url: String,
    format: Option<String>,
) -> Result<Response, ApiError> {
    validate_tiktok_url(&url)?;

    let format = DownloadFormat::parse_lenient(format.as_deref().unwrap_or_default());
    let profile = format.profile(&state.downloads_dir);
    let opts = ExtractorOptions::download(&profile, state.retries, state.fragment_retries);

    info!(format = format.as_str(), %url, job_id = %profile.job_id, "Downloading");
    let raw = state
        .extractor
        .download(&url, &opts)
        .await
        .map_err(|error| {
            error!(%error, "Download failed");
            ApiError::DownloadFailed(error.to_string())
        })?;

    let reported = reported_filename(&profile.output_template, &raw);
    let path = resolve_output(
        &reported,
        profile.expected_ext,
        &state.downloads_dir,
        &profile.job_id,
    )
    .await
    .map_err(|error| {
        error!(%error, job_id = %profile.job_id, "Download failed");
        ApiError::DownloadFailed(error.to_string())
    })?;

    let (media_type, filename) = if format == DownloadFormat::Mp3 {
        ("audio/mpeg", "tiktok_audio.mp3")
    } else {
        ("video/mp4", "tiktok_video.mp4")
    };

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|error| ApiError::DownloadFailed(error.to_string()))?;
    let size = file.metadata().await.ok().map(|m| m.len());

    let mut res = Response::new(Body::from_stream(ReaderStream::new(file)));
    let headers = res.headers_mut();
    headers.insert(header::CONTENT_TYPE, media_type.parse().unwrap());
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{filename}\"")
            .parse()
            .unwrap(),
    );
    if let Some(size) = size {
        headers.insert(header::CONTENT_LENGTH, size.to_string().parse().unwrap());
    }
    Ok(res)
}
