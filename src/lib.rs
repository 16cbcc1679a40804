pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod extractor;
pub mod format;
pub mod info;
pub mod resolve;
pub mod validate;

use axum::Router;
use axum::extract::Extension;
use axum::routing::get;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

//
// Re-export
//
pub use app_state::AppState;
pub use config::Config;
pub use error::ApiError;
pub use extractor::{ExtractorOptions, MediaExtractor, YtDlpExtractor};
pub use format::DownloadFormat;
pub use info::VideoInfo;

/// Build the application router around the given state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::root))
        .route("/api/info", get(api::info_get).post(api::info_post))
        .route(
            "/api/download",
            get(api::download_get).post(api::download_post),
        )
        .layer(axum::middleware::from_fn(api::log_request_errors))
        .layer(cors)
        .layer(Extension(state))
}

pub async fn run(config: Config) {
    let downloads_dir = PathBuf::from(&config.downloads_dir);
    let extractor = Arc::new(YtDlpExtractor::new(config.ytdlp_bin.clone()));

    let state = AppState::new(
        &downloads_dir,
        extractor,
        config.retries,
        config.fragment_retries,
    )
    .await
    .expect("Failed to create app state");

    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.listen_on_port);
    info!("Listening on {addr}");
    axum::serve(
        TcpListener::bind(&addr).await.expect("Failed to bind"),
        app,
    )
    .await
    .expect("Server error");
}
