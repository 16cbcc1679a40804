use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::{error, warn};

/// Log failed requests together with the video URL they targeted, so a
/// rejected or failed extraction can be traced back to its source link.
pub async fn log_request_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let target = target_url(req.uri().query());

    let response = next.run(req).await;
    let status = response.status();
    if status.is_client_error() {
        // Validation rejections (bad URL, missing URL) land here.
        warn!(
            %method,
            %path,
            target = target.as_deref(),
            %status,
            "Request rejected"
        );
    } else if status.is_server_error() {
        // Extraction, download and file-resolution failures land here.
        error!(
            %method,
            %path,
            target = target.as_deref(),
            %status,
            "Request failed"
        );
    }

    response
}

/// Pull the `url` parameter out of the raw query string. GET requests carry
/// the video URL there; POST bodies are not inspected.
fn target_url(query: Option<&str>) -> Option<String> {
    query?.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == "url").then(|| value.to_string())
    })
}
