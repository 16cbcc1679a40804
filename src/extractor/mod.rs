pub mod ytdlp;

use crate::format::DownloadProfile;
use async_trait::async_trait;
use serde_json::Value;

pub use ytdlp::YtDlpExtractor;

/// Browser-like headers sent with every extractor request. TikTok rejects
/// requests that do not look like they come from a real browser.
pub const TIKTOK_HEADERS: &[(&str, &str)] = &[
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    ),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("Referer", "https://www.tiktok.com/"),
];

/// A post-retrieval transformation carried out by the extractor's
/// post-processing stage (ffmpeg under the hood).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Postprocessor {
    /// Extract the audio track and transcode it to the given codec.
    ExtractAudio {
        codec: &'static str,
        quality: &'static str,
    },
    /// Re-container/convert the video to the given target format.
    ConvertVideo { target: &'static str },
}

/// Declarative options handed to the extraction tool.
#[derive(Debug, Clone, Default)]
pub struct ExtractorOptions {
    pub quiet: bool,
    pub no_warnings: bool,
    pub http_headers: &'static [(&'static str, &'static str)],
    pub check_certificates: bool,
    pub retries: Option<u32>,
    pub fragment_retries: Option<u32>,
    pub output_template: Option<String>,
    pub format: Option<String>,
    pub merge_output_format: Option<String>,
    pub postprocessors: Vec<Postprocessor>,
}

impl ExtractorOptions {
    /// Options for a metadata-only probe: quiet, no file output.
    pub fn metadata() -> Self {
        ExtractorOptions {
            quiet: true,
            no_warnings: true,
            http_headers: TIKTOK_HEADERS,
            check_certificates: false,
            ..Default::default()
        }
    }

    /// Options for a full download with the given profile.
    pub fn download(profile: &DownloadProfile, retries: u32, fragment_retries: u32) -> Self {
        ExtractorOptions {
            quiet: false,
            no_warnings: false,
            http_headers: TIKTOK_HEADERS,
            check_certificates: false,
            retries: Some(retries),
            fragment_retries: Some(fragment_retries),
            output_template: Some(profile.output_template.clone()),
            format: Some(profile.format_expr.to_string()),
            merge_output_format: profile.merge_output_format.map(str::to_string),
            postprocessors: vec![profile.postprocessor.clone()],
        }
    }
}

/// The external media-extraction capability, behind a seam so handlers can
/// be exercised against a fake in tests.
///
/// Both operations block (logically) for the full duration of the network
/// transfer; there is no progress reporting or cancellation.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Resolve the URL into its raw metadata mapping without downloading.
    async fn fetch_metadata(&self, url: &str, opts: &ExtractorOptions) -> anyhow::Result<Value>;

    /// Download the media to disk per the options, returning the raw
    /// metadata mapping for the downloaded entry.
    async fn download(&self, url: &str, opts: &ExtractorOptions) -> anyhow::Result<Value>;
}
