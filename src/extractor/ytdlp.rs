use super::{ExtractorOptions, MediaExtractor, Postprocessor};
use anyhow::{Context, bail};
use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, error};

/// `MediaExtractor` backed by the yt-dlp binary.
///
/// Metadata and download runs both use `-J` so yt-dlp prints the resolved
/// info mapping as a single JSON object on stdout; download runs add
/// `--no-simulate` so the media is actually fetched. Failures carry
/// yt-dlp's stderr text verbatim, which downstream error classification
/// pattern-matches against.
pub struct YtDlpExtractor {
    bin: String,
}

impl YtDlpExtractor {
    pub fn new(bin: String) -> Self {
        YtDlpExtractor { bin }
    }

    fn build_args(url: &str, opts: &ExtractorOptions, download: bool) -> Vec<String> {
        let mut args: Vec<String> = vec!["-J".into()];
        if download {
            args.push("--no-simulate".into());
        }
        if opts.quiet {
            args.push("--quiet".into());
        }
        if opts.no_warnings {
            args.push("--no-warnings".into());
        }
        for (name, value) in opts.http_headers {
            args.push("--add-headers".into());
            args.push(format!("{name}:{value}"));
        }
        if !opts.check_certificates {
            args.push("--no-check-certificates".into());
        }
        if let Some(retries) = opts.retries {
            args.push("--retries".into());
            args.push(retries.to_string());
        }
        if let Some(retries) = opts.fragment_retries {
            args.push("--fragment-retries".into());
            args.push(retries.to_string());
        }
        if let Some(template) = &opts.output_template {
            args.push("-o".into());
            args.push(template.clone());
        }
        if let Some(format) = &opts.format {
            args.push("-f".into());
            args.push(format.clone());
        }
        if let Some(container) = &opts.merge_output_format {
            args.push("--merge-output-format".into());
            args.push(container.clone());
        }
        for pp in &opts.postprocessors {
            match pp {
                Postprocessor::ExtractAudio { codec, quality } => {
                    args.push("-x".into());
                    args.push("--audio-format".into());
                    args.push((*codec).into());
                    args.push("--audio-quality".into());
                    args.push((*quality).into());
                }
                Postprocessor::ConvertVideo { target } => {
                    args.push("--recode-video".into());
                    args.push((*target).into());
                }
            }
        }
        args.push(url.into());
        args
    }

    async fn run(
        &self,
        url: &str,
        opts: &ExtractorOptions,
        download: bool,
    ) -> anyhow::Result<Value> {
        let args = Self::build_args(url, opts, download);
        debug!(bin = %self.bin, ?args, "Invoking yt-dlp");

        let output = Command::new(&self.bin)
            .args(&args)
            .output()
            .await
            .with_context(|| format!("Failed to execute {}", self.bin))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            error!(status = ?output.status, stderr, "yt-dlp failed");
            if stderr.is_empty() {
                bail!("yt-dlp exited with {}", output.status);
            }
            // Keep the tool's message intact for classification.
            bail!("{stderr}");
        }

        serde_json::from_slice(&output.stdout).context("Could not parse yt-dlp JSON output")
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn fetch_metadata(&self, url: &str, opts: &ExtractorOptions) -> anyhow::Result<Value> {
        self.run(url, opts, false).await
    }

    async fn download(&self, url: &str, opts: &ExtractorOptions) -> anyhow::Result<Value> {
        self.run(url, opts, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DownloadFormat;
    use std::path::PathBuf;

    fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
        args.windows(2)
            .any(|pair| pair[0] == flag && pair[1] == value)
    }

    #[test]
    fn metadata_args_probe_without_download() {
        let opts = ExtractorOptions::metadata();
        let args = YtDlpExtractor::build_args("https://www.tiktok.com/@u/video/1", &opts, false);

        assert!(args.contains(&"-J".to_string()));
        assert!(!args.contains(&"--no-simulate".to_string()));
        assert!(args.contains(&"--quiet".to_string()));
        assert!(args.contains(&"--no-warnings".to_string()));
        assert!(args.contains(&"--no-check-certificates".to_string()));
        assert!(has_pair(
            &args,
            "--add-headers",
            "Referer:https://www.tiktok.com/"
        ));
        assert_eq!(args.last().unwrap(), "https://www.tiktok.com/@u/video/1");
    }

    #[test]
    fn mp3_download_args_extract_audio() {
        let profile = DownloadFormat::Mp3.profile(&PathBuf::from("downloads"));
        let opts = ExtractorOptions::download(&profile, 3, 3);
        let args = YtDlpExtractor::build_args("https://vm.tiktok.com/x/", &opts, true);

        assert!(args.contains(&"--no-simulate".to_string()));
        assert!(has_pair(&args, "--retries", "3"));
        assert!(has_pair(&args, "--fragment-retries", "3"));
        assert!(has_pair(&args, "-o", &profile.output_template));
        assert!(has_pair(&args, "-f", "bestaudio/best"));
        assert!(args.contains(&"-x".to_string()));
        assert!(has_pair(&args, "--audio-format", "mp3"));
        assert!(has_pair(&args, "--audio-quality", "192K"));
        assert!(!args.contains(&"--merge-output-format".to_string()));
    }

    #[test]
    fn video_download_args_recode_to_mp4() {
        let profile = DownloadFormat::HdNoWatermark.profile(&PathBuf::from("downloads"));
        let opts = ExtractorOptions::download(&profile, 3, 3);
        let args = YtDlpExtractor::build_args("https://vt.tiktok.com/x/", &opts, true);

        assert!(has_pair(&args, "-f", "best[ext=mp4]/best"));
        assert!(has_pair(&args, "--merge-output-format", "mp4"));
        assert!(has_pair(&args, "--recode-video", "mp4"));
        assert!(!args.contains(&"-x".to_string()));
    }
}
