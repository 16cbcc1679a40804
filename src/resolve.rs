use anyhow::bail;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// Compute the filename the extractor reports for a finished download:
/// the output template with `%(ext)s` substituted by the entry's actual
/// extension.
pub fn reported_filename(output_template: &str, info: &Value) -> PathBuf {
    let ext = info.get("ext").and_then(Value::as_str).unwrap_or("mp4");
    PathBuf::from(output_template.replace("%(ext)s", ext))
}

/// Locate the artifact a finished download actually produced.
///
/// Post-processing may change the extension from what the template
/// predicted, so resolution is a fallback chain:
/// 1. the reported filename with the expected final extension,
/// 2. the reported filename as-is,
/// 3. any file in the output directory whose name starts with the job id.
pub async fn resolve_output(
    reported: &Path,
    expected_ext: &str,
    downloads_dir: &Path,
    job_id: &str,
) -> anyhow::Result<PathBuf> {
    let final_path = reported.with_extension(expected_ext);
    if tokio::fs::try_exists(&final_path).await.unwrap_or(false) {
        return Ok(final_path);
    }

    if tokio::fs::try_exists(reported).await.unwrap_or(false) {
        return Ok(reported.to_path_buf());
    }

    let mut entries = tokio::fs::read_dir(downloads_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_name().to_string_lossy().starts_with(job_id) {
            let path = entry.path();
            info!(?path, "Found file");
            return Ok(path);
        }
    }

    bail!("Downloaded file not found")
}
