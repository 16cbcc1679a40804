use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata response for `/api/info`, projected from the extractor's raw
/// info mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub author: String,
    pub author_url: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<u64>,
    pub duration_string: Option<String>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub description: Option<String>,
    pub upload_date: Option<String>,
    pub video_url: String,
}

impl VideoInfo {
    /// Project the raw info mapping into the response shape, applying the
    /// documented defaults for absent fields.
    pub fn project(info: &Value, video_url: &str) -> Self {
        let str_field = |name: &str| info.get(name).and_then(Value::as_str).map(str::to_string);
        let count_field = |name: &str| info.get(name).and_then(Value::as_u64);

        // Prefer the direct thumbnail field, else the last entry of the
        // thumbnails list (yt-dlp orders those worst to best).
        let thumbnail = str_field("thumbnail").or_else(|| {
            info.get("thumbnails")
                .and_then(Value::as_array)
                .and_then(|list| list.last())
                .and_then(|entry| entry.get("url"))
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        let duration = info
            .get("duration")
            .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|secs| secs as u64)));

        VideoInfo {
            title: str_field("title").unwrap_or_else(|| "TikTok Video".into()),
            author: str_field("uploader")
                .or_else(|| str_field("creator"))
                .unwrap_or_else(|| "Unknown".into()),
            author_url: str_field("uploader_url").or_else(|| str_field("channel_url")),
            thumbnail,
            duration,
            duration_string: duration.map(format_duration),
            view_count: count_field("view_count"),
            like_count: count_field("like_count"),
            comment_count: count_field("comment_count"),
            description: Some(str_field("description").unwrap_or_default()),
            upload_date: str_field("upload_date"),
            video_url: video_url.to_string(),
        }
    }
}

/// Convert seconds to `M:SS`, or `H:MM:SS` when an hour or more.
pub fn format_duration(seconds: u64) -> String {
    let (mins, secs) = (seconds / 60, seconds % 60);
    let (hours, mins) = (mins / 60, mins % 60);
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}
