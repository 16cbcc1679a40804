use crate::extractor::Postprocessor;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// The three download profiles exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadFormat {
    #[default]
    HdNoWatermark,
    WithWatermark,
    Mp3,
}

impl DownloadFormat {
    /// Parse a format tag, silently coercing unrecognized values to the
    /// default instead of failing.
    pub fn parse_lenient(tag: &str) -> Self {
        match tag {
            "hd_no_watermark" => DownloadFormat::HdNoWatermark,
            "with_watermark" => DownloadFormat::WithWatermark,
            "mp3" => DownloadFormat::Mp3,
            _ => DownloadFormat::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadFormat::HdNoWatermark => "hd_no_watermark",
            DownloadFormat::WithWatermark => "with_watermark",
            DownloadFormat::Mp3 => "mp3",
        }
    }

    /// Build the download configuration for this format with a fresh job id.
    ///
    /// Both video formats map to the same selection and post-processing:
    /// the upstream TikTok extractor exposes no watermark control through
    /// format selection, so `with_watermark` and `hd_no_watermark` behave
    /// identically. Known limitation.
    pub fn profile(&self, downloads_dir: &Path) -> DownloadProfile {
        let job_id = new_job_id();
        let output_template = downloads_dir
            .join(format!("{job_id}.%(ext)s"))
            .to_string_lossy()
            .into_owned();

        match self {
            DownloadFormat::Mp3 => DownloadProfile {
                job_id,
                output_template,
                format_expr: "bestaudio/best",
                merge_output_format: None,
                postprocessor: Postprocessor::ExtractAudio {
                    codec: "mp3",
                    quality: "192K",
                },
                expected_ext: "mp3",
            },
            DownloadFormat::HdNoWatermark | DownloadFormat::WithWatermark => DownloadProfile {
                job_id,
                output_template,
                format_expr: "best[ext=mp4]/best",
                merge_output_format: Some("mp4"),
                postprocessor: Postprocessor::ConvertVideo { target: "mp4" },
                expected_ext: "mp4",
            },
        }
    }
}

/// Per-request download configuration handed to the extractor.
#[derive(Debug, Clone)]
pub struct DownloadProfile {
    /// Fresh random identifier scoping this request's output filename.
    pub job_id: String,
    /// Output path template; the extractor substitutes the real extension.
    pub output_template: String,
    /// Media selection expression.
    pub format_expr: &'static str,
    /// Container to merge split audio/video streams into, when applicable.
    pub merge_output_format: Option<&'static str>,
    /// Post-processing directive applied after retrieval.
    pub postprocessor: Postprocessor,
    /// Extension the post-processor is expected to produce.
    pub expected_ext: &'static str,
}

/// Short random hexadecimal token; distinct per request so concurrent
/// downloads into the shared directory never collide.
fn new_job_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;

    #[test]
    fn mp3_profile_extracts_audio() {
        let profile = DownloadFormat::Mp3.profile(&PathBuf::from("downloads"));
        assert_eq!(profile.format_expr, "bestaudio/best");
        assert_eq!(profile.merge_output_format, None);
        assert_eq!(profile.expected_ext, "mp3");
        assert_eq!(
            profile.postprocessor,
            Postprocessor::ExtractAudio {
                codec: "mp3",
                quality: "192K",
            }
        );
        assert!(profile.output_template.ends_with(".%(ext)s"));
    }

    #[test]
    fn video_profiles_convert_to_mp4() {
        let dir = PathBuf::from("downloads");
        for format in [DownloadFormat::HdNoWatermark, DownloadFormat::WithWatermark] {
            let profile = format.profile(&dir);
            assert_eq!(profile.format_expr, "best[ext=mp4]/best");
            assert_eq!(profile.merge_output_format, Some("mp4"));
            assert_eq!(profile.expected_ext, "mp4");
            assert_eq!(
                profile.postprocessor,
                Postprocessor::ConvertVideo { target: "mp4" }
            );
        }
    }

    #[test]
    fn unrecognized_tag_falls_back_to_default() {
        assert_eq!(
            DownloadFormat::parse_lenient("ultra_hd"),
            DownloadFormat::HdNoWatermark
        );
        assert_eq!(
            DownloadFormat::parse_lenient(""),
            DownloadFormat::HdNoWatermark
        );

        // The fallback profile is identical to the explicit default's.
        let dir = PathBuf::from("downloads");
        let fallback = DownloadFormat::parse_lenient("bogus").profile(&dir);
        let default = DownloadFormat::HdNoWatermark.profile(&dir);
        assert_eq!(fallback.format_expr, default.format_expr);
        assert_eq!(fallback.merge_output_format, default.merge_output_format);
        assert_eq!(fallback.postprocessor, default.postprocessor);
        assert_eq!(fallback.expected_ext, default.expected_ext);
    }

    #[test]
    fn recognized_tags_round_trip() {
        for tag in ["hd_no_watermark", "with_watermark", "mp3"] {
            assert_eq!(DownloadFormat::parse_lenient(tag).as_str(), tag);
        }
    }

    #[test]
    fn job_ids_are_short_hex_and_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let id = new_job_id();
            assert_eq!(id.len(), 12);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
            assert!(seen.insert(id), "job id collision");
        }
    }
}
