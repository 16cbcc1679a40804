use anyhow::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure that can be loaded from CLI or config file
///
/// Example configuration file content
/// # TikTok Downloader Configuration
///
/// listen_on_port = 8000
/// downloads_dir = "downloads"
/// ytdlp_bin = "yt-dlp"
/// retries = 3
/// fragment_retries = 3
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    #[serde(default = "default_port")]
    pub listen_on_port: u16,

    /// Directory holding transient per-request download artifacts
    #[arg(short, long, default_value = "downloads")]
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: String,

    /// Path to the yt-dlp binary
    #[arg(short = 'y', long, default_value = "yt-dlp")]
    #[serde(default = "default_ytdlp_bin")]
    pub ytdlp_bin: String,

    /// Network retry count passed to the extractor
    #[arg(short, long, default_value_t = 3)]
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Fragment retry count passed to the extractor
    #[arg(short, long, default_value_t = 3)]
    #[serde(default = "default_retries")]
    pub fragment_retries: u32,

    /// Configuration file path (CLI arguments take precedence)
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_on_port: default_port(),
            downloads_dir: default_downloads_dir(),
            ytdlp_bin: default_ytdlp_bin(),
            retries: default_retries(),
            fragment_retries: default_retries(),
            config: None,
        }
    }
}

impl Config {
    /// Load configuration from CLI args, optionally merging with a config file
    pub fn load() -> Result<Self> {
        let mut config = Config::parse();

        if let Some(config_path) = &config.config {
            let file_config = Self::from_file(Path::new(config_path))?;
            config = config.merge_with_file(file_config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge with file config; CLI args at non-default values take precedence
    fn merge_with_file(mut self, file_config: Config) -> Self {
        if self.listen_on_port == default_port() {
            self.listen_on_port = file_config.listen_on_port;
        }
        if self.downloads_dir == default_downloads_dir() {
            self.downloads_dir = file_config.downloads_dir;
        }
        if self.ytdlp_bin == default_ytdlp_bin() {
            self.ytdlp_bin = file_config.ytdlp_bin;
        }
        if self.retries == default_retries() {
            self.retries = file_config.retries;
        }
        if self.fragment_retries == default_retries() {
            self.fragment_retries = file_config.fragment_retries;
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.downloads_dir.is_empty() {
            return Err(anyhow::anyhow!("Downloads directory cannot be empty"));
        }
        if self.ytdlp_bin.is_empty() {
            return Err(anyhow::anyhow!("yt-dlp binary path cannot be empty"));
        }
        Ok(())
    }
}

// Default value functions
fn default_port() -> u16 {
    8000
}

fn default_downloads_dir() -> String {
    "downloads".to_string()
}

fn default_ytdlp_bin() -> String {
    "yt-dlp".to_string()
}

fn default_retries() -> u32 {
    3
}
