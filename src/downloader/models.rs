// Common data models for the download flow

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Video information extracted from YouTube.
///
/// Built once per invocation from the metadata service output and treated
/// as an immutable snapshot afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub video_id: String,
    pub title: String,
    pub author: String,
    /// Duration in whole seconds.
    pub duration: u64,
    /// Formats in the order the service reported them.
    pub formats: Vec<VideoFormat>,
}

/// One encoding/container variant of a video.
///
/// Invariant: at least one of `has_audio`/`has_video` is true; entries
/// carrying neither are dropped while parsing the metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFormat {
    /// Opaque quality code from the service (numeric itag for YouTube).
    pub quality: String,
    /// Human-readable quality label, e.g. "1080p" or "720p60".
    pub quality_label: String,
    /// Container name, e.g. "mp4" or "webm".
    pub container: String,
    pub has_audio: bool,
    pub has_video: bool,
    /// Direct fetch URL for this format's media stream.
    pub url: String,
    /// String-encoded byte count, absent when the service does not know it.
    pub content_length: Option<String>,
}

/// Target container for the downloaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Mp4,
    Mp3,
    Webm,
}

impl TargetFormat {
    /// File extension appended to the sanitized title.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mp3 => "mp3",
            Self::Webm => "webm",
        }
    }

    /// Whether this target carries no video track.
    pub fn is_audio_only(&self) -> bool {
        matches!(self, Self::Mp3)
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Options for a single download, merged from CLI flags and the
/// interactive prompt.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Quality hint biasing format selection (e.g. "720p"); `None` means
    /// best available.
    pub quality: Option<String>,
    pub format: TargetFormat,
    pub output_dir: PathBuf,
    /// Overrides the sanitized video title as the output file stem.
    pub output_filename: Option<String>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            quality: None,
            format: TargetFormat::Mp4,
            output_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            output_filename: None,
        }
    }
}

/// Snapshot of a transfer in flight, computed by the copy loop and handed
/// to the progress sink. Discarded when the transfer ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadProgress {
    /// Bytes written so far.
    pub downloaded: u64,
    /// Total expected bytes, 0 when the service did not report a size.
    pub total: u64,
    /// Average transfer rate in bytes per second.
    pub speed: f64,
    /// Estimated seconds remaining, absent when the total is unknown.
    pub eta_seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_format_extensions() {
        assert_eq!(TargetFormat::Mp4.extension(), "mp4");
        assert_eq!(TargetFormat::Mp3.extension(), "mp3");
        assert_eq!(TargetFormat::Webm.extension(), "webm");
        assert!(TargetFormat::Mp3.is_audio_only());
        assert!(!TargetFormat::Webm.is_audio_only());
    }

    #[test]
    fn default_options_use_mp4_and_cwd() {
        let options = DownloadOptions::default();
        assert_eq!(options.format, TargetFormat::Mp4);
        assert!(options.quality.is_none());
        assert!(options.output_filename.is_none());
    }
}
