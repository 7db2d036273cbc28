// Metadata client wrapping the yt-dlp extraction service
//
// The service is a black box: it validates the video, resolves the format
// list and hands back a direct fetch URL per format. This module shells
// out to the binary in --dump-json mode, classifies its stderr and maps
// the JSON document into the VideoInfo snapshot.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;
use tokio::time::{timeout, Duration};

use super::errors::DownloadError;
use super::models::{VideoFormat, VideoInfo};

lazy_static! {
    // Known YouTube URL shapes. The exact grammar belongs to the service;
    // this only rejects obvious non-candidates before spawning it.
    static ref WATCH_URL_RE: Regex = Regex::new(
        r"^https?://(www\.|m\.|music\.)?youtube\.com/(watch\?\S*v=|shorts/|embed/|live/)[A-Za-z0-9_-]{6,}"
    )
    .unwrap();
    static ref SHORT_URL_RE: Regex =
        Regex::new(r"^https?://youtu\.be/[A-Za-z0-9_-]{6,}").unwrap();
}

/// Check whether a string looks like a YouTube video URL.
pub fn validate_url(url: &str) -> bool {
    WATCH_URL_RE.is_match(url) || SHORT_URL_RE.is_match(url)
}

/// Configuration for the extraction call.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Socket timeout handed to the service, also the outer process
    /// timeout budget.
    pub timeout_seconds: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self { timeout_seconds: 30 }
    }
}

impl ExtractorConfig {
    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Trait for metadata providers, so the orchestrator can run against a
/// mock service in tests.
#[async_trait]
pub trait InfoExtractor: Send + Sync {
    /// Name of the extractor (for diagnostics)
    fn name(&self) -> &'static str;

    /// Check if this extractor can run at all
    fn is_available(&self) -> bool;

    /// Fetch the metadata snapshot for one video
    async fn fetch(&self, url: &str) -> Result<VideoInfo, DownloadError>;
}

/// Production extractor invoking the yt-dlp binary.
pub struct YtDlpExtractor {
    ytdlp_path: String,
    config: ExtractorConfig,
}

impl YtDlpExtractor {
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self {
            ytdlp_path: find_ytdlp(),
            config,
        }
    }

    fn build_args(&self, url: &str) -> Vec<String> {
        vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            self.config.timeout_seconds.to_string(),
            url.to_string(),
        ]
    }

    fn parse_json(stdout: &[u8]) -> Result<VideoInfo, DownloadError> {
        let json_str = String::from_utf8_lossy(stdout);
        let json: serde_json::Value = serde_json::from_str(&json_str)
            .map_err(|e| DownloadError::MetadataFetch(format!("invalid metadata JSON: {}", e)))?;

        let formats = Self::parse_formats(&json)?;

        Ok(VideoInfo {
            video_id: json["id"].as_str().unwrap_or("unknown").to_string(),
            title: json["title"].as_str().unwrap_or("Unknown").to_string(),
            author: json["uploader"].as_str().unwrap_or("Unknown").to_string(),
            duration: json["duration"].as_f64().unwrap_or(0.0) as u64,
            formats,
        })
    }

    fn parse_formats(json: &serde_json::Value) -> Result<Vec<VideoFormat>, DownloadError> {
        let formats_array = json["formats"].as_array().ok_or_else(|| {
            DownloadError::MetadataFetch("no formats array in metadata".to_string())
        })?;

        let mut formats = Vec::new();

        for f in formats_array {
            // Formats without a direct fetch URL (DRM, storyboards) are
            // useless to the transfer step.
            let url = match f["url"].as_str() {
                Some(u) if !u.is_empty() => u.to_string(),
                _ => continue,
            };

            let has_video = f["vcodec"].as_str().map_or(false, |v| v != "none");
            let has_audio = f["acodec"].as_str().map_or(false, |a| a != "none");
            if !has_video && !has_audio {
                continue;
            }

            let quality = f["format_id"].as_str().unwrap_or("unknown").to_string();
            let quality_label = f["format_note"]
                .as_str()
                .map(|s| s.to_string())
                .or_else(|| f["height"].as_u64().map(|h| format!("{}p", h)))
                .unwrap_or_else(|| quality.clone());

            formats.push(VideoFormat {
                quality,
                quality_label,
                container: f["ext"].as_str().unwrap_or("unknown").to_string(),
                has_audio,
                has_video,
                url,
                content_length: f["filesize"]
                    .as_u64()
                    .or_else(|| f["filesize_approx"].as_u64())
                    .map(|n| n.to_string()),
            });
        }

        Ok(formats)
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InfoExtractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn is_available(&self) -> bool {
        match std::process::Command::new(&self.ytdlp_path)
            .arg("--version")
            .output()
        {
            Ok(out) => out.status.success(),
            Err(_) => false,
        }
    }

    async fn fetch(&self, url: &str) -> Result<VideoInfo, DownloadError> {
        if !self.is_available() {
            return Err(DownloadError::ToolNotFound(
                "yt-dlp binary not found (install it or set YTDLP_PATH)".to_string(),
            ));
        }

        let args = self.build_args(url);
        let output = run_with_timeout(
            &self.ytdlp_path,
            &args,
            u64::from(self.config.timeout_seconds) + 5,
        )
        .await
        .map_err(DownloadError::from)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            eprintln!("[extractor] yt-dlp failed for {}", url);
            return Err(DownloadError::from(stderr.to_string()));
        }

        Self::parse_json(&output.stdout)
    }
}

/// Find the extraction binary: explicit override, common install paths,
/// then `which`, then hope PATH resolves it.
fn find_ytdlp() -> String {
    if let Ok(path) = std::env::var("YTDLP_PATH") {
        if !path.trim().is_empty() {
            return path;
        }
    }

    let common_paths = [
        "/opt/homebrew/bin/yt-dlp",
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
    ];

    for path in common_paths {
        if std::path::Path::new(path).exists() {
            return path.to_string();
        }
    }

    if let Ok(output) = std::process::Command::new("which").arg("yt-dlp").output() {
        if output.status.success() {
            if let Ok(path) = String::from_utf8(output.stdout) {
                let trimmed = path.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
            }
        }
    }

    "yt-dlp".to_string()
}

/// Run the service process with piped output and an outer wall-clock
/// timeout, killing it if the budget runs out.
async fn run_with_timeout(
    program: &str,
    args: &[String],
    timeout_secs: u64,
) -> Result<std::process::Output, String> {
    let child = TokioCommand::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("failed to start {}: {}", program, e))?;

    match timeout(Duration::from_secs(timeout_secs), child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| format!("failed to wait for {}: {}", program, e)),
        Err(_) => Err(format!("{} timed out after {}s", program, timeout_secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_url_shapes() {
        assert!(validate_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(validate_url("https://youtube.com/watch?list=PL123&v=dQw4w9WgXcQ"));
        assert!(validate_url("https://m.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(validate_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(validate_url("https://www.youtube.com/shorts/abc123XYZ_-"));
        assert!(validate_url("http://www.youtube.com/embed/dQw4w9WgXcQ"));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!validate_url(""));
        assert!(!validate_url("not a url"));
        assert!(!validate_url("https://example.com/watch?v=dQw4w9WgXcQ"));
        assert!(!validate_url("https://www.youtube.com/"));
        assert!(!validate_url("youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn parses_a_dump_json_document() {
        let doc = serde_json::json!({
            "id": "dQw4w9WgXcQ",
            "title": "Test Video",
            "uploader": "Test Channel",
            "duration": 212.5,
            "formats": [
                {
                    "format_id": "sb0",
                    "ext": "mhtml",
                    "vcodec": "none",
                    "acodec": "none",
                    "url": "https://cdn.example/storyboard"
                },
                {
                    "format_id": "140",
                    "ext": "m4a",
                    "format_note": "medium",
                    "vcodec": "none",
                    "acodec": "mp4a.40.2",
                    "filesize": 3_400_000,
                    "url": "https://cdn.example/audio"
                },
                {
                    "format_id": "22",
                    "ext": "mp4",
                    "format_note": "720p",
                    "height": 720,
                    "vcodec": "avc1.64001F",
                    "acodec": "mp4a.40.2",
                    "url": "https://cdn.example/720"
                },
                {
                    "format_id": "137",
                    "ext": "mp4",
                    "height": 1080,
                    "vcodec": "avc1.640028",
                    "acodec": "none",
                    "filesize_approx": 80_000_000,
                    "url": "https://cdn.example/1080-video"
                }
            ]
        });
        let info = YtDlpExtractor::parse_json(doc.to_string().as_bytes()).unwrap();

        assert_eq!(info.video_id, "dQw4w9WgXcQ");
        assert_eq!(info.title, "Test Video");
        assert_eq!(info.author, "Test Channel");
        assert_eq!(info.duration, 212);

        // The storyboard entry (neither audio nor video) is filtered out.
        assert_eq!(info.formats.len(), 3);

        let audio = &info.formats[0];
        assert!(audio.has_audio && !audio.has_video);
        assert_eq!(audio.content_length.as_deref(), Some("3400000"));

        let combined = &info.formats[1];
        assert!(combined.has_audio && combined.has_video);
        assert_eq!(combined.quality_label, "720p");
        assert!(combined.content_length.is_none());

        let video_only = &info.formats[2];
        assert!(video_only.has_video && !video_only.has_audio);
        // No format_note: the label falls back to the height.
        assert_eq!(video_only.quality_label, "1080p");
        assert_eq!(video_only.content_length.as_deref(), Some("80000000"));
    }

    #[test]
    fn formats_missing_a_url_are_dropped() {
        let doc = serde_json::json!({
            "id": "x",
            "title": "t",
            "uploader": "u",
            "duration": 1,
            "formats": [
                { "format_id": "1", "ext": "mp4", "vcodec": "avc1", "acodec": "mp4a" }
            ]
        });
        let info = YtDlpExtractor::parse_json(doc.to_string().as_bytes()).unwrap();
        assert!(info.formats.is_empty());
    }

    #[test]
    fn garbage_output_is_a_metadata_failure() {
        let err = YtDlpExtractor::parse_json(b"not json").unwrap_err();
        assert!(matches!(err, DownloadError::MetadataFetch(_)));
    }

    #[test]
    fn config_timeout_is_adjustable() {
        let config = ExtractorConfig::default().with_timeout(10);
        assert_eq!(config.timeout_seconds, 10);
    }
}
