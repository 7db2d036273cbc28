// Error types for the download flow

use std::fmt;

/// Terminal failures of a single download invocation.
///
/// None of these are retried; each is caught once at the top level and
/// rendered as a single error line with a non-zero exit.
#[derive(Debug, Clone)]
pub enum DownloadError {
    /// User input does not match any known YouTube URL shape
    InvalidUrl(String),

    /// The extraction binary is not installed or not on PATH
    ToolNotFound(String),

    /// Remote lookup failed or the video is unavailable/restricted
    MetadataFetch(String),

    /// Requested quality/type combination is not offered
    NoSuitableFormat(String),

    /// Network interruption or local write failure during transfer
    Stream(String),

    /// Output directory could not be created
    Filesystem(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(url) => write!(f, "Invalid YouTube URL: {}", url),
            Self::ToolNotFound(msg) => write!(f, "Tool not found: {}", msg),
            Self::MetadataFetch(msg) => write!(f, "Failed to fetch video info: {}", msg),
            Self::NoSuitableFormat(msg) => write!(f, "No suitable format: {}", msg),
            Self::Stream(msg) => write!(f, "Download failed: {}", msg),
            Self::Filesystem(msg) => write!(f, "Filesystem error: {}", msg),
        }
    }
}

impl std::error::Error for DownloadError {}

// Classify raw extraction-service output (stderr or spawn errors) into an
// error kind. yt-dlp reports everything as free text, so this is substring
// detection; anything unrecognized counts as a metadata failure.
impl From<String> for DownloadError {
    fn from(s: String) -> Self {
        let line = error_line(&s);

        if s.contains("is not a valid URL")
            || s.contains("Unsupported URL")
            || s.contains("Invalid URL")
        {
            return Self::InvalidUrl(line);
        }

        if s.contains("No such file")
            || s.contains("command not found")
            || s.contains("failed to start")
        {
            return Self::ToolNotFound(line);
        }

        Self::MetadataFetch(line)
    }
}

/// Pick the most useful single line out of a multi-line tool report:
/// the first line flagged `ERROR:`, otherwise the last non-empty line.
fn error_line(s: &str) -> String {
    if let Some(line) = s.lines().find(|l| l.trim_start().starts_with("ERROR:")) {
        return line.trim().trim_start_matches("ERROR:").trim().to_string();
    }
    s.lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("unknown error")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_invalid_url() {
        let err = DownloadError::from("ERROR: 'htp://x' is not a valid URL".to_string());
        assert!(matches!(err, DownloadError::InvalidUrl(_)));
    }

    #[test]
    fn classifies_missing_tool() {
        let err = DownloadError::from("failed to start yt-dlp: No such file".to_string());
        assert!(matches!(err, DownloadError::ToolNotFound(_)));
    }

    #[test]
    fn unrecognized_output_is_a_metadata_failure() {
        let err = DownloadError::from("ERROR: Video unavailable".to_string());
        match err {
            DownloadError::MetadataFetch(msg) => assert_eq!(msg, "Video unavailable"),
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn picks_the_error_line_out_of_noise() {
        let raw = "WARNING: unrelated\nERROR: Private video\n".to_string();
        match DownloadError::from(raw) {
            DownloadError::MetadataFetch(msg) => assert_eq!(msg, "Private video"),
            other => panic!("unexpected kind: {:?}", other),
        }
    }
}
