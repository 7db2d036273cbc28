// Command-line argument surface

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::downloader::models::{DownloadOptions, TargetFormat};

/// Download a YouTube video (interactive mode if no URL provided)
#[derive(Parser, Debug)]
#[command(name = "ytfetch", version, about)]
pub struct Cli {
    /// YouTube video URL
    pub url: Option<String>,

    /// Video quality (e.g. 1080p, 720p)
    #[arg(short, long, value_enum)]
    pub quality: Option<QualityArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = TargetFormat::Mp4)]
    pub format: TargetFormat,

    /// Output directory (defaults to the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Force the interactive prompt sequence
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,
}

/// Resolutions accepted as a quality hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    #[value(name = "1080p")]
    Q1080,
    #[value(name = "720p")]
    Q720,
    #[value(name = "480p")]
    Q480,
    #[value(name = "360p")]
    Q360,
}

impl QualityArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Q1080 => "1080p",
            Self::Q720 => "720p",
            Self::Q480 => "480p",
            Self::Q360 => "360p",
        }
    }
}

impl Cli {
    /// Fold the flags into an options record; unset flags fall back to
    /// the documented defaults.
    pub fn to_options(&self) -> DownloadOptions {
        let defaults = DownloadOptions::default();
        DownloadOptions {
            quality: self.quality.map(|q| q.as_str().to_string()),
            format: self.format,
            output_dir: self.output.clone().unwrap_or(defaults.output_dir),
            output_filename: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_mp4_and_non_interactive() {
        let cli = Cli::try_parse_from(["ytfetch"]).unwrap();
        assert!(cli.url.is_none());
        assert_eq!(cli.format, TargetFormat::Mp4);
        assert!(cli.quality.is_none());
        assert!(!cli.interactive);
    }

    #[test]
    fn flags_map_into_options() {
        let cli = Cli::try_parse_from([
            "ytfetch",
            "https://youtu.be/dQw4w9WgXcQ",
            "-q",
            "720p",
            "-f",
            "mp3",
            "-o",
            "/tmp/media",
            "-i",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("https://youtu.be/dQw4w9WgXcQ"));
        assert!(cli.interactive);

        let options = cli.to_options();
        assert_eq!(options.quality.as_deref(), Some("720p"));
        assert_eq!(options.format, TargetFormat::Mp3);
        assert_eq!(options.output_dir, PathBuf::from("/tmp/media"));
    }

    #[test]
    fn rejects_unknown_quality() {
        assert!(Cli::try_parse_from(["ytfetch", "-q", "144p"]).is_err());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["ytfetch", "-f", "mkv"]).is_err());
    }
}
