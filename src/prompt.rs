// Interactive prompt sequence for missing download options
//
// Flag values seed the default selections, and every answer is an
// explicit user choice, so a flag can never be clobbered by a default
// the user did not see.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::path::PathBuf;

use crate::downloader::extractor::validate_url;
use crate::downloader::models::{DownloadOptions, TargetFormat};

/// Everything the prompt sequence resolves.
pub struct PromptOutcome {
    pub url: String,
    pub options: DownloadOptions,
}

/// Ask for URL (when missing), format, quality (unless audio-only) and
/// output directory.
pub fn prompt_for_options(
    initial_url: Option<&str>,
    defaults: &DownloadOptions,
) -> dialoguer::Result<PromptOutcome> {
    let theme = ColorfulTheme::default();

    let url = match initial_url {
        Some(u) => u.to_string(),
        None => Input::with_theme(&theme)
            .with_prompt("YouTube video URL")
            .validate_with(|input: &String| -> Result<(), &str> {
                if validate_url(input.trim()) {
                    Ok(())
                } else {
                    Err("Please enter a valid YouTube URL")
                }
            })
            .interact_text()?
            .trim()
            .to_string(),
    };

    let format_labels = ["MP4 (Video)", "MP3 (Audio only)", "WebM (Video)"];
    let format_values = [TargetFormat::Mp4, TargetFormat::Mp3, TargetFormat::Webm];
    let format_default = format_values
        .iter()
        .position(|f| *f == defaults.format)
        .unwrap_or(0);
    let picked = Select::with_theme(&theme)
        .with_prompt("Select output format")
        .items(&format_labels)
        .default(format_default)
        .interact()?;
    let format = format_values[picked];

    // Audio has no resolution concept, so the quality question is
    // skipped entirely for mp3.
    let quality = if format.is_audio_only() {
        None
    } else {
        let quality_labels = [
            "1080p (Full HD)",
            "720p (HD)",
            "480p (SD)",
            "360p",
            "Best available",
        ];
        let quality_values = [
            Some("1080p"),
            Some("720p"),
            Some("480p"),
            Some("360p"),
            None,
        ];
        let quality_default = defaults
            .quality
            .as_deref()
            .and_then(|q| quality_values.iter().position(|v| *v == Some(q)))
            .unwrap_or(quality_values.len() - 1);
        let picked = Select::with_theme(&theme)
            .with_prompt("Select video quality")
            .items(&quality_labels)
            .default(quality_default)
            .interact()?;
        quality_values[picked].map(String::from)
    };

    let output_dir: String = Input::with_theme(&theme)
        .with_prompt("Output directory")
        .default(defaults.output_dir.display().to_string())
        .interact_text()?;

    Ok(PromptOutcome {
        url,
        options: DownloadOptions {
            quality,
            format,
            output_dir: expand_tilde(output_dir.trim()),
            output_filename: defaults.output_filename.clone(),
        },
    })
}

/// Expand a leading `~` to the home directory, the way shells would have
/// before handing us the path.
fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/videos"), home.join("videos"));
        }
        assert_eq!(expand_tilde("/tmp/x"), PathBuf::from("/tmp/x"));
    }
}
