// Download orchestration: validate, fetch metadata, select a format,
// stream to disk

use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use super::errors::DownloadError;
use super::extractor::{validate_url, InfoExtractor, YtDlpExtractor};
use super::format_selector::{audio_only_format, best_format};
use super::models::{DownloadOptions, VideoInfo};
use super::progress::ProgressSink;
use super::transfer::{copy_to_file, HttpOpener, SourceOpener};
use super::utils::{format_info, format_success, format_time, sanitize_filename};

/// Drives one download from URL to finished file.
pub struct Downloader {
    extractor: Box<dyn InfoExtractor>,
    opener: Box<dyn SourceOpener>,
}

impl Downloader {
    pub fn new() -> Self {
        Self::with_parts(Box::new(YtDlpExtractor::new()), Box::new(HttpOpener::new()))
    }

    /// Assemble from explicit parts; tests inject mock services here.
    pub fn with_parts(extractor: Box<dyn InfoExtractor>, opener: Box<dyn SourceOpener>) -> Self {
        Self { extractor, opener }
    }

    /// Run the full flow. Returns the path of the written file.
    ///
    /// Every failure is terminal; a partial output file from a failed
    /// transfer is left in place.
    pub async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
        sink: &dyn ProgressSink,
    ) -> Result<PathBuf, DownloadError> {
        if !validate_url(url) {
            return Err(DownloadError::InvalidUrl(url.to_string()));
        }

        let info = self.fetch_info(url).await?;

        println!("{}", format_success(&format!("Found: {}", info.title)));
        println!("{}", format_info(&format!("Author: {}", info.author)));
        println!(
            "{}",
            format_info(&format!("Duration: {}", format_time(info.duration)))
        );

        let format = if options.format.is_audio_only() {
            audio_only_format(&info.formats).ok_or_else(|| {
                DownloadError::NoSuitableFormat("no audio-only format offered".to_string())
            })?
        } else {
            best_format(&info.formats, options.quality.as_deref()).ok_or_else(|| {
                DownloadError::NoSuitableFormat("no audio+video format offered".to_string())
            })?
        };

        let output_path = self.prepare_output(&info, options).await?;

        println!(
            "{}",
            format_info(&format!("Quality: {}", format.quality_label))
        );
        println!(
            "{}",
            format_info(&format!("Output: {}\n", output_path.display()))
        );

        let source = self.opener.open(format).await?;
        match copy_to_file(source, &output_path, sink).await {
            Ok(_) => {
                sink.succeed(&format!(
                    "Downloaded successfully to {}",
                    output_path.display()
                ));
                Ok(output_path)
            }
            Err(e) => {
                sink.abort();
                Err(e)
            }
        }
    }

    /// Metadata round trip with a waiting spinner.
    async fn fetch_info(&self, url: &str) -> Result<VideoInfo, DownloadError> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        spinner.set_message("Fetching video information...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self.extractor.fetch(url).await;
        spinner.finish_and_clear();
        result
    }

    /// Ensure the output directory exists and build the target path as
    /// `{sanitized title}.{extension}`. An existing file of the same name
    /// is silently overwritten later.
    async fn prepare_output(
        &self,
        info: &VideoInfo,
        options: &DownloadOptions,
    ) -> Result<PathBuf, DownloadError> {
        tokio::fs::create_dir_all(&options.output_dir)
            .await
            .map_err(|e| {
                DownloadError::Filesystem(format!(
                    "cannot create {}: {}",
                    options.output_dir.display(),
                    e
                ))
            })?;

        let stem = match &options.output_filename {
            Some(name) => sanitize_filename(name),
            None => sanitize_filename(&info.title),
        };
        let filename = format!("{}.{}", stem, options.format.extension());
        Ok(options.output_dir.join(filename))
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}
