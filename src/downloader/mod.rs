// Downloader module - metadata client, format selection and streaming copy

pub mod errors;
pub mod extractor;
pub mod format_selector;
pub mod models;
pub mod orchestrator;
pub mod progress;
pub mod transfer;
pub mod utils;

pub use errors::DownloadError;
pub use extractor::{validate_url, InfoExtractor, YtDlpExtractor};
pub use models::{DownloadOptions, DownloadProgress, TargetFormat, VideoFormat, VideoInfo};
pub use orchestrator::Downloader;
pub use progress::{ProgressSink, TerminalProgress};
