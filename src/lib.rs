pub mod cli;
pub mod downloader;
pub mod prompt;

pub use downloader::{DownloadError, DownloadOptions, Downloader, TargetFormat};
