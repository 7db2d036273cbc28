// Streaming copy from a remote byte source to a local file sink
//
// The source is an async pull abstraction over the format's fetch URL;
// the orchestrator awaits one completion value instead of juggling
// per-event callbacks. Errors on either side end the transfer; a partial
// output file is left in place.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::REFERER;
use reqwest::Client;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use super::errors::DownloadError;
use super::models::{DownloadProgress, VideoFormat};
use super::progress::{ProgressSink, ProgressThrottle, PROGRESS_INTERVAL};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Pull-style byte stream.
#[async_trait]
pub trait ByteSource: Send {
    /// Expected total size, when the source knows it.
    fn content_length(&self) -> Option<u64>;

    /// Next chunk of data; `None` when the stream is drained.
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, DownloadError>;
}

/// Opens a byte source for a chosen format.
#[async_trait]
pub trait SourceOpener: Send + Sync {
    async fn open(&self, format: &VideoFormat) -> Result<Box<dyn ByteSource>, DownloadError>;
}

/// HTTP byte source over a reqwest response stream.
pub struct HttpSource {
    length: Option<u64>,
    stream: BoxStream<'static, reqwest::Result<Bytes>>,
}

#[async_trait]
impl ByteSource for HttpSource {
    fn content_length(&self) -> Option<u64> {
        self.length
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>, DownloadError> {
        self.stream
            .next()
            .await
            .transpose()
            .map_err(|e| DownloadError::Stream(format!("network read failed: {}", e)))
    }
}

/// Opener issuing a GET against the format's fetch URL.
pub struct HttpOpener {
    client: Client,
}

impl HttpOpener {
    pub fn new() -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }
}

impl Default for HttpOpener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceOpener for HttpOpener {
    async fn open(&self, format: &VideoFormat) -> Result<Box<dyn ByteSource>, DownloadError> {
        let response = self
            .client
            .get(&format.url)
            .header(REFERER, "https://www.youtube.com")
            .send()
            .await
            .map_err(|e| DownloadError::Stream(format!("request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| DownloadError::Stream(format!("server rejected request: {}", e)))?;

        // Prefer the response header; fall back to the size the metadata
        // service reported for this format.
        let length = response.content_length().or_else(|| {
            format
                .content_length
                .as_deref()
                .and_then(|s| s.parse().ok())
        });

        Ok(Box::new(HttpSource {
            length,
            stream: response.bytes_stream().boxed(),
        }))
    }
}

/// Drain a source into a file at `path`, emitting throttled progress and
/// one final snapshot. Returns the number of bytes written.
pub async fn copy_to_file(
    mut source: Box<dyn ByteSource>,
    path: &Path,
    sink: &dyn ProgressSink,
) -> Result<u64, DownloadError> {
    let mut file = File::create(path)
        .await
        .map_err(|e| DownloadError::Stream(format!("cannot create {}: {}", path.display(), e)))?;

    let total = source.content_length().unwrap_or(0);
    sink.begin(total);

    let started = Instant::now();
    let mut throttle = ProgressThrottle::new(PROGRESS_INTERVAL);
    let mut downloaded: u64 = 0;

    while let Some(chunk) = source.next_chunk().await? {
        file.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::Stream(format!("write failed: {}", e)))?;
        downloaded += chunk.len() as u64;

        if throttle.should_emit() {
            sink.update(&snapshot(downloaded, total, started.elapsed()));
        }
    }

    file.flush()
        .await
        .map_err(|e| DownloadError::Stream(format!("flush failed: {}", e)))?;

    sink.update(&snapshot(downloaded, total, started.elapsed()));
    Ok(downloaded)
}

fn snapshot(downloaded: u64, total: u64, elapsed: Duration) -> DownloadProgress {
    let secs = elapsed.as_secs_f64();
    let speed = if secs > 0.0 { downloaded as f64 / secs } else { 0.0 };
    let eta_seconds = if total > downloaded && speed > 0.0 {
        Some(((total - downloaded) as f64 / speed) as u64)
    } else {
        None
    };
    DownloadProgress {
        downloaded,
        total,
        speed,
        eta_seconds,
    }
}
