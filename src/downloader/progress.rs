// Progress reporting for streaming transfers
//
// The transfer loop talks to a ProgressSink rather than the terminal
// directly, so the copy logic stays testable; the terminal rendering is
// one implementation of the sink. Emission is rate-limited by the caller
// through ProgressThrottle, which is a display concern, not correctness.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::models::DownloadProgress;
use super::utils::{format_bytes, format_success, format_time};

/// Minimum wall-clock gap between two progress renders.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

/// Receiver for transfer progress events.
pub trait ProgressSink: Send + Sync {
    /// The transfer is starting; `total` is 0 when the size is unknown.
    fn begin(&self, total: u64);

    /// A throttled in-flight snapshot, plus one final snapshot at the end.
    fn update(&self, progress: &DownloadProgress);

    /// The transfer finished and the sink should print the success line.
    fn succeed(&self, message: &str);

    /// The transfer failed; clear any in-place rendering. The error line
    /// itself is printed once at the top level.
    fn abort(&self);
}

/// Rate-limiter for progress updates.
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            min_interval,
        }
    }

    /// True when enough time has passed since the last emission; the
    /// first call always passes.
    pub fn should_emit(&mut self) -> bool {
        let now = Instant::now();
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }

    /// Force the next check to pass.
    pub fn reset(&mut self) {
        self.last_emit = None;
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(PROGRESS_INTERVAL)
    }
}

/// Terminal sink rendering an in-place bar (known size) or spinner
/// (unknown size).
pub struct TerminalProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalProgress {
    fn begin(&self, total: u64) {
        let pb = if total > 0 {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb.set_message(format!("0% (0/{})", format_bytes(total)));
            pb
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap(),
            );
            pb.set_message("Downloading... (size unknown)");
            pb
        };
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.bar.lock().unwrap() = Some(pb);
    }

    fn update(&self, progress: &DownloadProgress) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            if progress.total > 0 {
                pb.set_position(progress.downloaded);
                let percent =
                    ((progress.downloaded as f64 / progress.total as f64) * 100.0).round() as u64;
                let eta = progress
                    .eta_seconds
                    .map(format_time)
                    .unwrap_or_else(|| "?".to_string());
                pb.set_message(format!(
                    "{}% ({}/{}) - {}/s - ETA: {}",
                    percent,
                    format_bytes(progress.downloaded),
                    format_bytes(progress.total),
                    format_bytes(progress.speed as u64),
                    eta,
                ));
            } else {
                pb.set_message(format!(
                    "Downloading... {} - {}/s",
                    format_bytes(progress.downloaded),
                    format_bytes(progress.speed as u64),
                ));
            }
        }
    }

    fn succeed(&self, message: &str) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            pb.finish_and_clear();
        }
        println!("{}", format_success(message));
    }

    fn abort(&self) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            pb.finish_and_clear();
        }
    }
}
