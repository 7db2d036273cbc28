// Format selection over the metadata snapshot
//
// Quality labels are not contractually specified by the metadata service,
// so both queries rank candidates with parsing heuristics: the integer
// prefix of the label for resolution, the first digit run of the quality
// code for audio. Ties keep the service's original order.

use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Reverse;

use super::models::VideoFormat;

lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"\d+").unwrap();
}

/// Integer prefix of a quality label ("1080p60" -> 1080); non-numeric
/// labels rank as 0.
fn label_resolution(label: &str) -> u64 {
    let digits: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// First digit run anywhere in a quality code ("itag 251" -> 251);
/// codes without digits rank as 0.
fn quality_rate(quality: &str) -> u64 {
    DIGIT_RUN
        .find(quality)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Pick the best combined audio+video format.
///
/// A quality hint wins when any audio+video format's label contains it
/// (first match in service order). Otherwise the audio+video formats are
/// ranked by descending label resolution, stable on ties. `None` when no
/// format carries both tracks.
pub fn best_format<'a>(
    formats: &'a [VideoFormat],
    quality_hint: Option<&str>,
) -> Option<&'a VideoFormat> {
    if let Some(hint) = quality_hint {
        let preferred = formats
            .iter()
            .find(|f| f.has_video && f.has_audio && f.quality_label.contains(hint));
        if preferred.is_some() {
            return preferred;
        }
    }

    let mut candidates: Vec<&VideoFormat> = formats
        .iter()
        .filter(|f| f.has_video && f.has_audio)
        .collect();
    candidates.sort_by_key(|f| Reverse(label_resolution(&f.quality_label)));
    candidates.first().copied()
}

/// Pick the best audio-only format, ranked by the bitrate-like value in
/// its quality code. `None` when no format is audio-only.
pub fn audio_only_format(formats: &[VideoFormat]) -> Option<&VideoFormat> {
    let mut candidates: Vec<&VideoFormat> = formats
        .iter()
        .filter(|f| f.has_audio && !f.has_video)
        .collect();
    candidates.sort_by_key(|f| Reverse(quality_rate(&f.quality)));
    candidates.first().copied()
}
