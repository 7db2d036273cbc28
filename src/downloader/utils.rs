// Formatting helpers for terminal output and filenames

use console::style;

const BYTE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Render a byte count with binary (1024) unit steps, two decimal places
/// with trailing zeros trimmed. Values past the largest unit stay in GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exp = (((bytes as f64).ln() / 1024f64.ln()).floor() as usize).min(BYTE_UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exp as i32);
    let mut value = format!("{:.2}", scaled);
    if value.contains('.') {
        value = value
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
    }
    format!("{} {}", value, BYTE_UNITS[exp])
}

/// Render a duration in seconds as "1h 2m 3s", omitting leading zero
/// components. All components are floored.
pub fn format_time(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;

    if h > 0 {
        format!("{}h {}m {}s", h, m, s)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// Reduce a video title to a single safe path segment: strip characters
/// that are special on common filesystems, collapse whitespace runs, trim,
/// and cap at 200 characters. A fully-stripped input yields an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(200).collect()
}

pub fn format_error(message: &str) -> String {
    style(format!("✗ {}", message)).red().to_string()
}

pub fn format_success(message: &str) -> String {
    style(format!("✓ {}", message)).green().to_string()
}

pub fn format_info(message: &str) -> String {
    style(format!("ℹ {}", message)).blue().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_zero_is_special_cased() {
        assert_eq!(format_bytes(0), "0 Bytes");
    }

    #[test]
    fn bytes_pick_the_largest_unit() {
        assert_eq!(format_bytes(1023), "1023 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn bytes_beyond_gb_stay_in_gb() {
        assert_eq!(format_bytes(1024u64.pow(4)), "1024 GB");
    }

    #[test]
    fn bytes_keep_two_decimals() {
        // 1.2345 MB rounds to 1.23
        assert_eq!(format_bytes(1_294_468), "1.23 MB");
    }

    #[test]
    fn time_omits_zero_components() {
        assert_eq!(format_time(0), "0s");
        assert_eq!(format_time(59), "59s");
        assert_eq!(format_time(65), "1m 5s");
        assert_eq!(format_time(3600), "1h 0m 0s");
        assert_eq!(format_time(3661), "1h 1m 1s");
    }

    #[test]
    fn sanitize_strips_forbidden_characters() {
        assert_eq!(sanitize_filename("a/b:c*d"), "abcd");
        assert_eq!(sanitize_filename("<w>h\"a\\t|?*"), "what");
    }

    #[test]
    fn sanitize_collapses_and_trims_whitespace() {
        assert_eq!(sanitize_filename("  My   Video\t\tTitle  "), "My Video Title");
    }

    #[test]
    fn sanitize_caps_length_at_200() {
        let long = "a".repeat(300);
        assert_eq!(sanitize_filename(&long).chars().count(), 200);
    }

    #[test]
    fn sanitize_may_yield_empty() {
        assert_eq!(sanitize_filename("///***"), "");
    }

    #[test]
    fn status_lines_carry_their_glyph() {
        assert!(format_error("boom").contains("✗ boom"));
        assert!(format_success("done").contains("✓ done"));
        assert!(format_info("note").contains("ℹ note"));
    }
}
