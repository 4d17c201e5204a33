//! Human-readable file sizes.
//!
//! Sizes are persisted as display strings. They are parsed back into bytes
//! only to order listings; the parsed value is never stored.

const KB: f64 = 1024.0;
const MB: f64 = 1024.0 * 1024.0;

/// Render a byte count as `"N B"`, `"x.y KB"` or `"x.y MB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let kb = bytes as f64 / KB;
    if kb < 1024.0 {
        return format!("{kb:.1} KB");
    }
    format!("{:.1} MB", bytes as f64 / MB)
}

/// Parse a string produced by [`format_file_size`] back into bytes.
///
/// Unrecognised input yields `0.0`.
pub fn parse_file_size(size: &str) -> f64 {
    let size = size.trim();
    let (number, scale) = if let Some(n) = size.strip_suffix("KB") {
        (n, KB)
    } else if let Some(n) = size.strip_suffix("MB") {
        (n, MB)
    } else if let Some(n) = size.strip_suffix('B') {
        (n, 1.0)
    } else {
        return 0.0;
    };
    number.trim().parse::<f64>().map(|n| n * scale).unwrap_or(0.0)
}
