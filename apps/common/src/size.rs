//! Human readable file sizes.

const KILOBYTE: f64 = 1024.0;

/// Kilobytes below 1024 kB (rounded, `500 kB`), megabytes with two decimals above (`2.00 MB`).
pub fn format_size(bytes: u64) -> String {
    let kilobytes = bytes as f64 / KILOBYTE;
    if kilobytes < KILOBYTE {
        format!("{} kB", kilobytes.round() as u64)
    } else {
        format!("{:.2} MB", kilobytes / KILOBYTE)
    }
}

/// Byte length rounded to whole kilobytes.
pub fn size_kb(bytes: u64) -> u64 {
    (bytes as f64 / KILOBYTE).round() as u64
}
