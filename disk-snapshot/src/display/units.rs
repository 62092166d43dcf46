//! Human-readable sizes, times and counts.

use chrono::{Local, TimeZone};

const SIZE_UNITS: &[&str] = &["bytes", "KiB", "MiB", "GiB", "TiB"];

/// Format bytes with binary units, e.g. `1.5 KiB`.
///
/// Values are divided while strictly above 1024, so exactly 1024 stays
/// `1024 bytes`. Trailing zeros after the decimal point are dropped.
pub fn format_size_human(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size > 1024.0 && unit_index < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    let number = format!("{:.2}", size);
    let number = number.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", number, SIZE_UNITS[unit_index])
}

/// Format a size raw or human-readable.
pub fn format_size(bytes: u64, human: bool) -> String {
    if human {
        format_size_human(bytes)
    } else {
        bytes.to_string()
    }
}

/// Format epoch seconds as local `%Y-%m-%d %H:%M:%S`.
///
/// Falls back to the raw number when the value is out of chrono's range.
pub fn format_time_human(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| Local.timestamp_opt(s, 0).single())
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// Format a time raw or human-readable.
pub fn format_time(secs: u64, human: bool) -> String {
    if human {
        format_time_human(secs)
    } else {
        secs.to_string()
    }
}

/// Group digits with commas, e.g. `1,234,567`.
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
