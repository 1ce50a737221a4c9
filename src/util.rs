// Utility helpers for parsing and basic statistics.
//
// This module centralizes the "dirty" CSV/number/date handling so the
// aggregation modules can assume clean, typed values.
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Timestamp layouts seen in survey exports, tried in order.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a Likert answer into a rating in `1..=5`.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace and accepts a decimal comma.
/// - Returns `None` for empty, non-numeric, non-finite or out-of-range
///   values; out-of-range answers are treated as missing, never clamped.
/// - Fractional values are rounded to the nearest integer.
pub fn parse_rating(s: Option<&str>) -> Option<u8> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let v = s.replace(',', ".").parse::<f64>().ok()?;
    if !v.is_finite() || !(1.0..=5.0).contains(&v) {
        return None;
    }
    Some(v.round() as u8)
}

/// Parse a response timestamp. Date-only values land at midnight.
pub fn parse_timestamp_safe(s: Option<&str>) -> Option<NaiveDateTime> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Trimmed owned string, empty when the field is missing.
pub fn clean_text(s: Option<&str>) -> String {
    s.map(str::trim).unwrap_or_default().to_string()
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Round to a fixed number of decimal places.
pub fn round_to(n: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (n * factor).round() / factor
}

/// Round half towards positive infinity, so `-0.5` becomes `0` and
/// `2.5` becomes `3`.
pub fn round_half_up(n: f64) -> i64 {
    (n + 0.5).floor() as i64
}

/// `part / whole` as a percentage; 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Used for counts in console messages (e.g., `1,445 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
