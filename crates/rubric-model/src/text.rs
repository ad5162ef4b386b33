//! Cell-level text coercion shared by the mapper and the validator.

/// Collapses internal whitespace runs to a single space and trims the ends.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses a `points_lost` cell.
///
/// Returns `None` for blank, non-numeric and non-finite (`NaN`, `inf`) values.
/// Negative values parse successfully; callers decide whether they are allowed.
pub fn parse_points(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
