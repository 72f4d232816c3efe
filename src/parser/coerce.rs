// Lenient value coercion for tool-generated artifacts. Nothing here fails.

use std::str::FromStr;

/// Marker some tools write for "no value".
const NOT_AVAILABLE: &str = "N/A";

/// Parse a trimmed cell; empty, `N/A` and unparseable cells are None.
pub fn coerce<T: FromStr>(value: &str) -> Option<T> {
    let v = value.trim();
    if v.is_empty() || v == NOT_AVAILABLE {
        return None;
    }
    v.parse().ok()
}

/// Finite float or `default`.
pub fn safe_float(value: &str, default: f64) -> f64 {
    coerce::<f64>(value)
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Non-negative integer or `default`. Integral floats ("12.0") are accepted.
pub fn safe_int(value: &str, default: u64) -> u64 {
    if let Some(v) = coerce::<u64>(value) {
        return v;
    }
    coerce::<f64>(value)
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= u64::MAX as f64)
        .map(|v| v as u64)
        .unwrap_or(default)
}

