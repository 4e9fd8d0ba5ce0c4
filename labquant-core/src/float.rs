//! Floating point helpers shared by measurement comparison and mixing

/// Absolute tolerance used by `Measurement::equal_to`, in the receiver's unit
pub const ABSOLUTE_TOLERANCE: f64 = f64::EPSILON * 10000.0;

/// Round to `places` decimal digits, half away from zero.
///
/// NaN and infinities pass through unchanged.
pub fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(places.min(i32::MAX as u32) as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        // too large to carry the requested digits; already integral
        return value;
    }
    scaled.round() / scale
}

/// `|a - b| <= tolerance`
pub fn approx_eq_abs(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// `|a - b| <= tolerance * max(|a|, |b|)`; two zeros are equal
pub fn approx_eq_rel(a: f64, b: f64, tolerance: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= tolerance * scale
}

/// Shortest text that parses back to exactly `value`
pub fn format_value(value: f64) -> String {
    format!("{}", value)
}

/// Parse a numeric token, rejecting `inf`/`nan` spellings
pub fn parse_number(token: &str) -> Option<f64> {
    let token = token.trim();
    let first = token.chars().next()?;
    if !(first.is_ascii_digit() || first == '.' || first == '-' || first == '+') {
        return None;
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-1.235, 0), -1.0);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert!(round_to(f64::NAN, 3).is_nan());
        assert_eq!(round_to(1e300, 10), 1e300);
    }

    #[test]
    fn test_round_to_huge_places() {
        assert_eq!(round_to(1.5, u32::MAX), 1.5);
        assert_eq!(round_to(-0.125, u32::MAX), -0.125);
        assert_eq!(round_to(0.0, u32::MAX), 0.0);
        assert_eq!(round_to(1.25, i32::MAX as u32 + 1), 1.25);
    }

    #[test]
    fn test_approx_eq_rel() {
        assert!(approx_eq_rel(1000.0, 1000.5, 0.001));
        assert!(!approx_eq_rel(1.0, 1.1, 0.01));
        assert!(approx_eq_rel(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("5"), Some(5.0));
        assert_eq!(parse_number("-2.5e3"), Some(-2500.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("nan"), None);
        assert_eq!(parse_number("5m"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_format_value_roundtrips() {
        for v in [0.0, -3.25, 1e300, 1.0 / 3.0, 25.0] {
            assert_eq!(format_value(v).parse::<f64>().unwrap(), v);
        }
        assert_eq!(format_value(25.0), "25");
    }
}
