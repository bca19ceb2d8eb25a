//! Number rounding, formatting and parsing utilities
//!
//! Every numeric word written to G-code goes through [`format_rounded`]:
//! the value is rounded half away from zero to a fixed number of decimals
//! and then printed in its shortest form, so `0.20` becomes `0.2` and
//! `6000.0` becomes `6000`.

/// Seconds per minute, for feed rate conversion.
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Round `value` to `decimals` decimal places, halves away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let ratio = 10f64.powi(decimals as i32);
    (value * ratio).round() / ratio
}

/// Round `value` and render it in shortest decimal form.
///
/// Negative zero is printed as `0`.
pub fn format_rounded(value: f64, decimals: u32) -> String {
    let rounded = round_to(value, decimals);
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// Render `value` with exactly `decimals` digits after the point.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Convert a feed rate from mm/s (how speeds are stored) to mm/min (how G-code wants them).
pub fn mm_per_sec_to_mm_per_min(value: f64) -> f64 {
    value * SECONDS_PER_MINUTE
}

/// Convert a feed rate from mm/min back to mm/s.
pub fn mm_per_min_to_mm_per_sec(value: f64) -> f64 {
    value / SECONDS_PER_MINUTE
}

/// Parse a decimal number, accepting `,` as well as `.` as the separator.
///
/// * `input` - Text to parse, surrounding whitespace is ignored
pub fn parse_decimal(input: &str) -> Result<f64, String> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err("Empty number".to_string());
    }
    normalized.parse::<f64>().map_err(|e| e.to_string())
}

/// Parse a number and round it to the nearest integer.
pub fn parse_integer(input: &str) -> Result<i64, String> {
    let value = parse_decimal(input)?;
    Ok(round_to(value, 0) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.235, 0), 1.0);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(0.00004, 4), 0.0);
    }

    #[test]
    fn test_format_rounded_is_shortest() {
        assert_eq!(format_rounded(0.2, 2), "0.2");
        assert_eq!(format_rounded(0.2000001, 2), "0.2");
        assert_eq!(format_rounded(12.5, 2), "12.5");
        assert_eq!(format_rounded(6000.0, 0), "6000");
        assert_eq!(format_rounded(1.23456, 4), "1.2346");
        assert_eq!(format_rounded(-6.0, 2), "-6");
    }

    #[test]
    fn test_format_rounded_negative_zero() {
        assert_eq!(format_rounded(-0.001, 2), "0");
        assert_eq!(format_rounded(-0.0, 0), "0");
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(250.0, 6), "250.000000");
        assert_eq!(format_fixed(1.005, 2), "1.00");
        assert_eq!(format_fixed(25.0, 2), "25.00");
    }

    #[test]
    fn test_feed_rate_conversion() {
        assert_eq!(mm_per_sec_to_mm_per_min(45.0), 2700.0);
        assert_eq!(mm_per_min_to_mm_per_sec(300.0), 5.0);
    }

    #[test]
    fn test_parse_decimal_separators() {
        assert_eq!(parse_decimal("0.4").unwrap(), 0.4);
        assert_eq!(parse_decimal("0,4").unwrap(), 0.4);
        assert_eq!(parse_decimal("  -1,5 ").unwrap(), -1.5);
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("").is_err());
    }

    #[test]
    fn test_parse_integer_rounds() {
        assert_eq!(parse_integer("214.6").unwrap(), 215);
        assert_eq!(parse_integer("60").unwrap(), 60);
        assert_eq!(parse_integer("59,4").unwrap(), 59);
    }

    proptest! {
        #[test]
        fn prop_format_rounded_reads_back_as_rounded_value(
            value in -10_000.0f64..10_000.0,
            decimals in 0u32..=4,
        ) {
            let text = format_rounded(value, decimals);
            prop_assert_ne!(text.as_str(), "-0");
            prop_assert_eq!(parse_decimal(&text).unwrap(), round_to(value, decimals));

            let fraction_digits = text.split('.').nth(1).map_or(0, str::len);
            prop_assert!(fraction_digits <= decimals as usize);
        }

        #[test]
        fn prop_comma_and_point_parse_alike(value in -10_000.0f64..10_000.0) {
            let text = format!("{}", value);
            prop_assert_eq!(
                parse_decimal(&text.replace('.', ",")).unwrap(),
                parse_decimal(&text).unwrap()
            );
        }
    }
}
