//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Escape text for safe inclusion in HTML element content and attribute values
pub fn escape_html(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Format a decimal with exactly `decimal_places` digits, rounding half away from zero
pub fn format_fixed(value: Decimal, decimal_places: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", decimal_places as usize, rounded)
}

/// Fixed-point formatting for amounts too large for a `Decimal`
pub fn format_fixed_f64(value: f64, decimal_places: u32) -> String {
    format!("{:.*}", decimal_places as usize, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("i-1"), "i-1");
        assert_eq!(
            escape_html("<script>alert('x')</script> & \"q\""),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt; &amp; &quot;q&quot;"
        );
    }

    #[test]
    fn test_format_fixed_rounds_half_up() {
        let value = Decimal::from_str("12.345").unwrap();
        assert_eq!(format_fixed(value, 2), "12.35");
    }

    #[test]
    fn test_format_fixed_pads_zeros() {
        assert_eq!(format_fixed(Decimal::from(7), 2), "7.00");
        assert_eq!(format_fixed(Decimal::from_str("0.5").unwrap(), 2), "0.50");
    }

    #[test]
    fn test_format_fixed_f64() {
        assert_eq!(format_fixed_f64(1e21, 2), "1000000000000000000000.00");
        assert_eq!(format_fixed_f64(-3.0, 1), "-3.0");
    }

    #[test]
    fn test_format_fixed_zero_places() {
        assert_eq!(format_fixed(Decimal::from_str("2.5").unwrap(), 0), "3");
    }
}
