//! Display formatting helpers for console output.

/// Format a currency value with thousands separators.
pub fn format_currency(value: f64) -> String {
    let total_cents = (value.abs() * 100.0).round() as i64;
    let dollars = total_cents / 100;
    let cents = total_cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if value < 0.0 {
        format!("-${grouped}.{cents:02}")
    } else {
        format!("${grouped}.{cents:02}")
    }
}

/// Format a decimal fraction as a percentage.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format an optional statistic, showing `n/a` when undefined.
pub fn format_opt(value: Option<f64>, fmt: fn(f64) -> String) -> String {
    value.map_or_else(|| "n/a".to_string(), fmt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(100_000.0), "$100,000.00");
        assert_eq!(format_currency(1_234.5), "$1,234.50");
        assert_eq!(format_currency(-950.25), "-$950.25");
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.1234), "12.34%");
        assert_eq!(format_percent(-0.05), "-5.00%");
    }

    #[test]
    fn test_format_opt() {
        assert_eq!(format_opt(Some(0.5), format_percent), "50.00%");
        assert_eq!(format_opt(None, format_percent), "n/a");
    }
}
