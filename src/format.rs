// ---------------------------------------------------------------------------
// Metric formatting for the key-metric cards
// ---------------------------------------------------------------------------

/// Shown instead of a number when a metric is undefined.
pub const NOT_AVAILABLE: &str = "N/A";

/// `1234567` → `"1,234,567"`.
pub fn format_count(n: usize) -> String {
    group_thousands(&n.to_string())
}

/// `Some(1234.5)` → `"$1,234.50"`, `None` → `"N/A"`.
pub fn format_currency(amount: Option<f64>) -> String {
    let Some(amount) = amount.filter(|a| a.is_finite()) else {
        return NOT_AVAILABLE.to_string();
    };
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn currency_rounds_to_cents() {
        assert_eq!(format_currency(Some(0.0)), "$0.00");
        assert_eq!(format_currency(Some(15.0)), "$15.00");
        assert_eq!(format_currency(Some(1234.567)), "$1,234.57");
        assert_eq!(format_currency(Some(1_000_000.1)), "$1,000,000.10");
        assert_eq!(format_currency(Some(-42.5)), "-$42.50");
    }

    #[test]
    fn undefined_currency_is_not_available() {
        assert_eq!(format_currency(None), "N/A");
        assert_eq!(format_currency(Some(f64::NAN)), "N/A");
    }
}
