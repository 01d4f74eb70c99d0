fn group_thousands(int_part: &str) -> String {
    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    with_commas.chars().rev().collect()
}

fn usable(val: Option<f64>) -> Option<f64> {
    val.filter(|v| v.is_finite())
}

/// Format a dollar amount with thousands separators: $1,234.56.
/// Missing or non-finite values render as $0.00.
pub fn format_currency(val: Option<f64>) -> String {
    let Some(val) = usable(val) else {
        return "$0.00".to_string();
    };
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((&cents, "00"));
    let body = format!("${}.{dec_part}", group_thousands(int_part));

    if val < 0.0 && cents != "0.00" {
        format!("-{body}")
    } else {
        body
    }
}

pub fn money(val: f64) -> String {
    format_currency(Some(val))
}

/// Format miles as a rounded, comma-grouped integer: 12,346.
pub fn format_miles(val: Option<f64>) -> String {
    let Some(val) = usable(val) else {
        return "0".to_string();
    };
    // Halves round up, so -2.5 becomes -2.
    let rounded = (val + 0.5).floor();
    let digits = format!("{:.0}", rounded.abs());
    if rounded < 0.0 {
        format!("-{}", group_thousands(&digits))
    } else {
        group_thousands(&digits)
    }
}

pub fn miles(val: f64) -> String {
    format_miles(Some(val))
}

pub fn percent(val: f64) -> String {
    if val.is_finite() {
        format!("{val:.1}%")
    } else {
        "0.0%".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_formatting() {
        assert_eq!(money(1234.56), "$1,234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1000000.99), "$1,000,000.99");
        assert_eq!(money(42.10), "$42.10");
        assert_eq!(money(0.555), "$0.56");
    }

    #[test]
    fn test_currency_missing_values() {
        assert_eq!(format_currency(None), "$0.00");
        assert_eq!(format_currency(Some(f64::NAN)), "$0.00");
        assert_eq!(format_currency(Some(f64::INFINITY)), "$0.00");
        assert_eq!(money(-0.001), "$0.00");
    }

    #[test]
    fn test_miles_formatting() {
        assert_eq!(miles(12345.6), "12,346");
        assert_eq!(miles(999.4), "999");
        assert_eq!(miles(0.0), "0");
        assert_eq!(miles(2.5), "3");
        assert_eq!(miles(-2.5), "-2");
        assert_eq!(miles(-1234.7), "-1,235");
        assert_eq!(miles(-0.2), "0");
        assert_eq!(format_miles(None), "0");
        assert_eq!(format_miles(Some(f64::NAN)), "0");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(12.345), "12.3%");
        assert_eq!(percent(f64::NAN), "0.0%");
    }
}
