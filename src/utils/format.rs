/// Format a monetary amount without a trailing ".0" for whole values
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        let formatted = format!("{:.2}", amount);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Format an amount with the shekel sign used on the menu
pub fn format_currency(amount: f64) -> String {
    format!("{}\u{20aa}", format_amount(amount))
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(8.0), "8");
        assert_eq!(format_amount(12.5), "12.5");
        assert_eq!(format_amount(12.25), "12.25");
        assert_eq!(format_amount(0.0), "0");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(25.0), "25₪");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }
}
