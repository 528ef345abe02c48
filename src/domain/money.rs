use thiserror::Error;

/// Money is represented as integer cents to avoid floating-point precision
/// issues. 2500 cents = "25.00".
pub type Cents = i64;

/// Format cents as a plain decimal string.
/// Example: 2500 -> "25.00", -75 -> "-0.75"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, cents.abs() / 100, cents.abs() % 100)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("invalid money format")]
    InvalidFormat,
}

/// Parse a decimal string into cents.
/// Example: "25.00" -> 2500, "25.5" -> 2550, "25" -> 2500.
/// More than two decimal digits are truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    if !digits.is_ascii() {
        return Err(ParseCentsError::InvalidFormat);
    }

    let (units_str, decimals_str) = match digits.split_once('.') {
        Some((u, d)) => (u, d),
        None => (digits, ""),
    };

    if units_str.is_empty() && decimals_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::InvalidFormat)?
    };

    let decimals = &decimals_str[..decimals_str.len().min(2)];
    let mut fraction: i64 = if decimals.is_empty() {
        0
    } else {
        decimals.parse().map_err(|_| ParseCentsError::InvalidFormat)?
    };
    if decimals.len() == 1 {
        fraction *= 10;
    }

    let cents = units * 100 + fraction;
    Ok(if negative { -cents } else { cents })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(2500), "25.00");
        assert_eq!(format_cents(105), "1.05");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-75), "-0.75");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("25.00"), Ok(2500));
        assert_eq!(parse_cents("25"), Ok(2500));
        assert_eq!(parse_cents("25.5"), Ok(2550));
        assert_eq!(parse_cents(".50"), Ok(50));
        assert_eq!(parse_cents("-3.25"), Ok(-325));
        assert_eq!(parse_cents("10.999"), Ok(1099)); // truncates
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert!(parse_cents("abc").is_err());
        assert!(parse_cents("1.2.3").is_err());
        assert!(parse_cents("").is_err());
    }
}
