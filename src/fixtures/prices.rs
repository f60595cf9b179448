//! Price and Percentage Parsing

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::{Currency, EUR, GBP, USD};

use crate::fixtures::FixtureError;

/// Parse a currency code supported by the fixtures.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for codes other than GBP, USD and EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse price string (e.g., "12.99 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", the amount is
/// negative or not a number, or the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, parse_currency(currency_code)?))
}

/// Parse percentage string (e.g., "10%" or "0.10") into a `Percentage` between 0 and 100%
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPercentage`] if the string cannot be parsed or lies
/// outside 0 to 100%.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let (number, scale) = match trimmed.strip_suffix('%') {
        Some(percent) => (percent.trim(), 100.0),
        None => (trimmed, 1.0),
    };

    let value = number
        .parse::<f64>()
        .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?
        / scale;

    if !(0.0..=1.0).contains(&value) {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_reads_minor_units() -> Result<(), FixtureError> {
        assert_eq!(parse_price("12.99 USD")?, (12_99, USD));
        assert_eq!(parse_price("2.5 EUR")?, (2_50, EUR));
        assert_eq!(parse_price("0 GBP")?, (0, GBP));

        Ok(())
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        assert!(matches!(parse_price("12.99USD"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("twelve USD"), Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_negative_amounts() {
        assert!(matches!(parse_price("-1.00 USD"), Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> Result<(), FixtureError> {
        assert_eq!(parse_percentage("10%")?, Percentage::from(0.1));
        assert_eq!(parse_percentage(" 0.1 ")?, Percentage::from(0.1));
        assert_eq!(parse_percentage("100%")?, Percentage::from(1.0));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_out_of_range() {
        assert!(matches!(parse_percentage("150%"), Err(FixtureError::InvalidPercentage(_))));
        assert!(matches!(parse_percentage("-0.1"), Err(FixtureError::InvalidPercentage(_))));
        assert!(matches!(parse_percentage("ten"), Err(FixtureError::InvalidPercentage(_))));
    }
}
