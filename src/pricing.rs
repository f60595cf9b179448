//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::cart::lines::CartLine;

/// Errors that can occur while calculating line and cart totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// A line total does not fit in minor units.
    #[error("line total overflowed for {0}")]
    Overflow(String),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the total for a single line (unit price × quantity).
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the product does not fit in minor units.
pub fn line_total<'a>(line: &CartLine<'a>) -> Result<Money<'a, Currency>, TotalPriceError> {
    let minor = line
        .unit_price()
        .to_minor_units()
        .checked_mul(i64::from(line.quantity()))
        .ok_or_else(|| TotalPriceError::Overflow(line.id().to_string()))?;

    Ok(Money::from_minor(minor, line.unit_price().currency()))
}

/// Calculates the subtotal of a list of lines in the given currency.
///
/// An empty slice totals to zero.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: a line total overflowed.
/// - [`TotalPriceError::Money`]: wrapped money arithmetic or currency mismatch error.
pub fn subtotal<'a>(
    lines: &[CartLine<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, TotalPriceError> {
    lines
        .iter()
        .try_fold(
            Money::from_minor(0, currency),
            |acc, line| -> Result<_, TotalPriceError> { Ok(acc.add(line_total(line)?)?) },
        )
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::cart::lines::NewCartLine;

    use super::*;

    fn line<'a>(id: &str, minor: i64, quantity: u32) -> CartLine<'a> {
        let mut line = CartLine::from_new(NewCartLine::new(id, id, Money::from_minor(minor, USD)));
        line.set_quantity(quantity);
        line
    }

    #[test]
    fn line_total_multiplies_by_quantity() -> TestResult {
        assert_eq!(line_total(&line("m3", 5_99, 2))?, Money::from_minor(11_98, USD));

        Ok(())
    }

    #[test]
    fn line_total_overflow_returns_error() {
        let result = line_total(&line("huge", i64::MAX, 2));

        assert!(matches!(result, Err(TotalPriceError::Overflow(id)) if id == "huge"));
    }

    #[test]
    fn subtotal_sums_line_totals() -> TestResult {
        let lines = [line("m1", 12_99, 1), line("m3", 5_99, 2)];

        assert_eq!(subtotal(&lines, USD)?, Money::from_minor(24_97, USD));

        Ok(())
    }

    #[test]
    fn subtotal_of_nothing_is_zero() -> TestResult {
        assert_eq!(subtotal(&[], GBP)?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn subtotal_currency_mismatch_errors() {
        let lines = [line("m1", 1_00, 1)];

        assert!(matches!(
            subtotal(&lines, GBP),
            Err(TotalPriceError::Money(MoneyError::CurrencyMismatch { .. }))
        ));
    }
}
