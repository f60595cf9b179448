//! Discounts
//!
//! Percentage arithmetic shared by tax and promo-code calculations. Amounts are
//! handled in minor units and rounded half-up to the nearest minor unit.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors specific to percentage calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculate a percentage of an amount given in minor units.
///
/// Midpoints round away from zero, which for the non-negative amounts a cart
/// deals with is half-up rounding.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows or cannot be
/// represented in minor units.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    // decimal_percentage doesn't expose the inner Decimal
    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Calculate a percentage of a money amount, in the amount's currency.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the result cannot be represented.
pub fn percent_of<'a>(
    percent: &Percentage,
    amount: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, DiscountError> {
    let minor = percent_of_minor(percent, amount.to_minor_units())?;

    Ok(Money::from_minor(minor, amount.currency()))
}

/// Converts a fractional percentage (e.g. `0.1`) to percent points (e.g. `10`) for display.
pub fn percent_points(percent: &Percentage) -> Decimal {
    ((*percent) * Decimal::ONE * Decimal::ONE_HUNDRED)
        .round_dp(2)
        .normalize()
}
