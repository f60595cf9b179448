//! Cart Totals

use rusty_money::{Money, iso::Currency};

/// Derived totals for a cart, in minor units of the cart currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals<'a> {
    /// Sum of unit price × quantity over all lines
    pub subtotal: Money<'a, Currency>,

    /// Tax on the subtotal
    pub tax: Money<'a, Currency>,

    /// Promo code discount
    pub discount: Money<'a, Currency>,

    /// `subtotal + tax - discount`, never below zero
    pub total: Money<'a, Currency>,
}

impl<'a> CartTotals<'a> {
    /// Assemble totals from their parts, flooring the total at zero.
    pub fn from_parts(
        subtotal: Money<'a, Currency>,
        tax: Money<'a, Currency>,
        discount: Money<'a, Currency>,
    ) -> Self {
        let total_minor = subtotal
            .to_minor_units()
            .saturating_add(tax.to_minor_units())
            .saturating_sub(discount.to_minor_units())
            .max(0);

        Self {
            subtotal,
            tax,
            discount,
            total: Money::from_minor(total_minor, subtotal.currency()),
        }
    }

    /// Totals for an empty cart.
    pub fn zero(currency: &'a Currency) -> Self {
        let zero = Money::from_minor(0, currency);

        Self::from_parts(zero, zero, zero)
    }
}
