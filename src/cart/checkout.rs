//! Checkout

use crate::cart::{lines::CartLine, totals::CartTotals};

/// Immutable copy of a cart at checkout, handed to order creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSnapshot<'a> {
    lines: Vec<CartLine<'a>>,
    totals: CartTotals<'a>,
    promo_code: Option<String>,
}

impl<'a> CheckoutSnapshot<'a> {
    pub(crate) fn new(
        lines: Vec<CartLine<'a>>,
        totals: CartTotals<'a>,
        promo_code: Option<String>,
    ) -> Self {
        Self {
            lines,
            totals,
            promo_code,
        }
    }

    /// Lines in cart order.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Totals at the time of checkout.
    pub fn totals(&self) -> &CartTotals<'a> {
        &self.totals
    }

    /// Promo code applied at checkout, if any.
    pub fn promo_code(&self) -> Option<&str> {
        self.promo_code.as_deref()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }
}
