//! Promotions
//!
//! Promo codes map a case-insensitive code to a fraction of the cart subtotal.
//! The table is configuration: extending it does not require a code change.

use decimal_percentage::Percentage;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

/// When the discount for an applied promo code is calculated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DiscountPolicy {
    /// Calculate the discount once, from the subtotal at the moment the code is applied.
    ///
    /// Later cart changes do not alter the discount.
    #[default]
    Locked,

    /// Remember the fraction and recalculate the discount from the current subtotal.
    Recompute,
}

/// Static mapping of normalised promo code to discount fraction.
#[derive(Debug, Clone)]
pub struct PromoCodeTable {
    codes: FxHashMap<String, Percentage>,
}

impl PromoCodeTable {
    /// Create an empty table. No code will be accepted.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            codes: FxHashMap::default(),
        }
    }

    /// Add (or replace) a code.
    pub fn insert(&mut self, code: &str, fraction: Percentage) -> &mut Self {
        self.codes.insert(normalise_code(code), fraction);
        self
    }

    /// Look up a code, ignoring case and surrounding whitespace.
    ///
    /// Returns the normalised code and its discount fraction.
    pub fn lookup(&self, code: &str) -> Option<(String, Percentage)> {
        let code = normalise_code(code);

        self.codes
            .get(&code)
            .copied()
            .map(|fraction| (code, fraction))
    }

    /// Number of codes in the table.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Check if the table has no codes.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for PromoCodeTable {
    /// `SAVE10` for 10% off.
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("SAVE10", Percentage::from(0.1));
        table
    }
}

/// A promo code currently applied to a cart.
#[derive(Debug, Clone)]
pub struct AppliedPromo<'a> {
    /// Normalised code
    pub code: String,

    /// Fraction of the subtotal taken off
    pub fraction: Percentage,

    /// Discount calculated when the code was applied
    pub locked_discount: Money<'a, Currency>,
}

/// Result of applying a promo code.
#[derive(Debug, Clone, PartialEq)]
pub enum PromoOutcome<'a> {
    /// The code was recognised.
    Accepted {
        /// Normalised code
        code: String,

        /// Discount at the time of application
        discount: Money<'a, Currency>,
    },

    /// The code was not recognised; any previous discount has been removed.
    Rejected,
}

impl PromoOutcome<'_> {
    /// Whether the code was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

fn normalise_code(code: &str) -> String {
    code.trim().to_uppercase()
}
