//! Cart
//!
//! [`CartLedger`] owns the cart lines, quantity changes, promo code application and the
//! derived totals. One ledger is created at the composition root and handed by reference
//! to everything that reads or mutates the cart.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::{
        checkout::CheckoutSnapshot,
        lines::{CartLine, LineId, NewCartLine},
        totals::CartTotals,
    },
    config::StorefrontConfig,
    discounts::{DiscountError, percent_of, percent_points},
    pricing::{TotalPriceError, subtotal},
    promotions::{AppliedPromo, DiscountPolicy, PromoCodeTable, PromoOutcome},
};

pub mod checkout;
pub mod lines;
pub mod totals;

/// Errors related to cart mutation, totals and checkout.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The item could not be added to the cart.
    #[error("invalid cart line {id:?}: {reason}")]
    InvalidInput {
        /// Identifier of the rejected item
        id: LineId,

        /// Why the item was rejected
        reason: &'static str,
    },

    /// A quantity below one (or too large to store) was requested.
    #[error("invalid quantity {0}; quantities must be at least 1")]
    InvalidQuantity(i64),

    /// No line with this identifier is in the cart.
    #[error("line {0} not found in cart")]
    NotFound(LineId),

    /// Checkout was attempted with no lines in the cart.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// Errors bubbled up from line and subtotal calculation.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Errors bubbled up from tax and discount calculation.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Cart line items, promo code and derived totals.
#[derive(Debug, Clone)]
pub struct CartLedger<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
    tax_rate: Percentage,
    promo_codes: PromoCodeTable,
    discount_policy: DiscountPolicy,
    applied: Option<AppliedPromo<'a>>,
}

impl<'a> CartLedger<'a> {
    /// Create an empty cart with a 10% tax rate and the default promo codes.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
            tax_rate: Percentage::from(0.1),
            promo_codes: PromoCodeTable::default(),
            discount_policy: DiscountPolicy::default(),
            applied: None,
        }
    }

    /// Create an empty cart using the currency, tax rate, promo codes and discount policy
    /// from the storefront configuration.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::new(config.currency)
            .with_tax_rate(config.tax_rate)
            .with_promo_codes(config.promo_codes.clone())
            .with_discount_policy(config.discount_policy)
    }

    /// Replace the tax rate.
    #[must_use]
    pub fn with_tax_rate(mut self, tax_rate: Percentage) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Replace the promo code table.
    #[must_use]
    pub fn with_promo_codes(mut self, promo_codes: PromoCodeTable) -> Self {
        self.promo_codes = promo_codes;
        self
    }

    /// Replace the discount policy.
    #[must_use]
    pub fn with_discount_policy(mut self, discount_policy: DiscountPolicy) -> Self {
        self.discount_policy = discount_policy;
        self
    }

    /// Add one unit of an item.
    ///
    /// Increments the quantity of the line with the same id, or appends a new line with
    /// quantity one. Returns the resulting quantity.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidInput`]: the id or name is empty, the price is negative, or the
    ///   price is in a different currency from the cart.
    /// - [`CartError::InvalidQuantity`]: the line quantity would overflow.
    pub fn add_or_increment(&mut self, item: NewCartLine<'a>) -> Result<u32, CartError> {
        self.validate(&item)?;

        if let Some(line) = self.lines.iter_mut().find(|line| line.id() == &item.id) {
            let quantity = line
                .quantity()
                .checked_add(1)
                .ok_or(CartError::InvalidQuantity(i64::from(u32::MAX)))?;

            line.set_quantity(quantity);

            debug!(line = %item.id, quantity, "incremented cart line");

            return Ok(quantity);
        }

        debug!(line = %item.id, price = %item.unit_price, "added cart line");

        self.lines.push(CartLine::from_new(item));

        Ok(1)
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity below one is rejected rather than treated as a removal; callers decide
    /// whether to prompt for [`CartLedger::remove`].
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is below one or does not fit in a `u32`.
    /// - [`CartError::NotFound`]: no line with `id` exists.
    pub fn set_quantity(&mut self, id: &LineId, quantity: i64) -> Result<(), CartError> {
        let valid = u32::try_from(quantity)
            .ok()
            .filter(|quantity| *quantity >= 1)
            .ok_or(CartError::InvalidQuantity(quantity))?;

        let line = self
            .lines
            .iter_mut()
            .find(|line| line.id() == id)
            .ok_or_else(|| CartError::NotFound(id.clone()))?;

        line.set_quantity(valid);

        debug!(line = %id, quantity = valid, "set cart line quantity");

        Ok(())
    }

    /// Remove a line. Removing an absent line is a no-op.
    ///
    /// Returns the removed line, if there was one.
    pub fn remove(&mut self, id: &LineId) -> Option<CartLine<'a>> {
        let index = self.lines.iter().position(|line| line.id() == id)?;
        let removed = self.lines.remove(index);

        debug!(line = %id, "removed cart line");

        Some(removed)
    }

    /// Remove every line and any applied promo code.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.applied = None;
    }

    /// Apply a promo code, replacing any code applied before.
    ///
    /// Codes are matched ignoring case. An unknown code removes any existing discount
    /// and reports [`PromoOutcome::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the subtotal or discount cannot be calculated.
    pub fn apply_promo_code(&mut self, code: &str) -> Result<PromoOutcome<'a>, CartError> {
        let Some((code, fraction)) = self.promo_codes.lookup(code) else {
            self.applied = None;

            info!(code = %code, "rejected promo code");

            return Ok(PromoOutcome::Rejected);
        };

        let subtotal = self.subtotal()?;
        let discount = percent_of(&fraction, &subtotal)?;

        info!(
            code = %code,
            percent = %percent_points(&fraction),
            %discount,
            "applied promo code"
        );

        self.applied = Some(AppliedPromo {
            code: code.clone(),
            fraction,
            locked_discount: discount,
        });

        Ok(PromoOutcome::Accepted { code, discount })
    }

    /// Remove any applied promo code.
    pub fn clear_promo_code(&mut self) {
        if self.applied.take().is_some() {
            debug!("cleared promo code");
        }
    }

    /// Calculate subtotal, tax, discount and total for the current lines.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if money arithmetic overflows.
    pub fn totals(&self) -> Result<CartTotals<'a>, CartError> {
        let subtotal = self.subtotal()?;
        let tax = percent_of(&self.tax_rate, &subtotal)?;

        let discount = match (&self.applied, self.discount_policy) {
            (None, _) => Money::from_minor(0, self.currency),
            (Some(applied), DiscountPolicy::Locked) => applied.locked_discount,
            (Some(applied), DiscountPolicy::Recompute) => percent_of(&applied.fraction, &subtotal)?,
        };

        Ok(CartTotals::from_parts(subtotal, tax, discount))
    }

    /// Take an immutable snapshot of the lines and totals for order creation.
    ///
    /// The cart is left untouched; clearing it afterwards is up to the caller.
    ///
    /// # Errors
    ///
    /// - [`CartError::EmptyCart`]: there are no lines.
    /// - Any error from [`CartLedger::totals`].
    pub fn checkout(&self) -> Result<CheckoutSnapshot<'a>, CartError> {
        if self.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let totals = self.totals()?;

        info!(lines = self.len(), total = %totals.total, "checked out cart");

        Ok(CheckoutSnapshot::new(
            self.lines.clone(),
            totals,
            self.applied.as_ref().map(|applied| applied.code.clone()),
        ))
    }

    /// Get a line by id.
    pub fn get(&self, id: &LineId) -> Option<&CartLine<'a>> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// The currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The applied promo code, if any.
    pub fn applied_promo(&self) -> Option<&AppliedPromo<'a>> {
        self.applied.as_ref()
    }

    /// The discount policy in use.
    pub fn discount_policy(&self) -> DiscountPolicy {
        self.discount_policy
    }

    fn subtotal(&self) -> Result<Money<'a, Currency>, CartError> {
        Ok(subtotal(&self.lines, self.currency)?)
    }

    fn validate(&self, item: &NewCartLine<'a>) -> Result<(), CartError> {
        let reason = if item.id.as_str().trim().is_empty() {
            Some("id is empty")
        } else if item.name.trim().is_empty() {
            Some("name is empty")
        } else if item.unit_price.is_negative() {
            Some("price is negative")
        } else if item.unit_price.currency() != self.currency {
            Some("price currency does not match cart currency")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CartError::InvalidInput {
                id: item.id.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    fn pizza<'a>() -> NewCartLine<'a> {
        NewCartLine::new("m1", "Margherita Pizza", Money::from_minor(12_99, USD))
    }

    fn bread<'a>() -> NewCartLine<'a> {
        NewCartLine::new("m3", "Garlic Bread", Money::from_minor(5_99, USD))
    }

    fn reference_cart<'a>() -> Result<CartLedger<'a>, CartError> {
        let mut cart = CartLedger::new(USD);

        cart.add_or_increment(pizza())?;
        cart.add_or_increment(bread())?;
        cart.add_or_increment(bread())?;

        Ok(cart)
    }

    #[test]
    fn add_appends_then_increments() -> TestResult {
        let mut cart = CartLedger::new(USD);

        assert_eq!(cart.add_or_increment(pizza())?, 1);
        assert_eq!(cart.add_or_increment(bread())?, 1);
        assert_eq!(cart.add_or_increment(pizza())?, 2);

        let ids: Vec<&str> = cart.lines().iter().map(|line| line.id().as_str()).collect();

        assert_eq!(ids, vec!["m1", "m3"]);
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }

    #[test]
    fn add_rejects_negative_price() {
        let mut cart = CartLedger::new(USD);
        let item = NewCartLine::new("bad", "Refund", Money::from_minor(-1, USD));

        let result = cart.add_or_increment(item);

        assert!(matches!(
            result,
            Err(CartError::InvalidInput { reason: "price is negative", .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_rejects_other_currency_and_empty_fields() {
        let mut cart = CartLedger::new(USD);

        let pounds = NewCartLine::new("m1", "Pizza", Money::from_minor(1_00, GBP));
        let unnamed = NewCartLine::new("m1", " ", Money::from_minor(1_00, USD));
        let anonymous = NewCartLine::new("", "Pizza", Money::from_minor(1_00, USD));

        assert!(matches!(
            cart.add_or_increment(pounds),
            Err(CartError::InvalidInput { .. })
        ));
        assert!(matches!(
            cart.add_or_increment(unnamed),
            Err(CartError::InvalidInput { reason: "name is empty", .. })
        ));
        assert!(matches!(
            cart.add_or_increment(anonymous),
            Err(CartError::InvalidInput { reason: "id is empty", .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn free_items_are_allowed() -> TestResult {
        let mut cart = CartLedger::new(USD);

        cart.add_or_increment(NewCartLine::new("w", "Water", Money::from_minor(0, USD)))?;

        assert_eq!(cart.totals()?.total, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn set_quantity_updates_line() -> TestResult {
        let mut cart = reference_cart()?;
        let id = LineId::from("m1");

        cart.set_quantity(&id, 4)?;

        assert_eq!(cart.get(&id).map(CartLine::quantity), Some(4));

        Ok(())
    }

    #[test]
    fn set_quantity_below_one_is_rejected_without_change() -> TestResult {
        let mut cart = reference_cart()?;
        let before = cart.lines().to_vec();
        let id = LineId::from("m3");

        assert_eq!(cart.set_quantity(&id, 0), Err(CartError::InvalidQuantity(0)));
        assert_eq!(cart.set_quantity(&id, -1), Err(CartError::InvalidQuantity(-1)));
        assert_eq!(cart.lines(), before.as_slice());

        Ok(())
    }

    #[test]
    fn set_quantity_too_large_is_rejected() -> TestResult {
        let mut cart = reference_cart()?;
        let huge = i64::from(u32::MAX) + 1;

        assert_eq!(
            cart.set_quantity(&LineId::from("m1"), huge),
            Err(CartError::InvalidQuantity(huge))
        );

        Ok(())
    }

    #[test]
    fn set_quantity_unknown_line_is_not_found() -> TestResult {
        let mut cart = reference_cart()?;
        let id = LineId::from("m9");

        assert_eq!(cart.set_quantity(&id, 2), Err(CartError::NotFound(id)));

        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> TestResult {
        let mut cart = reference_cart()?;
        let id = LineId::from("m1");

        assert!(cart.remove(&id).is_some());

        let after_first = cart.lines().to_vec();

        assert!(cart.remove(&id).is_none());
        assert_eq!(cart.lines(), after_first.as_slice());
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn reference_totals_with_save10() -> TestResult {
        let mut cart = reference_cart()?;

        let outcome = cart.apply_promo_code("SAVE10")?;
        let totals = cart.totals()?;

        assert_eq!(
            outcome,
            PromoOutcome::Accepted {
                code: "SAVE10".to_string(),
                discount: Money::from_minor(2_50, USD),
            }
        );
        assert_eq!(totals.subtotal, Money::from_minor(24_97, USD));
        assert_eq!(totals.tax, Money::from_minor(2_50, USD));
        assert_eq!(totals.discount, Money::from_minor(2_50, USD));
        assert_eq!(totals.total, Money::from_minor(24_97, USD));

        Ok(())
    }

    #[test]
    fn promo_codes_ignore_case() -> TestResult {
        let mut lower = reference_cart()?;
        let mut upper = reference_cart()?;

        lower.apply_promo_code("save10")?;
        upper.apply_promo_code("SAVE10")?;

        assert_eq!(lower.totals()?.discount, upper.totals()?.discount);

        Ok(())
    }

    #[test]
    fn unknown_promo_code_resets_discount() -> TestResult {
        let mut cart = reference_cart()?;

        cart.apply_promo_code("SAVE10")?;
        let outcome = cart.apply_promo_code("BOGUS")?;

        assert_eq!(outcome, PromoOutcome::Rejected);
        assert_eq!(cart.totals()?.discount, Money::from_minor(0, USD));
        assert!(cart.applied_promo().is_none());

        Ok(())
    }

    #[test]
    fn clearing_promo_code_drops_discount() -> TestResult {
        let mut cart = reference_cart()?;

        cart.apply_promo_code("SAVE10")?;
        assert_eq!(cart.totals()?.discount, Money::from_minor(2_50, USD));

        cart.clear_promo_code();

        assert!(cart.applied_promo().is_none());
        assert_eq!(cart.totals()?.discount, Money::from_minor(0, USD));
        assert_eq!(cart.totals()?.total, Money::from_minor(27_47, USD));

        cart.clear_promo_code();
        assert!(cart.applied_promo().is_none());

        Ok(())
    }

    #[test]
    fn locked_discount_ignores_later_cart_changes() -> TestResult {
        let mut cart = reference_cart()?;

        cart.apply_promo_code("SAVE10")?;
        cart.remove(&LineId::from("m3"));

        let totals = cart.totals()?;

        assert_eq!(totals.subtotal, Money::from_minor(12_99, USD));
        assert_eq!(totals.discount, Money::from_minor(2_50, USD));

        Ok(())
    }

    #[test]
    fn recompute_discount_follows_subtotal() -> TestResult {
        let mut cart = reference_cart()?.with_discount_policy(DiscountPolicy::Recompute);

        cart.apply_promo_code("SAVE10")?;
        cart.remove(&LineId::from("m3"));

        assert_eq!(cart.totals()?.discount, Money::from_minor(1_30, USD));

        Ok(())
    }

    #[test]
    fn locked_discount_can_exceed_remaining_cart_but_total_floors_at_zero() -> TestResult {
        let mut cart = CartLedger::new(USD).with_promo_codes({
            let mut codes = PromoCodeTable::empty();
            codes.insert("HALF", Percentage::from(0.5));
            codes
        });

        cart.add_or_increment(NewCartLine::new("a", "Feast", Money::from_minor(100_00, USD)))?;
        cart.add_or_increment(NewCartLine::new("b", "Drink", Money::from_minor(1_00, USD)))?;
        cart.apply_promo_code("half")?;
        cart.remove(&LineId::from("a"));

        let totals = cart.totals()?;

        assert_eq!(totals.discount, Money::from_minor(50_50, USD));
        assert_eq!(totals.total, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn custom_tax_rate_is_used() -> TestResult {
        let mut cart = CartLedger::new(USD).with_tax_rate(Percentage::from(0.2));

        cart.add_or_increment(pizza())?;

        assert_eq!(cart.totals()?.tax, Money::from_minor(2_60, USD));

        Ok(())
    }

    #[test]
    fn checkout_empty_cart_fails() {
        let cart = CartLedger::new(USD);

        assert_eq!(cart.checkout(), Err(CartError::EmptyCart));
        assert!(cart.is_empty());
    }

    #[test]
    fn checkout_snapshots_without_mutating() -> TestResult {
        let mut cart = reference_cart()?;
        cart.apply_promo_code("save10")?;

        let snapshot = cart.checkout()?;

        assert_eq!(snapshot.lines(), cart.lines());
        assert_eq!(snapshot.totals(), &cart.totals()?);
        assert_eq!(snapshot.promo_code(), Some("SAVE10"));
        assert_eq!(snapshot.item_count(), 3);
        assert_eq!(cart.len(), 2);

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(snapshot.lines().len(), 2);

        Ok(())
    }
}
