//! Storefront Configuration

use std::time::Duration;

use decimal_percentage::Percentage;
use rusty_money::iso::{self, Currency};

use crate::{
    orders::stages::StageSequence,
    promotions::{DiscountPolicy, PromoCodeTable},
};

/// Default interval between automatic stage advances.
pub const DEFAULT_ADVANCE_INTERVAL: Duration = Duration::from_secs(15);

/// Settings shared by the cart and the order tracker.
///
/// Built with [`Default`] or loaded from `fixtures/storefront/*.yml` through
/// [`Fixture::load_storefront`](crate::fixtures::Fixture::load_storefront).
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Currency every cart line must be priced in
    pub currency: &'static Currency,

    /// Tax applied to the subtotal
    pub tax_rate: Percentage,

    /// Recognised promo codes
    pub promo_codes: PromoCodeTable,

    /// Whether an accepted discount follows later cart changes
    pub discount_policy: DiscountPolicy,

    /// Fulfilment stages
    pub stages: StageSequence,

    /// Interval between automatic stage advances
    pub advance_interval: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            currency: iso::USD,
            tax_rate: Percentage::from(0.1),
            promo_codes: PromoCodeTable::default(),
            discount_policy: DiscountPolicy::default(),
            stages: StageSequence::default(),
            advance_interval: DEFAULT_ADVANCE_INTERVAL,
        }
    }
}
