//! Takeaway
//!
//! Takeaway is the storefront engine behind a food-ordering app: a priced cart with promo
//! codes, a restaurant catalog, customer profiles and per-order fulfilment tracking with
//! pluggable persistence.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod discounts;
pub mod fixtures;
pub mod observability;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod profile;
pub mod promotions;
pub mod receipt;
pub mod utils;
