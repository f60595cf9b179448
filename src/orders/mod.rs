//! Orders
//!
//! An [`Order`] is created from a cart checkout snapshot. Its fulfilment is tracked by an
//! [`OrderStatusTracker`](tracker::OrderStatusTracker), shared per order id through the
//! [`TrackerRegistry`](registry::TrackerRegistry) and advanced by a
//! [`ProgressionDriver`](driver::ProgressionDriver).

use std::fmt;

use jiff::Timestamp;
use thiserror::Error;
use tracing::info;

use crate::{cart::checkout::CheckoutSnapshot, profile::addresses::Address};

pub mod driver;
pub mod registry;
pub mod stages;
pub mod store;
pub mod tracker;

/// Errors creating orders.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// Order ids must not be blank.
    #[error("order id is empty")]
    EmptyId,
}

/// Order identifier, used as the key in the stage store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap an existing identifier.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyId`] if `id` is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, OrderError> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(OrderError::EmptyId);
        }

        Ok(Self(id))
    }

    /// Generate an id of the form `ORD-123456` from the current time.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_timestamp(Timestamp::now())
    }

    /// Generate an id from the last six digits of the timestamp's milliseconds.
    #[must_use]
    pub fn from_timestamp(timestamp: Timestamp) -> Self {
        let digits = timestamp.as_millisecond().rem_euclid(1_000_000);

        Self(format!("ORD-{digits:06}"))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order<'a> {
    id: OrderId,
    checkout: CheckoutSnapshot<'a>,
    placed_at: Timestamp,
    delivery_address: Option<Address>,

    /// Free-form window such as `25-35 min`, taken from the restaurant
    estimated_delivery: Option<String>,
}

impl<'a> Order<'a> {
    /// Place an order for a checked-out cart, now.
    pub fn place(id: OrderId, checkout: CheckoutSnapshot<'a>) -> Self {
        Self::place_at(id, checkout, Timestamp::now())
    }

    /// Place an order at a given time.
    pub fn place_at(id: OrderId, checkout: CheckoutSnapshot<'a>, placed_at: Timestamp) -> Self {
        info!(order = %id, total = %checkout.totals().total, "placed order");

        Self {
            id,
            checkout,
            placed_at,
            delivery_address: None,
            estimated_delivery: None,
        }
    }

    /// Deliver to a saved address, typically the address book's default.
    #[must_use]
    pub fn deliver_to(mut self, address: &Address) -> Self {
        self.delivery_address = Some(address.clone());
        self
    }

    /// Attach the estimated delivery window.
    #[must_use]
    pub fn with_estimated_delivery(mut self, estimate: impl Into<String>) -> Self {
        self.estimated_delivery = Some(estimate.into());
        self
    }

    /// Order id.
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Lines, totals and promo code at checkout.
    pub fn checkout(&self) -> &CheckoutSnapshot<'a> {
        &self.checkout
    }

    /// When the order was placed.
    pub fn placed_at(&self) -> Timestamp {
        self.placed_at
    }

    /// Where the order is delivered, if an address was given.
    pub fn delivery_address(&self) -> Option<&Address> {
        self.delivery_address.as_ref()
    }

    /// Estimated delivery window, if known.
    pub fn estimated_delivery(&self) -> Option<&str> {
        self.estimated_delivery.as_deref()
    }
}
