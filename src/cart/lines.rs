//! Cart Lines

use std::fmt;

use rusty_money::{Money, iso::Currency};

/// Opaque identifier for a cart line, unique within a cart.
///
/// Menu items are identified by strings or numbers, both convert into a `LineId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(String);

impl LineId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LineId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for LineId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// An item to be added to the cart, as supplied by the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine<'a> {
    /// Line identifier (usually the menu item id)
    pub id: LineId,

    /// Display name
    pub name: String,

    /// Price of a single unit
    pub unit_price: Money<'a, Currency>,
}

impl<'a> NewCartLine<'a> {
    /// Creates a new cart line input.
    pub fn new(
        id: impl Into<LineId>,
        name: impl Into<String>,
        unit_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
        }
    }
}

/// A line in the cart. Quantity is always at least one.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    id: LineId,
    name: String,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> CartLine<'a> {
    /// Creates a line with quantity one from validated input.
    pub(crate) fn from_new(new: NewCartLine<'a>) -> Self {
        Self {
            id: new.id,
            name: new.name,
            unit_price: new.unit_price,
            quantity: 1,
        }
    }

    /// Returns the line identifier.
    pub fn id(&self) -> &LineId {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Callers guarantee `quantity >= 1`.
    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}
