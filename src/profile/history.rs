//! Order History

use std::collections::VecDeque;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};

use crate::orders::{Order, OrderId};

/// A row in the order history.
#[derive(Debug, Clone, PartialEq)]
pub struct PastOrder<'a> {
    /// Order id
    pub order_id: OrderId,

    /// When the order was placed
    pub placed_at: Timestamp,

    /// Amount charged
    pub total: Money<'a, Currency>,

    /// Status label at the time the history was last updated
    pub status: String,

    /// Item names with quantities
    pub items: Vec<(String, u32)>,
}

/// Past orders, most recent first.
#[derive(Debug, Clone, Default)]
pub struct OrderHistory<'a> {
    orders: VecDeque<PastOrder<'a>>,
}

impl<'a> OrderHistory<'a> {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a placed order at the top of the history.
    pub fn record(&mut self, order: &Order<'a>, status: impl Into<String>) {
        let checkout = order.checkout();

        self.orders.push_front(PastOrder {
            order_id: order.id().clone(),
            placed_at: order.placed_at(),
            total: checkout.totals().total,
            status: status.into(),
            items: checkout
                .lines()
                .iter()
                .map(|line| (line.name().to_string(), line.quantity()))
                .collect(),
        });
    }

    /// Update the status label of a recorded order. Returns `false` if it is not recorded.
    pub fn update_status(&mut self, order_id: &OrderId, status: impl Into<String>) -> bool {
        match self.orders.iter_mut().find(|past| &past.order_id == order_id) {
            Some(past) => {
                past.status = status.into();
                true
            }
            None => false,
        }
    }

    /// Find a recorded order.
    pub fn get(&self, order_id: &OrderId) -> Option<&PastOrder<'a>> {
        self.orders.iter().find(|past| &past.order_id == order_id)
    }

    /// Orders, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &PastOrder<'a>> {
        self.orders.iter()
    }

    /// Number of recorded orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no orders are recorded.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::cart::{CartLedger, lines::NewCartLine};

    use super::*;

    fn place(id: &str, lines: &[(&str, i64)]) -> Result<Order<'static>, Box<dyn std::error::Error>> {
        let mut cart = CartLedger::new(USD);

        for (name, minor) in lines {
            cart.add_or_increment(NewCartLine::new(*name, *name, Money::from_minor(*minor, USD)))?;
        }

        Ok(Order::place(OrderId::new(id)?, cart.checkout()?))
    }

    #[test]
    fn most_recent_order_comes_first() -> TestResult {
        let mut history = OrderHistory::new();

        history.record(&place("ORD-000001", &[("Pepperoni Pizza", 14_99)])?, "Delivered");
        history.record(&place("ORD-000002", &[("Coke", 2_50)])?, "Order Confirmed");

        let ids: Vec<&str> = history.iter().map(|past| past.order_id.as_str()).collect();

        assert_eq!(ids, ["ORD-000002", "ORD-000001"]);

        Ok(())
    }

    #[test]
    fn records_items_total_and_status() -> TestResult {
        let mut history = OrderHistory::new();
        let order = place("ORD-000003", &[("Coke", 2_50), ("Coke", 2_50)])?;

        history.record(&order, "Order Confirmed");

        let past = history.get(order.id()).ok_or("order not recorded")?;

        assert_eq!(past.items, [("Coke".to_string(), 2)]);
        assert_eq!(past.total, Money::from_minor(5_50, USD));
        assert_eq!(past.status, "Order Confirmed");

        assert!(history.update_status(order.id(), "Delivered"));
        assert_eq!(
            history.get(order.id()).map(|past| past.status.as_str()),
            Some("Delivered")
        );
        assert!(!history.update_status(&OrderId::new("ORD-999999")?, "Delivered"));

        Ok(())
    }
}
