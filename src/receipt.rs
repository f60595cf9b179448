//! Receipt

use std::io;

use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::checkout::CheckoutSnapshot,
    orders::Order,
    pricing::{TotalPriceError, line_total},
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating a line total.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// IO error writing the receipt.
    #[error("failed to write receipt")]
    IO,
}

/// Printable summary of a checkout.
#[derive(Debug, Clone)]
pub struct Receipt<'r, 'a> {
    order: Option<&'r Order<'a>>,
    checkout: &'r CheckoutSnapshot<'a>,
}

impl<'r, 'a> Receipt<'r, 'a> {
    /// Receipt for a checkout that has not been placed yet.
    pub fn new(checkout: &'r CheckoutSnapshot<'a>) -> Self {
        Self {
            order: None,
            checkout,
        }
    }

    /// Receipt for a placed order, headed with its id and delivery details.
    pub fn for_order(order: &'r Order<'a>) -> Self {
        Self {
            order: Some(order),
            checkout: order.checkout(),
        }
    }

    /// Writes the line table followed by the totals summary.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a line total overflows or the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if let Some(order) = self.order {
            writeln!(out, "\nOrder {}", order.id()).map_err(|_err| ReceiptError::IO)?;

            if let Some(address) = order.delivery_address() {
                writeln!(out, "Deliver to: {address}").map_err(|_err| ReceiptError::IO)?;
            }

            if let Some(estimate) = order.estimated_delivery() {
                writeln!(out, "Estimated delivery: {estimate}")
                    .map_err(|_err| ReceiptError::IO)?;
            }
        }

        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Qty", "Unit Price", "Line Total"]);

        for (index, line) in self.checkout.lines().iter().enumerate() {
            builder.push_record([
                format!("#{}", index + 1),
                line.name().to_string(),
                line.quantity().to_string(),
                line.unit_price().to_string(),
                line_total(line)?.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let totals = self.checkout.totals();
        let discount_label = match self.checkout.promo_code() {
            Some(code) => format!("Discount ({code}):"),
            None => "Discount:".to_string(),
        };

        let rows: SmallVec<[(String, String); 4]> = smallvec![
            ("Subtotal:".to_string(), totals.subtotal.to_string()),
            ("Tax:".to_string(), totals.tax.to_string()),
            (discount_label, format!("-{}", totals.discount)),
            ("Total:".to_string(), totals.total.to_string()),
        ];

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in &rows {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")
                .map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        cart::{CartLedger, lines::NewCartLine},
        orders::OrderId,
        profile::addresses::{AddressBook, NewAddress},
    };

    use super::*;

    fn reference_checkout() -> Result<CheckoutSnapshot<'static>, crate::cart::CartError> {
        let mut cart = CartLedger::new(USD);

        cart.add_or_increment(NewCartLine::new(
            "m1",
            "Margherita Pizza",
            Money::from_minor(12_99, USD),
        ))?;
        cart.add_or_increment(NewCartLine::new("m3", "Garlic Bread", Money::from_minor(5_99, USD)))?;
        cart.add_or_increment(NewCartLine::new("m3", "Garlic Bread", Money::from_minor(5_99, USD)))?;
        cart.apply_promo_code("save10")?;

        cart.checkout()
    }

    #[test]
    fn lists_lines_and_summary() -> TestResult {
        let checkout = reference_checkout()?;
        let mut out = Vec::new();

        Receipt::new(&checkout).write_to(&mut out)?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("Margherita Pizza"));
        assert!(text.contains("Garlic Bread"));
        assert!(text.contains("$11.98"));
        assert!(text.contains("Subtotal:"));
        assert!(text.contains("$24.97"));
        assert!(text.contains("Discount (SAVE10):"));
        assert!(text.contains("-$2.50"));
        assert!(!text.contains("Order ORD-"));

        Ok(())
    }

    #[test]
    fn order_receipt_is_headed_with_order_id() -> TestResult {
        let order = Order::place(OrderId::new("ORD-123456")?, reference_checkout()?);
        let mut out = Vec::new();

        Receipt::for_order(&order).write_to(&mut out)?;

        assert!(String::from_utf8(out)?.contains("Order ORD-123456"));

        Ok(())
    }

    #[test]
    fn order_receipt_shows_delivery_details() -> TestResult {
        let mut book = AddressBook::new();

        book.add(NewAddress {
            street: "123 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62701".to_string(),
            is_default: true,
        })?;

        let address = book.default_address().ok_or("no default address")?;
        let order = Order::place(OrderId::new("ORD-654321")?, reference_checkout()?)
            .deliver_to(address)
            .with_estimated_delivery("25-35 min");
        let mut out = Vec::new();

        Receipt::for_order(&order).write_to(&mut out)?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("Deliver to: 123 Main St, Springfield, IL 62701"));
        assert!(text.contains("Estimated delivery: 25-35 min"));

        Ok(())
    }
}
