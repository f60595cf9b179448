//! Restaurant Fixtures

use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    catalog::{
        Restaurant,
        menu::{Menu, MenuItem},
    },
    fixtures::{FixtureError, prices::parse_price},
};

/// Wrapper for restaurants in YAML, in listing order
#[derive(Debug, Deserialize)]
pub struct RestaurantsFixture {
    /// Restaurants
    pub restaurants: Vec<RestaurantFixture>,
}

/// Restaurant Fixture
#[derive(Debug, Deserialize)]
pub struct RestaurantFixture {
    /// Restaurant id
    pub id: String,

    /// Restaurant name
    pub name: String,

    /// Cuisines served
    #[serde(default)]
    pub cuisines: Vec<String>,

    /// Rating from 0 to 5 (e.g., 4.5)
    pub rating: f64,

    /// Delivery time label (e.g., "25-35 min")
    pub delivery_time: String,

    /// Menu items in listing order
    #[serde(default)]
    pub menu: Vec<MenuItemFixture>,
}

/// Menu Item Fixture
#[derive(Debug, Deserialize)]
pub struct MenuItemFixture {
    /// Item id
    pub id: String,

    /// Item name
    pub name: String,

    /// Item description
    #[serde(default)]
    pub description: String,

    /// Item price (e.g., "12.99 USD")
    pub price: String,

    /// Menu category
    pub category: String,
}

impl RestaurantFixture {
    /// Convert into a restaurant whose prices must all be in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed or is in another currency, or the rating
    /// is not a finite number.
    pub fn into_restaurant<'a>(
        self,
        currency: &'a Currency,
    ) -> Result<Restaurant<'a>, FixtureError> {
        let rating = Decimal::from_f64(self.rating)
            .map(|rating| rating.round_dp(1))
            .ok_or_else(|| FixtureError::InvalidRating(self.id.clone()))?;

        let items = self
            .menu
            .into_iter()
            .map(|item| item.into_menu_item(currency))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Restaurant {
            id: self.id,
            name: self.name,
            cuisines: self.cuisines,
            rating,
            delivery_time: self.delivery_time,
            menu: Menu::new(items),
        })
    }
}

impl MenuItemFixture {
    fn into_menu_item(self, currency: &Currency) -> Result<MenuItem<'_>, FixtureError> {
        let (minor_units, price_currency) = parse_price(&self.price)?;

        if price_currency != currency {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                price_currency.iso_alpha_code.to_string(),
            ));
        }

        Ok(MenuItem {
            id: self.id,
            name: self.name,
            description: self.description,
            price: Money::from_minor(minor_units, currency),
            category: self.category,
        })
    }
}
