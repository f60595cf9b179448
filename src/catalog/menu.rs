//! Menus

use rusty_money::{Money, iso::Currency};

use crate::cart::lines::NewCartLine;

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem<'a> {
    /// Menu item id, unique within the menu
    pub id: String,

    /// Dish name
    pub name: String,

    /// Short description
    pub description: String,

    /// Unit price
    pub price: Money<'a, Currency>,

    /// Menu section, e.g. "Pizzas"
    pub category: String,
}

impl<'a> MenuItem<'a> {
    /// Cart input for one of this item.
    pub fn to_cart_line(&self) -> NewCartLine<'a> {
        NewCartLine::new(self.id.as_str(), self.name.as_str(), self.price)
    }
}

/// A restaurant's menu, in listing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Menu<'a> {
    items: Vec<MenuItem<'a>>,
}

impl<'a> Menu<'a> {
    /// Create a menu from its items.
    pub fn new(items: Vec<MenuItem<'a>>) -> Self {
        Self { items }
    }

    /// Find an item by id.
    pub fn get(&self, id: &str) -> Option<&MenuItem<'a>> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &MenuItem<'a>> {
        self.items.iter()
    }

    /// Items grouped by category. Categories appear in the order they are first listed.
    pub fn by_category(&self) -> Vec<(&str, Vec<&MenuItem<'a>>)> {
        let mut sections: Vec<(&str, Vec<&MenuItem<'a>>)> = Vec::new();

        for item in &self.items {
            match sections
                .iter_mut()
                .find(|(category, _)| *category == item.category)
            {
                Some((_, items)) => items.push(item),
                None => sections.push((item.category.as_str(), vec![item])),
            }
        }

        sections
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the menu has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
