//! Restaurant Catalog
//!
//! The restaurants a customer can browse, with their menus. Searching matches the
//! restaurant name or cuisines, optionally narrowed to one cuisine.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::catalog::menu::Menu;

pub mod menu;

new_key_type! {
    /// Restaurant Key
    pub struct RestaurantKey;
}

/// Highest restaurant rating.
pub const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Errors building a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Restaurant ids must not be blank.
    #[error("restaurant id is empty")]
    EmptyId,

    /// Two restaurants share an id.
    #[error("restaurant {0} is listed more than once")]
    DuplicateRestaurant(String),

    /// Rating outside 0 to 5.
    #[error("rating {rating} for restaurant {id} is outside 0 to 5")]
    InvalidRating {
        /// Restaurant id
        id: String,

        /// Offending rating
        rating: Decimal,
    },
}

/// A restaurant listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant<'a> {
    /// Restaurant id
    pub id: String,

    /// Display name
    pub name: String,

    /// Cuisines served, e.g. `["Italian", "Pizza"]`
    pub cuisines: Vec<String>,

    /// Average rating, 0 to 5
    pub rating: Decimal,

    /// Delivery time label, e.g. "25-35 min"
    pub delivery_time: String,

    /// Menu
    pub menu: Menu<'a>,
}

impl Restaurant<'_> {
    /// Whether any cuisine contains `needle`, which must already be lowercase.
    fn serves(&self, needle: &str) -> bool {
        self.cuisines
            .iter()
            .any(|cuisine| cuisine.to_lowercase().contains(needle))
    }
}

/// Narrows a search to one cuisine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CuisineFilter {
    /// Every restaurant
    #[default]
    All,

    /// Restaurants whose cuisines contain this text, ignoring case
    Cuisine(String),
}

impl CuisineFilter {
    /// Parse a filter label; `"All"` (any case) or blank means no filter.
    pub fn parse(label: &str) -> Self {
        let label = label.trim();

        if label.is_empty() || label.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Cuisine(label.to_string())
        }
    }
}

/// All listed restaurants, in listing order.
#[derive(Debug, Default)]
pub struct Catalog<'a> {
    restaurants: SlotMap<RestaurantKey, Restaurant<'a>>,
    keys: FxHashMap<String, RestaurantKey>,
    order: Vec<RestaurantKey>,
}

impl<'a> Catalog<'a> {
    /// Build a catalog from restaurants in listing order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if an id is blank or repeated, or a rating is outside
    /// 0 to 5.
    pub fn from_restaurants(
        restaurants: impl IntoIterator<Item = Restaurant<'a>>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for restaurant in restaurants {
            catalog.insert(restaurant)?;
        }

        Ok(catalog)
    }

    /// Add a restaurant at the end of the listing.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the id is blank or already listed, or the rating is
    /// outside 0 to 5.
    pub fn insert(&mut self, restaurant: Restaurant<'a>) -> Result<RestaurantKey, CatalogError> {
        if restaurant.id.trim().is_empty() {
            return Err(CatalogError::EmptyId);
        }

        if self.keys.contains_key(&restaurant.id) {
            return Err(CatalogError::DuplicateRestaurant(restaurant.id));
        }

        if restaurant.rating.is_sign_negative() || restaurant.rating > MAX_RATING {
            return Err(CatalogError::InvalidRating {
                id: restaurant.id,
                rating: restaurant.rating,
            });
        }

        let id = restaurant.id.clone();
        let key = self.restaurants.insert(restaurant);

        self.keys.insert(id, key);
        self.order.push(key);

        Ok(key)
    }

    /// Find a restaurant by id.
    pub fn get(&self, id: &str) -> Option<&Restaurant<'a>> {
        self.keys
            .get(id)
            .and_then(|key| self.restaurants.get(*key))
    }

    /// Restaurants in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &Restaurant<'a>> {
        self.order
            .iter()
            .filter_map(|key| self.restaurants.get(*key))
    }

    /// Restaurants matching a search term and cuisine filter, in listing order.
    ///
    /// The term matches the name or any cuisine, ignoring case. A blank term matches
    /// everything the filter lets through.
    pub fn search(&self, term: &str, filter: &CuisineFilter) -> Vec<&Restaurant<'a>> {
        let term = term.trim().to_lowercase();
        let cuisine = match filter {
            CuisineFilter::All => None,
            CuisineFilter::Cuisine(cuisine) => Some(cuisine.trim().to_lowercase()),
        };

        self.iter()
            .filter(|restaurant| cuisine.as_deref().is_none_or(|needle| restaurant.serves(needle)))
            .filter(|restaurant| {
                term.is_empty()
                    || restaurant.name.to_lowercase().contains(&term)
                    || restaurant.serves(&term)
            })
            .collect()
    }

    /// Number of restaurants.
    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    /// Whether the catalog has no restaurants.
    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }
}
