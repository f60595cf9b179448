//! Fixtures
//!
//! YAML fixture sets under `fixtures/`: storefront settings in
//! `fixtures/storefront/{name}.yml` and restaurant listings in
//! `fixtures/restaurants/{name}.yml`.

use std::{fs, path::PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{Catalog, CatalogError},
    config::StorefrontConfig,
    fixtures::{restaurants::RestaurantsFixture, storefront::StorefrontFixture},
    orders::stages::StagesError,
};

pub mod prices;
pub mod restaurants;
pub mod storefront;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between storefront and menu prices
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Rating is not a number
    #[error("Invalid rating for restaurant {0}")]
    InvalidRating(String),

    /// Advance interval must be positive
    #[error("Advance interval must be at least one second")]
    InvalidInterval,

    /// Invalid stage sequence
    #[error(transparent)]
    Stages(#[from] StagesError),

    /// Invalid restaurant listing
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Storefront settings; defaults until a storefront fixture is loaded
    config: StorefrontConfig,

    /// Restaurants loaded so far
    catalog: Catalog<'a>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            config: StorefrontConfig::default(),
            catalog: Catalog::default(),
        }
    }

    /// Load storefront settings from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds invalid settings.
    pub fn load_storefront(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("storefront").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: StorefrontFixture = serde_norway::from_str(&contents)?;

        self.config = fixture.try_into()?;

        debug!(
            fixture = name,
            currency = self.config.currency.iso_alpha_code,
            "loaded storefront"
        );

        Ok(self)
    }

    /// Load restaurants from a YAML fixture file, appending them to the catalog
    ///
    /// Menu prices must be in the storefront currency, so load the storefront first.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a price is in another
    /// currency, or a restaurant is invalid or already listed.
    pub fn load_restaurants(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("restaurants").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: RestaurantsFixture = serde_norway::from_str(&contents)?;

        for restaurant_fixture in fixture.restaurants {
            let restaurant = restaurant_fixture.into_restaurant(self.config.currency)?;

            self.catalog.insert(restaurant)?;
        }

        debug!(fixture = name, restaurants = self.catalog.len(), "loaded restaurants");

        Ok(self)
    }

    /// Load a complete fixture set (storefront and restaurants with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_storefront(name)?.load_restaurants(name)?;

        Ok(fixture)
    }

    /// Get the storefront settings
    pub fn storefront(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Get the restaurant catalog
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// Split into settings and catalog
    pub fn into_parts(self) -> (StorefrontConfig, Catalog<'a>) {
        (self.config, self.catalog)
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
