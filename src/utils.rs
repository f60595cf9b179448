//! Utils

use std::path::PathBuf;

use clap::Parser;

use crate::{observability::LoggingConfig, promotions::DiscountPolicy};

/// Arguments for the storefront example
#[derive(Debug, Parser)]
pub struct ExampleStorefrontArgs {
    /// Fixture set to use for the storefront & restaurants
    #[clap(short, long, default_value = "default")]
    pub fixture: String,

    /// Restaurant to order from
    #[clap(short, long, default_value = "1")]
    pub restaurant: String,

    /// Promo code to apply at checkout
    #[clap(short, long)]
    pub promo: Option<String>,

    /// Override the fixture's discount policy
    #[clap(long, value_enum)]
    pub discount_policy: Option<DiscountPolicy>,

    /// Seconds between order stage advances, overriding the fixture
    #[clap(short, long)]
    pub interval: Option<u64>,

    /// Persist order stages in a sled database at this path instead of in memory
    #[clap(long)]
    pub sled: Option<PathBuf>,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}
