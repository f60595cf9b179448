//! Storefront Fixtures

use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    config::StorefrontConfig,
    fixtures::{
        FixtureError,
        prices::{parse_currency, parse_percentage},
    },
    orders::stages::{Stage, StageSequence},
    promotions::{DiscountPolicy, PromoCodeTable},
};

/// Storefront settings in YAML. Omitted fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorefrontFixture {
    /// Currency code (e.g., "USD")
    pub currency: Option<String>,

    /// Tax rate (e.g., "10%")
    pub tax_rate: Option<String>,

    /// Promo code -> discount (e.g., `SAVE10: "10%"`); replaces the default table
    pub promo_codes: Option<FxHashMap<String, String>>,

    /// Discount policy (`locked` or `recompute`)
    pub discount_policy: Option<DiscountPolicy>,

    /// Fulfilment stages in order
    pub stages: Option<Vec<StageFixture>>,

    /// Seconds between automatic stage advances
    pub advance_interval_secs: Option<u64>,
}

/// Stage Fixture
#[derive(Debug, Deserialize)]
pub struct StageFixture {
    /// Stage key
    pub key: String,

    /// Display label
    pub label: String,
}

impl TryFrom<StorefrontFixture> for StorefrontConfig {
    type Error = FixtureError;

    fn try_from(fixture: StorefrontFixture) -> Result<Self, Self::Error> {
        let mut config = StorefrontConfig::default();

        if let Some(code) = fixture.currency {
            config.currency = parse_currency(&code)?;
        }

        if let Some(rate) = fixture.tax_rate {
            config.tax_rate = parse_percentage(&rate)?;
        }

        if let Some(codes) = fixture.promo_codes {
            let mut table = PromoCodeTable::empty();

            for (code, fraction) in codes {
                table.insert(&code, parse_percentage(&fraction)?);
            }

            config.promo_codes = table;
        }

        if let Some(policy) = fixture.discount_policy {
            config.discount_policy = policy;
        }

        if let Some(stages) = fixture.stages {
            config.stages = StageSequence::new(
                stages
                    .into_iter()
                    .map(|stage| Stage::new(stage.key, stage.label))
                    .collect::<Vec<_>>(),
            )?;
        }

        if let Some(secs) = fixture.advance_interval_secs {
            if secs == 0 {
                return Err(FixtureError::InvalidInterval);
            }

            config.advance_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
