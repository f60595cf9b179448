//! Takeaway prelude.
//!
//! Convenience exports for common library consumers.

#[cfg(feature = "sled-store")]
pub use crate::orders::store::SledStageStore;
pub use crate::{
    cart::{
        CartError, CartLedger,
        checkout::CheckoutSnapshot,
        lines::{CartLine, LineId, NewCartLine},
        totals::CartTotals,
    },
    catalog::{
        Catalog, CatalogError, CuisineFilter, Restaurant,
        menu::{Menu, MenuItem},
    },
    config::StorefrontConfig,
    fixtures::{Fixture, FixtureError},
    observability::{LogFormat, LoggingConfig, ObservabilityError, init_logging},
    orders::{
        Order, OrderError, OrderId,
        driver::{DriverError, ProgressionDriver, ProgressionHandle},
        registry::{SharedTracker, TrackerRegistry},
        stages::{Stage, StageKey, StageSequence, StagesError},
        store::{SessionStageStore, StageStore, StoreError},
        tracker::{OrderStatusTracker, TrackerError, Transition},
    },
    profile::{
        ProfileError, UserProfile,
        addresses::{Address, AddressBook, AddressId, NewAddress},
        history::{OrderHistory, PastOrder},
    },
    promotions::{AppliedPromo, DiscountPolicy, PromoCodeTable, PromoOutcome},
    receipt::{Receipt, ReceiptError},
};
