//! Storefront Example
//!
//! This example walks one order through the storefront: browse a restaurant's menu, fill
//! the cart, apply a promo code, check out and follow the order until it is delivered.
//!
//! Use `-f` to load a fixture set by name
//! Use `-r` to pick the restaurant id
//! Use `-p` to apply a promo code
//! Use `--sled <PATH>` to persist order stages across runs

use std::{io, sync::Arc, time::Duration};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use takeaway::{
    cart::CartLedger,
    fixtures::Fixture,
    observability::init_logging,
    orders::{
        Order, OrderId,
        driver::ProgressionDriver,
        registry::{SharedTracker, TrackerRegistry},
        store::{SessionStageStore, SledStageStore, StageStore},
    },
    profile::{
        addresses::{AddressBook, NewAddress},
        history::OrderHistory,
    },
    receipt::Receipt,
    utils::ExampleStorefrontArgs,
};

const POLL: Duration = Duration::from_millis(250);

/// Storefront Example
#[tokio::main]
#[expect(clippy::print_stdout, reason = "Example code")]
pub async fn main() -> Result<()> {
    let args = ExampleStorefrontArgs::parse();

    init_logging(&args.logging)?;

    let (mut config, catalog) = Fixture::from_set(&args.fixture)?.into_parts();

    if let Some(policy) = args.discount_policy {
        config.discount_policy = policy;
    }

    if let Some(secs) = args.interval {
        config.advance_interval = Duration::from_secs(secs.max(1));
    }

    let restaurant = catalog
        .get(&args.restaurant)
        .ok_or_else(|| anyhow!("restaurant {} not found", args.restaurant))?;

    println!(
        "\n{} ({}) - {}",
        restaurant.name,
        restaurant.cuisines.join(", "),
        restaurant.delivery_time
    );

    let mut cart = CartLedger::from_config(&config);

    for (category, items) in restaurant.menu.by_category() {
        println!("\n  {category}");

        for item in &items {
            println!("    {:<24} {}", item.name, item.price);
        }

        // one of the first dish in every section, two of the very first
        if let Some(first) = items.first() {
            cart.add_or_increment(first.to_cart_line())?;
        }
    }

    if let Some(first) = restaurant.menu.iter().next() {
        cart.add_or_increment(first.to_cart_line())?;
    }

    if let Some(code) = args.promo.as_deref() {
        let outcome = cart.apply_promo_code(code)?;

        let verdict = if outcome.is_accepted() {
            "accepted"
        } else {
            "rejected"
        };

        println!("\nPromo code {code}: {verdict}");
    }

    let mut addresses = AddressBook::new();

    addresses.add(NewAddress {
        street: "123 Main St".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip: "62701".to_string(),
        is_default: true,
    })?;

    let mut order = Order::place(OrderId::generate(), cart.checkout()?)
        .with_estimated_delivery(restaurant.delivery_time.clone());

    if let Some(address) = addresses.default_address() {
        order = order.deliver_to(address);
    }

    cart.clear();

    Receipt::for_order(&order).write_to(io::stdout().lock())?;

    let store: Arc<dyn StageStore> = match &args.sled {
        Some(path) => {
            let db = sled::open(path).with_context(|| format!("opening {}", path.display()))?;

            Arc::new(SledStageStore::open(&db)?)
        }
        None => Arc::new(SessionStageStore::new()),
    };

    let registry = TrackerRegistry::new(config.stages.clone(), store);
    let tracker = registry.tracker(order.id())?;
    let mut history = OrderHistory::new();

    let (mut status, mut terminal) = status_of(&tracker)?;

    history.record(&order, status.as_str());
    println!("{}: {status}", order.id());

    let _driver = ProgressionDriver::spawn(Arc::clone(&tracker), config.advance_interval)?;

    while !terminal {
        tokio::time::sleep(POLL).await;

        let (latest, done) = status_of(&tracker)?;

        terminal = done;

        if latest != status {
            status = latest;
            history.update_status(order.id(), status.as_str());
            println!("{}: {status}", order.id());
        }
    }

    for past in history.iter() {
        println!(
            "\n{} {} {} ({} items)",
            past.order_id,
            past.total,
            past.status,
            past.items.len()
        );
    }

    Ok(())
}

/// Current stage label and whether the order is finished.
fn status_of(tracker: &SharedTracker) -> Result<(String, bool)> {
    let tracker = tracker
        .lock()
        .map_err(|_err| anyhow!("order tracker poisoned"))?;

    Ok((
        tracker.current_stage().label().to_string(),
        tracker.is_terminal(),
    ))
}
