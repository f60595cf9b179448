//! Integration tests for order status tracking: the stage chain, persistence across
//! reopening, shared trackers and the timed progression driver.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use testresult::TestResult;

use takeaway::orders::{
    OrderId,
    driver::ProgressionDriver,
    registry::{SharedTracker, TrackerRegistry},
    stages::{StageKey, StageSequence},
    store::{SessionStageStore, StageStore, StoreError},
    tracker::{OrderStatusTracker, TrackerError, Transition},
};

/// Store that accepts reads and refuses every write.
#[derive(Debug, Default)]
struct ReadOnlyStore {
    inner: SessionStageStore,
}

impl StageStore for ReadOnlyStore {
    fn load(&self, order: &OrderId) -> Result<Option<StageKey>, StoreError> {
        self.inner.load(order)
    }

    fn save(&self, _order: &OrderId, _stage: &StageKey) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only".to_string()))
    }
}

fn open(
    order: &str,
    store: Arc<dyn StageStore>,
) -> Result<OrderStatusTracker, Box<dyn std::error::Error>> {
    Ok(OrderStatusTracker::open(
        OrderId::new(order)?,
        Arc::new(StageSequence::default()),
        store,
    )?)
}

/// Reopen a sled database whose previous handle was just dropped. sled releases the file
/// lock asynchronously, so the lock may still be held for a short while.
#[cfg(feature = "sled-store")]
fn reopen(path: &std::path::Path) -> sled::Result<sled::Db> {
    use std::{
        thread,
        time::{Duration, Instant},
    };

    let deadline = Instant::now() + Duration::from_secs(10);

    loop {
        match sled::open(path) {
            Err(sled::Error::Io(_lock_held)) if Instant::now() < deadline => {
                thread::sleep(Duration::from_millis(20));
            }
            result => return result,
        }
    }
}

fn key(tracker: &SharedTracker) -> Result<String, &'static str> {
    Ok(tracker
        .lock()
        .map_err(|_poisoned| "poisoned")?
        .current_key()
        .to_string())
}

#[test]
fn advancing_reaches_delivered_and_stays_there() -> TestResult {
    let mut tracker = open("ORD-300001", Arc::new(SessionStageStore::new()))?;
    let mut seen = vec![tracker.current_key().to_string()];

    for _ in 0..5 {
        tracker.advance()?;
        seen.push(tracker.current_key().to_string());
    }

    assert_eq!(
        seen,
        [
            "confirmed",
            "preparing",
            "out_for_delivery",
            "delivered",
            "delivered",
            "delivered"
        ]
    );
    assert_eq!(tracker.current_stage().label(), "Delivered");

    Ok(())
}

#[test]
fn cancelled_order_does_not_advance() -> TestResult {
    let mut tracker = open("ORD-300002", Arc::new(SessionStageStore::new()))?;

    tracker.advance()?;
    tracker.advance()?;
    tracker.cancel()?;

    assert_eq!(tracker.advance()?, Transition::Unchanged);
    assert_eq!(tracker.current_stage().label(), "Cancelled");

    Ok(())
}

#[test]
fn reopening_resumes_from_session_store() -> TestResult {
    let store: Arc<dyn StageStore> = Arc::new(SessionStageStore::new());

    {
        let mut tracker = open("ORD-300003", Arc::clone(&store))?;

        tracker.advance()?;
    }

    let tracker = open("ORD-300003", store)?;

    assert_eq!(tracker.current_key().as_str(), "preparing");

    Ok(())
}

#[cfg(feature = "sled-store")]
#[test]
fn sled_store_resumes_across_sessions() -> TestResult {
    use takeaway::orders::store::SledStageStore;

    let dir = tempfile::tempdir()?;

    {
        let db = sled::open(dir.path())?;
        let mut tracker = open("ORD-300004", Arc::new(SledStageStore::open(&db)?))?;

        tracker.advance()?;
        tracker.advance()?;
    }

    let db = reopen(dir.path())?;
    let tracker = open("ORD-300004", Arc::new(SledStageStore::open(&db)?))?;

    assert_eq!(tracker.current_key().as_str(), "out_for_delivery");
    assert_eq!(tracker.progress(), Some((2, 4)));

    Ok(())
}

#[test]
fn failing_store_keeps_state_and_force_advance_moves_on() -> TestResult {
    let order = OrderId::new("ORD-300005")?;

    assert!(open(order.as_str(), Arc::new(ReadOnlyStore::default())).is_err());

    let detached = OrderStatusTracker::force_open(
        order.clone(),
        Arc::new(StageSequence::default()),
        Arc::new(ReadOnlyStore::default()),
    );

    assert_eq!(detached.current_key().as_str(), "confirmed");

    let store = ReadOnlyStore::default();

    store.inner.save(&order, &StageKey::from("confirmed"))?;

    let mut tracker = open(order.as_str(), Arc::new(store))?;

    assert!(matches!(tracker.advance(), Err(TrackerError::Persistence(_))));
    assert_eq!(tracker.current_key().as_str(), "confirmed");

    assert!(matches!(tracker.force_advance(), Transition::Advanced { .. }));
    assert_eq!(tracker.current_key().as_str(), "preparing");

    Ok(())
}

#[test]
fn views_of_one_order_share_a_tracker() -> TestResult {
    let registry = TrackerRegistry::new(
        StageSequence::default(),
        Arc::new(SessionStageStore::new()),
    );
    let order = OrderId::new("ORD-300006")?;

    let confirmation_page = registry.tracker(&order)?;
    let history_row = registry.tracker(&order)?;

    assert!(Arc::ptr_eq(&confirmation_page, &history_row));

    confirmation_page
        .lock()
        .map_err(|_poisoned| "poisoned")?
        .cancel()?;

    assert_eq!(key(&history_row)?, "cancelled");

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn driver_walks_order_to_delivered() -> TestResult {
    let period = Duration::from_secs(15);
    let tracker: SharedTracker = Arc::new(Mutex::new(open(
        "ORD-300007",
        Arc::new(SessionStageStore::new()),
    )?));

    let handle = ProgressionDriver::spawn(Arc::clone(&tracker), period)?;

    tokio::time::sleep(period * 2 + Duration::from_secs(1)).await;
    assert_eq!(key(&tracker)?, "out_for_delivery");

    tokio::time::sleep(period * 10).await;
    assert_eq!(key(&tracker)?, "delivered");
    assert!(handle.is_finished());

    Ok(())
}
