//! Tracker Registry
//!
//! Several views of the same order (a status page, a driver task, an order history row)
//! must share one tracker so they never disagree about the current stage.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::orders::{
    OrderId,
    stages::StageSequence,
    store::StageStore,
    tracker::{OrderStatusTracker, TrackerError},
};

/// A tracker shared between its observers and its driver.
pub type SharedTracker = Arc<Mutex<OrderStatusTracker>>;

#[derive(Debug, Default)]
struct Entries {
    trackers: FxHashMap<OrderId, SharedTracker>,

    /// Serialises opening per order so two callers never open the same order twice
    opening: FxHashMap<OrderId, Arc<Mutex<()>>>,
}

/// Hands out one shared tracker per order id.
///
/// The registry only maps ids to trackers, so a panic while its lock is held cannot leave
/// it inconsistent; a poisoned lock is recovered rather than reported.
pub struct TrackerRegistry {
    stages: Arc<StageSequence>,
    store: Arc<dyn StageStore>,
    entries: Mutex<Entries>,
}

impl TrackerRegistry {
    /// Create a registry whose trackers use `stages` and persist into `store`.
    pub fn new(stages: StageSequence, store: Arc<dyn StageStore>) -> Self {
        Self {
            stages: Arc::new(stages),
            store,
            entries: Mutex::default(),
        }
    }

    /// The tracker for `order`, opening it from the store on first use.
    ///
    /// Opening reads and writes the store without holding the registry lock, so a slow
    /// open only delays callers asking for the same order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if a new tracker cannot be opened.
    pub fn tracker(&self, order: &OrderId) -> Result<SharedTracker, TrackerError> {
        let gate = {
            let mut entries = self.entries();

            if let Some(existing) = entries.trackers.get(order) {
                return Ok(Arc::clone(existing));
            }

            Arc::clone(entries.opening.entry(order.clone()).or_default())
        };

        let _opening = gate.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = self.entries().trackers.get(order) {
            return Ok(Arc::clone(existing));
        }

        let tracker = OrderStatusTracker::open(
            order.clone(),
            Arc::clone(&self.stages),
            Arc::clone(&self.store),
        )?;
        let shared = Arc::new(Mutex::new(tracker));

        let mut entries = self.entries();

        entries.trackers.insert(order.clone(), Arc::clone(&shared));
        entries.opening.remove(order);

        debug!(%order, "registered order tracker");

        Ok(shared)
    }

    /// Forget the tracker for `order`. Holders of the shared tracker keep it; the next
    /// [`tracker`](Self::tracker) call reopens from the store.
    pub fn release(&self, order: &OrderId) -> Option<SharedTracker> {
        let mut entries = self.entries();

        entries.opening.remove(order);
        entries.trackers.remove(order)
    }

    /// Number of open trackers.
    pub fn len(&self) -> usize {
        self.entries().trackers.len()
    }

    /// Whether no trackers are open.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for TrackerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerRegistry")
            .field("stages", &self.stages)
            .field("trackers", &self.len())
            .finish_non_exhaustive()
    }
}
