//! Order Status Tracker
//!
//! A passive state machine over a [`StageSequence`] plus the terminal cancelled status.
//! It owns no timers or threads; whatever drives it (a
//! [`ProgressionDriver`](crate::orders::driver::ProgressionDriver), a server event, a test)
//! calls [`OrderStatusTracker::advance`].
//!
//! Every transition is written to the [`StageStore`] before it is applied in memory, so a
//! reader of the store never lags behind the tracker. If the write fails the tracker stays
//! where it was.

use std::{fmt, sync::Arc};

use thiserror::Error;
use tracing::{info, warn};

use crate::orders::{
    OrderId,
    stages::{Stage, StageKey, StageSequence},
    store::{StageStore, StoreError},
};

/// Errors opening or transitioning a tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The stage store could not be read or written.
    #[error("failed to persist order stage: {0}")]
    Persistence(#[from] StoreError),
}

/// Outcome of [`OrderStatusTracker::advance`] or [`OrderStatusTracker::cancel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved to the next stage.
    Advanced {
        /// Previous stage
        from: StageKey,

        /// New stage
        to: StageKey,
    },

    /// Moved to the cancelled status.
    Cancelled {
        /// Stage the order was cancelled from
        from: StageKey,
    },

    /// Nothing changed; the tracker was already terminal.
    Unchanged,
}

/// Fulfilment status of a single order.
pub struct OrderStatusTracker {
    order: OrderId,
    stages: Arc<StageSequence>,
    store: Arc<dyn StageStore>,

    /// Index into `stages`; `None` once cancelled
    position: Option<usize>,
    current: Stage,
}

impl OrderStatusTracker {
    /// Open the tracker for an order, resuming from the persisted stage.
    ///
    /// With nothing persisted, the tracker starts at the first stage and persists it. A
    /// persisted key that matches no stage is discarded in favour of the first stage.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if the store cannot be read or written.
    pub fn open(
        order: OrderId,
        stages: Arc<StageSequence>,
        store: Arc<dyn StageStore>,
    ) -> Result<Self, TrackerError> {
        let persisted = store.load(&order)?;

        if let Some((position, current)) = Self::resume(&order, &stages, persisted) {
            return Ok(Self {
                order,
                stages,
                store,
                position,
                current,
            });
        }

        let current = stages.first().clone();

        store.save(&order, current.key())?;

        info!(%order, stage = %current.key(), "opened order tracker");

        Ok(Self {
            order,
            stages,
            store,
            position: Some(0),
            current,
        })
    }

    /// Open the tracker even when the store cannot be read or written.
    ///
    /// The counterpart of [`force_advance`](Self::force_advance) for opening: an unreadable
    /// store is treated as empty and a failed write of the first stage is logged, leaving
    /// the tracker in memory only until a later transition is persisted.
    pub fn force_open(
        order: OrderId,
        stages: Arc<StageSequence>,
        store: Arc<dyn StageStore>,
    ) -> Self {
        let persisted = store.load(&order).unwrap_or_else(|err| {
            warn!(%order, error = %err, "failed to read persisted stage; starting over");
            None
        });

        if let Some((position, current)) = Self::resume(&order, &stages, persisted) {
            return Self {
                order,
                stages,
                store,
                position,
                current,
            };
        }

        let current = stages.first().clone();

        match store.save(&order, current.key()) {
            Ok(()) => info!(%order, stage = %current.key(), "opened order tracker"),
            Err(err) => warn!(%order, error = %err, "opened order tracker without persisting"),
        }

        Self {
            order,
            stages,
            store,
            position: Some(0),
            current,
        }
    }

    /// Move to the next stage.
    ///
    /// At the final stage or once cancelled this is a no-op returning
    /// [`Transition::Unchanged`].
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if the new stage cannot be persisted; the
    /// tracker is left at its current stage.
    pub fn advance(&mut self) -> Result<Transition, TrackerError> {
        let Some((index, next)) = self.next_stage() else {
            return Ok(Transition::Unchanged);
        };

        self.store.save(&self.order, next.key())?;

        Ok(self.apply(Some(index), next))
    }

    /// Cancel the order from any non-terminal stage.
    ///
    /// Cancelling a delivered or already cancelled order is a no-op returning
    /// [`Transition::Unchanged`].
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if the cancellation cannot be persisted; the
    /// tracker is left at its current stage.
    pub fn cancel(&mut self) -> Result<Transition, TrackerError> {
        if self.is_terminal() {
            return Ok(Transition::Unchanged);
        }

        self.store.save(&self.order, &StageKey::cancelled())?;

        Ok(self.apply(None, Stage::cancelled()))
    }

    /// Move to the next stage without persisting it.
    ///
    /// For hosts that prefer to keep tracking when the store is down; the store keeps the
    /// last stage that was written successfully.
    pub fn force_advance(&mut self) -> Transition {
        let Some((index, next)) = self.next_stage() else {
            return Transition::Unchanged;
        };

        warn!(order = %self.order, stage = %next.key(), "advancing without persisting");

        self.apply(Some(index), next)
    }

    /// Cancel without persisting the cancellation.
    pub fn force_cancel(&mut self) -> Transition {
        if self.is_terminal() {
            return Transition::Unchanged;
        }

        warn!(order = %self.order, "cancelling without persisting");

        self.apply(None, Stage::cancelled())
    }

    /// The current stage, or the cancelled descriptor.
    pub fn current_stage(&self) -> &Stage {
        &self.current
    }

    /// Key of the current stage.
    pub fn current_key(&self) -> &StageKey {
        self.current.key()
    }

    /// Zero-based index of the current stage and the number of stages; `None` once
    /// cancelled.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.position.map(|index| (index, self.stages.len()))
    }

    /// Whether the order was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.position.is_none()
    }

    /// Whether no further transitions can happen (cancelled or at the final stage).
    pub fn is_terminal(&self) -> bool {
        self.position
            .is_none_or(|index| index >= self.stages.last_index())
    }

    /// The tracked order.
    pub fn order(&self) -> &OrderId {
        &self.order
    }

    /// The stage sequence being tracked.
    pub fn stages(&self) -> &StageSequence {
        &self.stages
    }

    /// Position and stage named by a persisted key, if it names one.
    fn resume(
        order: &OrderId,
        stages: &StageSequence,
        persisted: Option<StageKey>,
    ) -> Option<(Option<usize>, Stage)> {
        let key = persisted?;

        let resumed = if key.is_cancelled() {
            Some((None, Stage::cancelled()))
        } else {
            stages
                .position(&key)
                .and_then(|index| stages.get(index).map(|stage| (Some(index), stage.clone())))
        };

        match &resumed {
            Some((_, current)) => info!(%order, stage = %current.key(), "resumed order tracker"),
            None => warn!(%order, stage = %key, "discarding unknown persisted stage"),
        }

        resumed
    }

    fn next_stage(&self) -> Option<(usize, Stage)> {
        let index = self.position?.checked_add(1)?;

        self.stages.get(index).map(|stage| (index, stage.clone()))
    }

    fn apply(&mut self, position: Option<usize>, next: Stage) -> Transition {
        let from = self.current.key().clone();
        let transition = match position {
            Some(_) => Transition::Advanced {
                from,
                to: next.key().clone(),
            },
            None => Transition::Cancelled { from },
        };

        info!(order = %self.order, stage = %next.key(), "order status changed");

        self.position = position;
        self.current = next;

        transition
    }
}

impl fmt::Debug for OrderStatusTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderStatusTracker")
            .field("order", &self.order)
            .field("current", &self.current.key())
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
