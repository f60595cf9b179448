//! Progression Driver
//!
//! Advances a shared tracker on a fixed interval until it reaches a terminal status.
//! The tracker itself knows nothing about time.

use std::{ops::ControlFlow, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::{
    task::{self, JoinHandle},
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, error};

use crate::orders::{registry::SharedTracker, tracker::Transition};

/// Errors starting a progression driver.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriverError {
    /// The interval between advances was zero.
    #[error("progression period must be greater than zero")]
    ZeroPeriod,
}

/// Periodic advancement of an order tracker.
#[derive(Debug)]
pub struct ProgressionDriver;

impl ProgressionDriver {
    /// Spawn a task that calls `advance` every `period`, starting one period from now.
    ///
    /// A failed advance is logged and retried on the next tick. The task exits once the
    /// tracker is delivered or cancelled, or when the returned handle is stopped or
    /// dropped. Each advance runs on the blocking pool, as a durable store may wait on
    /// disk. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::ZeroPeriod`] if `period` is zero.
    pub fn spawn(
        tracker: SharedTracker,
        period: Duration,
    ) -> Result<ProgressionHandle, DriverError> {
        if period.is_zero() {
            return Err(DriverError::ZeroPeriod);
        }

        let task = tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);

            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticks.tick().await;

                let tracker = Arc::clone(&tracker);

                match task::spawn_blocking(move || step(&tracker)).await {
                    Ok(ControlFlow::Continue(())) => {}
                    Ok(ControlFlow::Break(())) => return,
                    Err(err) => {
                        error!(error = %err, "progression step failed; stopping progression");
                        return;
                    }
                }
            }
        });

        Ok(ProgressionHandle { task })
    }
}

/// One tick: advance the tracker unless it is finished.
fn step(tracker: &SharedTracker) -> ControlFlow<()> {
    let Ok(mut guard) = tracker.lock() else {
        error!("order tracker lock poisoned; stopping progression");
        return ControlFlow::Break(());
    };

    if guard.is_terminal() {
        debug!(order = %guard.order(), "order is terminal; stopping progression");
        return ControlFlow::Break(());
    }

    match guard.advance() {
        Ok(Transition::Unchanged) => ControlFlow::Break(()),
        Ok(_) if guard.is_terminal() => {
            debug!(order = %guard.order(), "order reached final stage");
            ControlFlow::Break(())
        }
        Ok(_) => ControlFlow::Continue(()),
        Err(err) => {
            error!(order = %guard.order(), error = %err, "failed to advance order; retrying next tick");
            ControlFlow::Continue(())
        }
    }
}

/// Handle to a running progression task. Dropping it stops the task.
#[derive(Debug)]
pub struct ProgressionHandle {
    task: JoinHandle<()>,
}

impl ProgressionHandle {
    /// Stop advancing. The tracker keeps whatever stage it had reached; an advance
    /// already running on the blocking pool still completes.
    pub fn stop(&self) {
        self.task.abort();
    }

    /// Whether the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ProgressionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
