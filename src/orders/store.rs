//! Stage Stores
//!
//! Keyed mapping from order id to the last persisted stage key. Trackers read it when
//! opened and write it on every transition.

use std::{string::FromUtf8Error, sync::Mutex};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::orders::{OrderId, stages::StageKey};

/// Errors reading or writing persisted stages.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The in-memory store's lock was poisoned by a panicking writer.
    #[error("stage store lock poisoned")]
    Poisoned,

    /// A stored stage key was not valid UTF-8.
    #[error("stored stage key for {order} is not valid UTF-8")]
    Encoding {
        /// Order whose entry could not be decoded
        order: OrderId,

        /// Decoding error
        #[source]
        source: FromUtf8Error,
    },

    /// The backing store refused the operation.
    #[error("stage store unavailable: {0}")]
    Unavailable(String),

    /// Wrapped sled error.
    #[cfg(feature = "sled-store")]
    #[error(transparent)]
    Sled(#[from] sled::Error),
}

/// Persistence for order stages.
#[cfg_attr(test, mockall::automock)]
pub trait StageStore: Send + Sync {
    /// Read the persisted stage for an order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing store cannot be read.
    fn load(&self, order: &OrderId) -> Result<Option<StageKey>, StoreError>;

    /// Persist the stage for an order. Returns once the write is visible to readers.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing store cannot be written.
    fn save(&self, order: &OrderId, stage: &StageKey) -> Result<(), StoreError>;
}

/// In-memory store whose contents live as long as the process: the browsing session.
#[derive(Debug, Default)]
pub struct SessionStageStore {
    stages: Mutex<FxHashMap<OrderId, StageKey>>,
}

impl SessionStageStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StageStore for SessionStageStore {
    fn load(&self, order: &OrderId) -> Result<Option<StageKey>, StoreError> {
        let stages = self.stages.lock().map_err(|_poisoned| StoreError::Poisoned)?;

        Ok(stages.get(order).cloned())
    }

    fn save(&self, order: &OrderId, stage: &StageKey) -> Result<(), StoreError> {
        let mut stages = self.stages.lock().map_err(|_poisoned| StoreError::Poisoned)?;

        stages.insert(order.clone(), stage.clone());

        Ok(())
    }
}

/// Durable store backed by a sled tree, surviving restarts.
#[cfg(feature = "sled-store")]
#[derive(Debug, Clone)]
pub struct SledStageStore {
    tree: sled::Tree,
}

#[cfg(feature = "sled-store")]
impl SledStageStore {
    const TREE: &'static str = "order_stages";

    /// Open the order stage tree in a sled database.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Sled`] if the tree cannot be opened.
    pub fn open(db: &sled::Db) -> Result<Self, StoreError> {
        Ok(Self {
            tree: db.open_tree(Self::TREE)?,
        })
    }
}

#[cfg(feature = "sled-store")]
impl StageStore for SledStageStore {
    fn load(&self, order: &OrderId) -> Result<Option<StageKey>, StoreError> {
        let Some(bytes) = self.tree.get(order.as_str().as_bytes())? else {
            return Ok(None);
        };

        let key = String::from_utf8(bytes.to_vec()).map_err(|source| StoreError::Encoding {
            order: order.clone(),
            source,
        })?;

        Ok(Some(StageKey::new(key)))
    }

    fn save(&self, order: &OrderId, stage: &StageKey) -> Result<(), StoreError> {
        self.tree
            .insert(order.as_str().as_bytes(), stage.as_str().as_bytes())?;

        // flush before reporting the transition
        self.tree.flush()?;

        Ok(())
    }
}
