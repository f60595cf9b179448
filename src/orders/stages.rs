//! Fulfilment Stages

use std::{borrow::Cow, fmt, iter};

use rustc_hash::FxHashSet;
use thiserror::Error;

/// Key of the terminal cancelled status. Stage sequences may not use it.
pub const CANCELLED_KEY: &str = "cancelled";

/// Errors building a stage sequence.
#[derive(Debug, Error, PartialEq)]
pub enum StagesError {
    /// A sequence needs at least one stage.
    #[error("stage sequence is empty")]
    Empty,

    /// A stage key is blank.
    #[error("stage {0} has an empty key")]
    EmptyKey(usize),

    /// The same key appears twice.
    #[error("stage key {0} appears more than once")]
    DuplicateKey(String),

    /// A stage uses the reserved cancelled key.
    #[error("stage key \"cancelled\" is reserved for cancelled orders")]
    ReservedKey,
}

/// Identifier of an order status, as persisted in the stage store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StageKey(Cow<'static, str>);

impl StageKey {
    /// Create a key from any string.
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    /// The key of the terminal cancelled status.
    #[must_use]
    pub const fn cancelled() -> Self {
        Self(Cow::Borrowed(CANCELLED_KEY))
    }

    /// Whether this is the cancelled key.
    pub fn is_cancelled(&self) -> bool {
        self.0 == CANCELLED_KEY
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for StageKey {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

/// A fulfilment stage: key plus display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    key: StageKey,
    label: Cow<'static, str>,
}

impl Stage {
    /// Create a stage.
    pub fn new(key: impl Into<Cow<'static, str>>, label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key: StageKey::new(key),
            label: label.into(),
        }
    }

    /// The terminal cancelled status.
    #[must_use]
    pub const fn cancelled() -> Self {
        Self {
            key: StageKey::cancelled(),
            label: Cow::Borrowed("Cancelled"),
        }
    }

    /// Stage key.
    pub fn key(&self) -> &StageKey {
        &self.key
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Ordered, non-empty chain of fulfilment stages with unique keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSequence {
    first: Stage,
    rest: Vec<Stage>,
}

impl StageSequence {
    /// Build a sequence, validating keys.
    ///
    /// # Errors
    ///
    /// Returns a [`StagesError`] if the sequence is empty, a key is blank or repeated, or
    /// a stage uses the reserved cancelled key.
    pub fn new(stages: impl Into<Vec<Stage>>) -> Result<Self, StagesError> {
        let mut stages = stages.into().into_iter();
        let first = stages.next().ok_or(StagesError::Empty)?;
        let sequence = Self {
            first,
            rest: stages.collect(),
        };

        sequence.validate()?;

        Ok(sequence)
    }

    /// The initial stage.
    pub fn first(&self) -> &Stage {
        &self.first
    }

    /// Stage at `index`.
    pub fn get(&self, index: usize) -> Option<&Stage> {
        match index.checked_sub(1) {
            None => Some(&self.first),
            Some(rest_index) => self.rest.get(rest_index),
        }
    }

    /// Position of the stage with `key`.
    pub fn position(&self, key: &StageKey) -> Option<usize> {
        self.iter().position(|stage| stage.key() == key)
    }

    /// Index of the final stage.
    pub fn last_index(&self) -> usize {
        self.rest.len()
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Always false; a sequence has at least one stage.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the stages in order.
    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        iter::once(&self.first).chain(self.rest.iter())
    }

    fn validate(&self) -> Result<(), StagesError> {
        let mut seen = FxHashSet::default();

        for (index, stage) in self.iter().enumerate() {
            if stage.key.as_str().trim().is_empty() {
                return Err(StagesError::EmptyKey(index));
            }

            if stage.key.is_cancelled() {
                return Err(StagesError::ReservedKey);
            }

            if !seen.insert(stage.key.as_str()) {
                return Err(StagesError::DuplicateKey(stage.key.to_string()));
            }
        }

        Ok(())
    }
}

impl Default for StageSequence {
    fn default() -> Self {
        Self {
            first: Stage::new("confirmed", "Order Confirmed"),
            rest: vec![
                Stage::new("preparing", "Preparing Food"),
                Stage::new("out_for_delivery", "Out for Delivery"),
                Stage::new("delivered", "Delivered"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sequence_is_confirmed_to_delivered() {
        let stages = StageSequence::default();
        let keys: Vec<&str> = stages.iter().map(|stage| stage.key().as_str()).collect();

        assert_eq!(keys, ["confirmed", "preparing", "out_for_delivery", "delivered"]);
        assert_eq!(stages.last_index(), 3);
        assert_eq!(stages.position(&StageKey::from("preparing")), Some(1));
        assert_eq!(stages.first().label(), "Order Confirmed");
        assert_eq!(stages.get(3).map(Stage::label), Some("Delivered"));
        assert_eq!(stages.get(4), None);
        assert_eq!(stages.len(), 4);
    }

    #[test]
    fn empty_sequence_is_rejected() {
        assert_eq!(StageSequence::new(Vec::<Stage>::new()), Err(StagesError::Empty));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let result = StageSequence::new([Stage::new("a", "A"), Stage::new("a", "Again")]);

        assert_eq!(result, Err(StagesError::DuplicateKey("a".to_string())));
    }

    #[test]
    fn cancelled_key_is_reserved() {
        let result = StageSequence::new([Stage::new("cancelled", "Nope")]);

        assert_eq!(result, Err(StagesError::ReservedKey));
    }

    #[test]
    fn blank_key_is_rejected() {
        let result = StageSequence::new([Stage::new("a", "A"), Stage::new(" ", "Blank")]);

        assert_eq!(result, Err(StagesError::EmptyKey(1)));
    }

    #[test]
    fn cancelled_stage_descriptor() {
        let cancelled = Stage::cancelled();

        assert!(cancelled.key().is_cancelled());
        assert_eq!(cancelled.label(), "Cancelled");
    }
}
