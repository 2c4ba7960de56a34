// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history of timeline snapshots.
//!
//! Every committed edit stores a bincode snapshot of the state before and
//! after it. Undo restores the `before` snapshot, redo the `after` one.
//! Committing a new edit clears the redo stack.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Default undo depth
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// History errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Unique operation ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(u64);

/// Serialized state snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Serialized state
    pub data: Vec<u8>,
}

impl StateSnapshot {
    /// Create from serializable value
    pub fn from_value<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self {
            data: bincode::serialize(value)?,
        })
    }

    /// Deserialize to value
    pub fn to_value<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        Ok(bincode::deserialize(&self.data)?)
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// An edit that can be undone/redone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Unique operation ID
    pub id: OperationId,
    /// Human-readable description
    pub description: String,
    /// State before the edit (for undo)
    pub before: StateSnapshot,
    /// State after the edit (for redo)
    pub after: StateSnapshot,
}

impl Operation {
    /// Get memory size of this operation
    pub fn memory_size(&self) -> usize {
        self.before.size() + self.after.size()
    }
}

/// History statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Operations in the undo stack
    pub undo_count: usize,
    /// Operations in the redo stack
    pub redo_count: usize,
    /// Memory used by the undo stack (bytes)
    pub memory_used: usize,
    /// Maximum history depth
    pub max_depth: usize,
}

/// Undo/redo history manager
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<Operation>,
    redo_stack: VecDeque<Operation>,
    next_id: u64,
    max_depth: usize,
    memory_used: usize,
}

impl History {
    /// Create a new history manager
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_HISTORY)
    }

    /// Create with custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            next_id: 1,
            max_depth: max_depth.max(1),
            memory_used: 0,
        }
    }

    /// Snapshot `before` and `after` and push the edit onto the undo stack
    pub fn record<T: Serialize>(&mut self, description: impl Into<String>, before: &T, after: &T) -> Result<OperationId> {
        let operation = Operation {
            id: OperationId(self.next_id),
            description: description.into(),
            before: StateSnapshot::from_value(before)?,
            after: StateSnapshot::from_value(after)?,
        };
        self.next_id += 1;
        let id = operation.id;

        self.redo_stack.clear();
        self.memory_used += operation.memory_size();
        self.undo_stack.push_back(operation);

        // Enforce history limit
        while self.undo_stack.len() > self.max_depth {
            if let Some(oldest) = self.undo_stack.pop_front() {
                self.memory_used = self.memory_used.saturating_sub(oldest.memory_size());
            }
        }

        Ok(id)
    }

    /// Pop the last edit, returning the state to restore
    pub fn undo<T: for<'de> Deserialize<'de>>(&mut self) -> Result<(String, T)> {
        let operation = self.undo_stack.back().ok_or(HistoryError::NothingToUndo)?;
        let state = operation.before.to_value()?;

        if let Some(operation) = self.undo_stack.pop_back() {
            self.memory_used = self.memory_used.saturating_sub(operation.memory_size());
            let description = operation.description.clone();
            self.redo_stack.push_back(operation);
            return Ok((description, state));
        }
        Err(HistoryError::NothingToUndo)
    }

    /// Re-apply the last undone edit, returning the state to restore
    pub fn redo<T: for<'de> Deserialize<'de>>(&mut self) -> Result<(String, T)> {
        let operation = self.redo_stack.back().ok_or(HistoryError::NothingToRedo)?;
        let state = operation.after.to_value()?;

        if let Some(operation) = self.redo_stack.pop_back() {
            self.memory_used += operation.memory_size();
            let description = operation.description.clone();
            self.undo_stack.push_back(operation);
            return Ok((description, state));
        }
        Err(HistoryError::NothingToRedo)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.memory_used = 0;
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.undo_stack.len(),
            redo_count: self.redo_stack.len(),
            memory_used: self.memory_used,
            max_depth: self.max_depth,
        }
    }

    /// Get description of next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|op| op.description.as_str())
    }

    /// Get description of next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|op| op.description.as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_round() {
        let mut history = History::new();
        history.record("double", &1u32, &2u32).unwrap();
        history.record("triple", &2u32, &6u32).unwrap();

        assert_eq!(history.undo_description(), Some("triple"));
        let (description, value): (String, u32) = history.undo().unwrap();
        assert_eq!((description.as_str(), value), ("triple", 2));
        assert_eq!(history.undo::<u32>().unwrap().1, 1);
        assert!(matches!(history.undo::<u32>(), Err(HistoryError::NothingToUndo)));

        assert_eq!(history.redo::<u32>().unwrap().1, 2);
        assert_eq!(history.redo::<u32>().unwrap().1, 6);
        assert!(matches!(history.redo::<u32>(), Err(HistoryError::NothingToRedo)));
    }

    #[test]
    fn test_operation_ids_are_unique() {
        let mut history = History::new();
        let first = history.record("a", &0u8, &1u8).unwrap();
        let second = history.record("b", &1u8, &2u8).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut history = History::new();
        history.record("a", &0u8, &1u8).unwrap();
        history.undo::<u8>().unwrap();
        assert!(history.can_redo());

        history.record("b", &0u8, &5u8).unwrap();
        assert!(!history.can_redo());
        assert_eq!(history.redo_description(), None);
    }

    #[test]
    fn test_max_depth_drops_oldest() {
        let mut history = History::with_max_depth(3);
        for i in 0..10u32 {
            history.record(format!("edit {i}"), &i, &(i + 1)).unwrap();
        }
        let stats = history.stats();
        assert_eq!(stats.undo_count, 3);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(history.undo::<u32>().unwrap().1, 9);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.record("a", &"x", &"y").unwrap();
        history.clear();
        assert!(!history.can_undo());
        assert_eq!(history.stats().memory_used, 0);
    }
}
