//! # History Log
//!
//! Labeled checkpoint stack over the content store's state.
//!
//! Each entry is a full snapshot of the serialized area trees, not an
//! inverse operation: restoring is a wholesale swap, which keeps undo
//! correct under any combination of structural edits. New checkpoints
//! clear the redo stack; depth is bounded with oldest-entry eviction.
//!
//! The first recorded checkpoint is the baseline — undo is available once
//! a second checkpoint exists.

use crate::content_store::ContentSnapshot;

/// One named checkpoint
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub label: String,
    pub snapshot: ContentSnapshot,
}

/// Undo/redo stack of content snapshots
#[derive(Debug)]
pub struct HistoryStack {
    /// Applied checkpoints, most recent last; the top is the current state
    undo_stack: Vec<HistoryEntry>,

    /// Undone checkpoints, most recent last
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of retained checkpoints (0 = unlimited)
    max_levels: usize,
}

impl HistoryStack {
    /// Create a stack with the default depth (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record a checkpoint of the current state
    pub fn record(&mut self, label: impl Into<String>, snapshot: ContentSnapshot) {
        self.undo_stack.push(HistoryEntry {
            label: label.into(),
            snapshot,
        });

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // A new checkpoint invalidates the undone future
        self.redo_stack.clear();
    }

    /// Step back one checkpoint, returning the state to restore
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        if self.undo_stack.len() < 2 {
            return None;
        }

        let undone = self.undo_stack.pop()?;
        self.redo_stack.push(undone);

        self.undo_stack.last().cloned()
    }

    /// Step forward one undone checkpoint, returning the state to restore
    pub fn redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry);

        self.undo_stack.last().cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() >= 2
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Label of the checkpoint an undo would revert
    pub fn undo_label(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.undo_stack.last().map(|entry| entry.label.as_str())
    }

    /// Label of the checkpoint a redo would reapply
    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|entry| entry.label.as_str())
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len().saturating_sub(1)
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}
