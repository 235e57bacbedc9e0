//! Bounded undo/redo stacks.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::command::Command;

/// Default number of commands kept for undo.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Undo and redo stacks, newest at the back.
///
/// The undo stack never holds more than `limit` commands; the oldest are
/// evicted silently. Pushing a new command clears the redo stack.
pub struct History {
    undo_stack: VecDeque<Box<dyn Command>>,
    redo_stack: VecDeque<Box<dyn Command>>,
    limit: usize,
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("limit", &self.limit)
            .finish()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// A limit of zero is raised to one.
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.prune();
    }

    /// Record a new command: clears redo, then evicts the oldest entries
    /// over the limit.
    pub fn push(&mut self, command: Box<dyn Command>) {
        self.redo_stack.clear();
        self.undo_stack.push_back(command);
        self.prune();
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Box<dyn Command>> {
        self.undo_stack.pop_back()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Box<dyn Command>> {
        self.redo_stack.pop_back()
    }

    /// Return an undone command to the redo stack.
    pub(crate) fn push_redo(&mut self, command: Box<dyn Command>) {
        self.redo_stack.push_back(command);
    }

    /// Return a redone command to the undo stack without touching redo.
    pub(crate) fn push_undo(&mut self, command: Box<dyn Command>) {
        self.undo_stack.push_back(command);
        self.prune();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.back().map(|c| c.meta().label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.back().map(|c| c.meta().label.as_str())
    }

    /// Labels of the undo stack, oldest first.
    pub fn undo_labels(&self) -> Vec<&str> {
        self.undo_stack
            .iter()
            .map(|c| c.meta().label.as_str())
            .collect()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn memory_usage(&self) -> usize {
        self.undo_stack
            .iter()
            .chain(self.redo_stack.iter())
            .map(|c| c.memory_size())
            .sum()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn prune(&mut self) {
        while self.undo_stack.len() > self.limit {
            if let Some(evicted) = self.undo_stack.pop_front() {
                debug!("History full, evicted {}", evicted.meta().id);
            }
        }
    }
}
