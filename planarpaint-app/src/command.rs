use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use planarpaint_core::EditorState;

static COMMAND_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Identity of a command: unique id, creation time, and a human label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMeta {
    /// `"<prefix>-<millis since epoch>-<counter>"`.
    pub id: String,
    pub label: String,
    pub created_at: SystemTime,
}

impl CommandMeta {
    pub fn new(prefix: &str, label: impl Into<String>) -> Self {
        let created_at = SystemTime::now();
        let millis = created_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let counter = COMMAND_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("{prefix}-{millis}-{counter}"),
            label: label.into(),
            created_at,
        }
    }
}

/// A reversible edit over the whole editor state.
///
/// `apply` must be repeatable after `revert` (redo), and `revert` must put
/// the state back exactly as it was before the matching `apply`.
pub trait Command: fmt::Debug {
    fn meta(&self) -> &CommandMeta;

    /// Forward application.
    fn apply(&mut self, state: &mut EditorState);

    /// Inverse application.
    fn revert(&mut self, state: &mut EditorState);

    /// Approximate heap size of the data retained for reversal.
    fn memory_size(&self) -> usize {
        0
    }
}
