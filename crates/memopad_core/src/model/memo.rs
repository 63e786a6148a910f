//! Memo domain model.
//!
//! # Responsibility
//! - Define the record behind the list and editor flows.
//! - Provide constructors for store-allocated and caller-supplied ids.
//!
//! # Invariants
//! - `id` is stable and never reused for another memo.
//! - `date` is epoch milliseconds of the last completed save.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a memo record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type MemoId = Uuid;

/// One note: title, body and the timestamp of its last save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    /// Stable store-assigned id.
    #[serde(rename = "uuid")]
    pub id: MemoId,
    /// Display title. Missing and empty titles are both allowed.
    pub title: Option<String>,
    /// Free-form body text.
    pub content: String,
    /// Epoch milliseconds of the last completed save.
    pub date: i64,
}

/// How an editor session ended.
///
/// Drives the reconciliation step between the list cache and the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorAction {
    /// A new memo was created and confirmed.
    Add,
    /// An existing memo was changed and confirmed.
    Edit,
    /// The session was discarded without persisting anything.
    Cancel,
    /// The target memo was removed.
    Delete,
    /// No session outcome; reconciliation is a no-op.
    None,
}

impl Memo {
    /// Creates an empty draft with a generated stable id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates an empty draft with a caller-provided stable id.
    ///
    /// # Invariants
    /// - The provided `id` must remain stable for this memo lifetime.
    pub fn with_id(id: MemoId) -> Self {
        Self {
            id,
            title: None,
            content: String::new(),
            date: now_epoch_ms(),
        }
    }
}

impl Default for Memo {
    fn default() -> Self {
        Self::new()
    }
}

/// Current wall-clock time in epoch milliseconds.
///
/// Clamps to zero for clocks set before the Unix epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

#[cfg(test)]
mod tests {
    use super::{now_epoch_ms, Memo};

    #[test]
    fn new_drafts_get_distinct_ids() {
        assert_ne!(Memo::new().id, Memo::new().id);
    }

    #[test]
    fn draft_starts_empty_with_a_current_date() {
        let before = now_epoch_ms();
        let draft = Memo::new();
        assert_eq!(draft.title, None);
        assert!(draft.content.is_empty());
        assert!(draft.date >= before);
    }
}
