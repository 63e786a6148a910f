//! Editor session state machine.
//!
//! # Responsibility
//! - Hold one memo being created or edited, with its input buffers.
//! - Yield exactly one outcome when the session finishes.
//!
//! # Invariants
//! - The action tag and originating row are fixed at session creation.
//! - Finishing consumes the session; a finished session cannot mutate.

use crate::model::memo::{now_epoch_ms, EditorAction, Memo};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    /// Delete is only reachable from an edit session.
    DeleteUnavailable,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeleteUnavailable => {
                write!(f, "delete is not available for a session creating a new memo")
            }
        }
    }
}

impl Error for SessionError {}

/// Outcome reported back to the list when a session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// The session's target memo, mutated only by `finish_done`.
    pub memo: Memo,
    /// How the session ended.
    pub action: EditorAction,
    /// Row the target occupied when the session opened. `None` for adds.
    pub row: Option<usize>,
}

/// One create-or-edit interaction cycle on a single memo.
///
/// Input buffers stand in for the title field and content view of the
/// detail screen; they are prefilled from the target when the session
/// opens and only copied back on `finish_done`.
#[derive(Debug)]
pub struct EditorSession {
    memo: Memo,
    action: EditorAction,
    row: Option<usize>,
    title_input: Option<String>,
    content_input: String,
}

impl EditorSession {
    /// Opens a session creating `memo` as a new entry.
    pub fn add(memo: Memo) -> Self {
        Self::open(memo, EditorAction::Add, None)
    }

    /// Opens a session editing the memo shown at `row`.
    pub fn edit(memo: Memo, row: usize) -> Self {
        Self::open(memo, EditorAction::Edit, Some(row))
    }

    fn open(memo: Memo, action: EditorAction, row: Option<usize>) -> Self {
        let title_input = memo.title.clone();
        let content_input = memo.content.clone();
        Self {
            memo,
            action,
            row,
            title_input,
            content_input,
        }
    }

    /// The session's target memo, untouched until `finish_done`.
    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    /// Action tag fixed at session creation (`Add` or `Edit`).
    pub fn action(&self) -> EditorAction {
        self.action
    }

    /// Originating row captured at session creation.
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn title_input(&self) -> Option<&str> {
        self.title_input.as_deref()
    }

    pub fn content_input(&self) -> &str {
        &self.content_input
    }

    /// Replaces the title buffer. An empty string is a valid title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title_input = Some(title.into());
    }

    /// Replaces the content buffer.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content_input = content.into();
    }

    /// Confirms the session: copies the input buffers into the memo,
    /// stamps its save time, and yields the outcome.
    pub fn finish_done(mut self) -> SessionOutcome {
        self.memo.title = self.title_input;
        self.memo.content = self.content_input;
        self.memo.date = now_epoch_ms();
        SessionOutcome {
            memo: self.memo,
            action: self.action,
            row: self.row,
        }
    }

    /// Discards the session. The memo is yielded untouched.
    pub fn finish_cancel(self) -> SessionOutcome {
        SessionOutcome {
            memo: self.memo,
            action: EditorAction::Cancel,
            row: self.row,
        }
    }

    /// Requests removal of the target memo.
    ///
    /// Only edit sessions expose a delete control; an add session has no
    /// committed record to remove.
    pub fn finish_delete(self) -> SessionResult<SessionOutcome> {
        if self.action != EditorAction::Edit {
            return Err(SessionError::DeleteUnavailable);
        }
        Ok(SessionOutcome {
            memo: self.memo,
            action: EditorAction::Delete,
            row: self.row,
        })
    }
}
