//! Memo list cache and reconciliation against the store.
//!
//! # Responsibility
//! - Mirror fetched memos in an ordered cache, loaded once per lifetime.
//! - Open editor sessions and reconcile their outcomes, then commit.
//! - Derive the row text shown for each memo.
//!
//! # Invariants
//! - Cache and store agree after every completed reconciliation.
//! - Cache order is fixed at load time; edits do not re-sort.
//! - Commit runs after every reconciliation, including cancel.

use crate::model::memo::{EditorAction, Memo, MemoId};
use crate::store::memo_store::{MemoStore, StoreError};
use crate::sync::session::{EditorSession, SessionOutcome};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const LIST_LABEL_MAX_CHARS: usize = 48;
const LIST_LABEL_PLACEHOLDER: &str = "(no title)";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

pub type ListResult<T> = Result<T, ListError>;

/// List error for load, session and reconciliation operations.
#[derive(Debug)]
pub enum ListError {
    RowOutOfBounds { row: usize, len: usize },
    /// An edit/delete outcome arrived without an originating row.
    MissingRow,
    /// The cache entry at the originating row is no longer the session's memo.
    RowMismatch { row: usize, memo: MemoId },
    Store(StoreError),
}

impl Display for ListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RowOutOfBounds { row, len } => {
                write!(f, "row {row} is out of bounds for a list of {len} memos")
            }
            Self::MissingRow => write!(f, "session outcome carries no originating row"),
            Self::RowMismatch { row, memo } => {
                write!(f, "memo {memo} is no longer at row {row}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ListError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Ordered mirror of saved memos plus the reconciliation that keeps the
/// mirror and the store agreed.
///
/// Holds the store it was constructed with; nothing here reaches into
/// process-wide state.
pub struct MemoList {
    store: MemoStore,
    cache: Vec<Memo>,
    loaded: bool,
}

impl MemoList {
    pub fn new(store: MemoStore) -> Self {
        Self {
            store,
            cache: Vec::new(),
            loaded: false,
        }
    }

    /// Fetches the saved memos into the cache, newest save first.
    ///
    /// Runs the fetch exactly once per list lifetime; later calls return
    /// the cache as-is.
    pub fn load_once(&mut self) -> ListResult<&[Memo]> {
        if !self.loaded {
            self.cache = self.store.fetch_all()?;
            self.loaded = true;
            info!(
                "event=list_load module=sync status=ok rows={}",
                self.cache.len()
            );
        }
        Ok(&self.cache)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The cached memos in display order.
    pub fn memos(&self) -> &[Memo] {
        &self.cache
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &MemoStore {
        &self.store
    }

    /// Opens an add session for a store-allocated pending memo.
    pub fn begin_add(&mut self) -> EditorSession {
        EditorSession::add(self.store.create_pending())
    }

    /// Opens an edit session for the cache entry at `row`.
    ///
    /// The originating row is captured here; a selection change after the
    /// session opens cannot redirect the reconciliation.
    pub fn begin_edit(&mut self, row: usize) -> ListResult<EditorSession> {
        let memo = self.cache.get(row).ok_or(ListError::RowOutOfBounds {
            row,
            len: self.cache.len(),
        })?;
        Ok(EditorSession::edit(memo.clone(), row))
    }

    /// Applies a finished session to the cache and the store, then commits.
    ///
    /// Commit runs unconditionally; for cancel it flushes an empty batch.
    /// Failures are returned to the caller, with the cache mutation and
    /// staged work left in place for retry or surfacing.
    pub fn finish_session(&mut self, outcome: SessionOutcome) -> ListResult<()> {
        match outcome.action {
            EditorAction::Add => {
                self.store.stage_insert(outcome.memo.clone())?;
                self.cache.push(outcome.memo);
            }
            EditorAction::Edit => {
                let row = self.resolve_row(&outcome)?;
                self.store.stage_update(outcome.memo.clone());
                self.cache[row] = outcome.memo;
            }
            EditorAction::Delete => {
                let row = self.resolve_row(&outcome)?;
                let removed = self.cache.remove(row);
                self.store.stage_delete(&removed);
            }
            EditorAction::Cancel | EditorAction::None => {}
        }

        self.store.commit()?;
        Ok(())
    }

    fn resolve_row(&self, outcome: &SessionOutcome) -> ListResult<usize> {
        let row = outcome.row.ok_or(ListError::MissingRow)?;
        let entry = self.cache.get(row).ok_or(ListError::RowOutOfBounds {
            row,
            len: self.cache.len(),
        })?;
        if entry.id != outcome.memo.id {
            return Err(ListError::RowMismatch {
                row,
                memo: outcome.memo.id,
            });
        }
        Ok(row)
    }
}

/// Derives the row text shown for a memo in the list.
///
/// Prefers the title; falls back to the body collapsed to a single line,
/// then to a fixed placeholder for fully blank memos.
pub fn list_label(memo: &Memo) -> String {
    if let Some(title) = memo.title.as_deref() {
        if !title.trim().is_empty() {
            return title.to_string();
        }
    }

    let collapsed = WHITESPACE_RE.replace_all(memo.content.trim(), " ");
    if collapsed.is_empty() {
        return LIST_LABEL_PLACEHOLDER.to_string();
    }

    let mut label: String = collapsed.chars().take(LIST_LABEL_MAX_CHARS).collect();
    if collapsed.chars().count() > LIST_LABEL_MAX_CHARS {
        label.push_str("...");
    }
    label
}
