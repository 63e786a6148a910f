//! Core domain logic for memopad.
//!
//! A minimal note-taking core: an ordered list of saved memos, one
//! create-or-edit session at a time, and the reconciliation that keeps the
//! list cache and persistent storage agreed. UI shells drive this crate;
//! nothing here renders anything.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod sync;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::memo::{now_epoch_ms, EditorAction, Memo, MemoId};
pub use repo::memo_repo::{MemoRepository, RepoError, RepoResult, SqliteMemoRepository};
pub use store::memo_store::{MemoStore, StoreError, StoreResult};
pub use sync::list::{list_label, ListError, ListResult, MemoList};
pub use sync::session::{EditorSession, SessionError, SessionOutcome, SessionResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
