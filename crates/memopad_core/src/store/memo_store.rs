//! Memo store with managed pending mutations.
//!
//! # Responsibility
//! - Hand out provisional memo allocations for add flows.
//! - Stage insert/update/delete mutations and commit them atomically.
//!
//! # Invariants
//! - `create_pending` writes nothing; an allocation only reaches the
//!   database through `stage_insert` followed by `commit`.
//! - `commit` flushes every staged op in one transaction or none at all.
//! - An allocation that is never staged is never visible to any fetch.

use crate::model::memo::{Memo, MemoId};
use crate::repo::memo_repo::{MemoRepository, RepoError, SqliteMemoRepository};
use log::{error, info};
use rusqlite::{Connection, TransactionBehavior};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for fetch, staging and commit operations.
#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    /// Staged insert for an id that was not allocated by `create_pending`.
    UnknownPending(MemoId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::UnknownPending(id) => {
                write!(f, "memo {id} has no provisional allocation in this store")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::UnknownPending(_) => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

#[derive(Debug, Clone)]
enum StagedOp {
    Insert(Memo),
    Update(Memo),
    Delete(MemoId),
}

/// Persistence boundary for memo records.
///
/// Mirrors a managed-context workflow: drafts are allocated up front,
/// mutations are staged as the UI flow decides them, and one `commit`
/// makes the whole batch durable.
pub struct MemoStore {
    conn: Connection,
    provisional: HashSet<MemoId>,
    staged: Vec<StagedOp>,
}

impl MemoStore {
    /// Wraps an opened, migrated connection.
    ///
    /// The connection is injected by the caller; the store never reaches
    /// into process-wide state to find one.
    pub fn new(conn: Connection) -> StoreResult<Self> {
        SqliteMemoRepository::try_new(&conn)?;
        Ok(Self {
            conn,
            provisional: HashSet::new(),
            staged: Vec::new(),
        })
    }

    /// Returns all committed memos, newest save first.
    ///
    /// Provisional allocations and staged-but-uncommitted mutations are
    /// not reflected.
    pub fn fetch_all(&self) -> StoreResult<Vec<Memo>> {
        let repo = SqliteMemoRepository::try_new(&self.conn)?;
        Ok(repo.fetch_all()?)
    }

    /// Allocates a draft memo bound to this store without writing anything.
    pub fn create_pending(&mut self) -> Memo {
        let memo = Memo::new();
        self.provisional.insert(memo.id);
        memo
    }

    /// Returns whether `id` is an unstaged allocation from `create_pending`.
    pub fn is_provisional(&self, id: MemoId) -> bool {
        self.provisional.contains(&id)
    }

    /// Promotes a provisional allocation to a staged insert.
    pub fn stage_insert(&mut self, memo: Memo) -> StoreResult<()> {
        if !self.provisional.remove(&memo.id) {
            return Err(StoreError::UnknownPending(memo.id));
        }
        self.staged.push(StagedOp::Insert(memo));
        Ok(())
    }

    /// Stages an in-place field update of a committed row.
    pub fn stage_update(&mut self, memo: Memo) {
        self.staged.push(StagedOp::Update(memo));
    }

    /// Marks a record for removal on the next commit.
    pub fn stage_delete(&mut self, memo: &Memo) {
        self.staged.push(StagedOp::Delete(memo.id));
    }

    /// Number of staged ops awaiting commit.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Persists all staged mutations in one transaction.
    ///
    /// On success the staged queue is empty. On failure nothing was
    /// written and the queue is left intact for the caller to decide
    /// retry or surfacing.
    pub fn commit(&mut self) -> StoreResult<()> {
        let started_at = Instant::now();
        let (mut inserts, mut updates, mut deletes) = (0usize, 0usize, 0usize);
        for op in &self.staged {
            match op {
                StagedOp::Insert(_) => inserts += 1,
                StagedOp::Update(_) => updates += 1,
                StagedOp::Delete(_) => deletes += 1,
            }
        }
        info!(
            "event=store_commit module=store status=start inserts={inserts} updates={updates} deletes={deletes}"
        );

        let result = apply_staged(&mut self.conn, &self.staged);
        match result {
            Ok(()) => {
                self.staged.clear();
                info!(
                    "event=store_commit module=store status=ok inserts={inserts} updates={updates} deletes={deletes} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_commit module=store status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err.into())
            }
        }
    }
}

fn apply_staged(conn: &mut Connection, staged: &[StagedOp]) -> Result<(), RepoError> {
    if staged.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    {
        let repo = SqliteMemoRepository::try_new(&tx)?;
        for op in staged {
            match op {
                StagedOp::Insert(memo) => {
                    repo.insert_memo(memo)?;
                }
                StagedOp::Update(memo) => repo.update_memo(memo)?,
                StagedOp::Delete(id) => repo.delete_memo(*id)?,
            }
        }
    }
    tx.commit()?;

    Ok(())
}
