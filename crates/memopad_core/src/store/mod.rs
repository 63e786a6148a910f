//! Pending-mutation persistence boundary.
//!
//! # Responsibility
//! - Own the connection and the queue of staged memo mutations.
//! - Commit staged work atomically.
//!
//! # Invariants
//! - Provisional allocations reach the database only through staging
//!   followed by a successful commit.

pub mod memo_store;
