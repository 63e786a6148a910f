//! Domain model for memo records.
//!
//! # Responsibility
//! - Define the canonical memo record and the editor outcome tags.
//!
//! # Invariants
//! - Every memo is identified by a stable `MemoId`.
//! - `date` always reflects the last completed save.

pub mod memo;
