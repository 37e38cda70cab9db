//! Durable keyed replay store.
//!
//! This crate provides:
//! - [`ReplayStore`]: a flat `replay id -> record` mapping, loaded wholesale
//!   at the start of a run and rewritten wholesale (atomically) at the end of
//!   a mutating run
//! - [`paths`]: atomic write helpers shared with report artifacts
//!
//! Key uniqueness is the core invariant: merge-insert is first-write-wins and
//! idempotent, an already-stored replay id is never overwritten.

pub mod paths;
pub mod store;

pub use paths::{atomic_write, atomic_write_json, ensure_parent_dirs};
pub use store::ReplayStore;
