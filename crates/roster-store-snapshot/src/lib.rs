//! JSON snapshot backend for Roster.
//!
//! Holds a whole [`Snapshot`] of departments, users, tasks and leave requests
//! in memory behind a [`tokio::sync::RwLock`]. When opened from a file, every
//! write is flushed back to that file.

mod snapshot;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use snapshot::Snapshot;
pub use store::SnapshotStore;

#[cfg(test)]
mod tests;
