//! Core types and logic for the Roster HR dashboard.
//!
//! Everything that decides *who belongs where* and *how a department is
//! doing* lives here as pure functions over record snapshots: membership
//! resolution, task analytics, the department list pipeline, membership
//! assignment rules and leave review. This crate is free of HTTP and storage
//! dependencies; providers implement [`directory::Directory`].

pub mod analytics;
pub mod assignment;
pub mod department;
pub mod directory;
pub mod error;
pub mod leave;
pub mod membership;
pub mod reference;
pub mod task;
pub mod timestamp;
pub mod user;
pub mod view;

pub use error::{Error, Result};
