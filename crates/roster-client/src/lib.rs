//! [`Directory`](roster_core::directory::Directory) backed by the HR
//! backend's REST API.
//!
//! Auth beyond an optional bearer token, retries and caching are the
//! caller's responsibility.

mod client;

pub mod error;

pub use client::{BackendClient, BackendConfig};
pub use error::{Error, Result};
