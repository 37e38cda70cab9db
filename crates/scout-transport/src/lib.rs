//! Blocking HTTP transport for the replay API.
//!
//! This crate provides:
//! - [`ApiClient`]: authenticated GET against the listing/detail/ping endpoints
//! - [`ApiError`]: the transient/fatal error taxonomy the retry policy keys on
//! - [`with_retries`]: bounded retry with exponential backoff
//! - [`Paginator`]: cursor-following page collection with a partial-result policy
//!
//! All requests are synchronous and issued one at a time; the remote API is
//! rate limited and concurrent fetching is deliberately avoided.

pub mod client;
pub mod error;
pub mod paginate;
pub mod retry;

pub use client::{ApiClient, DetailSource, ListPage, ListQuery};
pub use error::ApiError;
pub use paginate::{Collected, Paginator};
pub use retry::with_retries;
