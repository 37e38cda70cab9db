//! Replay ingestion and reporting pipeline.
//!
//! Two independent flows run on demand over one shared store:
//! - ingestion: paginated fetch from the remote listing endpoint merged
//!   idempotently into the store ([`ingest`])
//! - query: store → [`filter`] → [`sort`] (with optional per-replay detail
//!   enrichment) → [`report`]
//!
//! Everything is synchronous and single-threaded; the remote API is rate
//! limited and requests are issued strictly one at a time.

pub mod args;
pub mod filter;
pub mod ingest;
pub mod report;
pub mod sort;

use scout_roster::Roster;
use scout_transport::ApiClient;

/// Per-run context: the immutable roster plus the remote client. Built once
/// in `main` and passed by reference, so no component depends on process-wide
/// globals.
pub struct AppContext {
    pub roster: Roster,
    pub client: ApiClient,
}
