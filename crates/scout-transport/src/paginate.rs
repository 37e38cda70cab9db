//! Cursor-following pagination over the listing endpoint.
//!
//! The listing endpoint returns `{list, count?, next?}` where `next` is a full
//! continuation URL. [`Paginator`] follows those until exhaustion, preserving
//! remote order. The fetch function is generic so tests can drive the loop
//! with synthetic pages.
//!
//! Partial-result policy: a page that still fails with a transient error after
//! retries ends the loop but keeps everything accumulated so far — an
//! ingestion run must not lose previously fetched pages because of a later
//! failure. Fatal errors surface immediately.

use crate::client::ListPage;
use crate::error::ApiError;
use scout_types::ReplayRecord;
use tracing::{info, warn};

/// The outcome of driving a listing query to exhaustion (or early abort).
#[derive(Debug)]
pub struct Collected {
    /// Replays in remote-provided order.
    pub replays: Vec<ReplayRecord>,
    /// False when pagination ended early on a transient failure.
    pub complete: bool,
}

/// Follows `next` continuation URLs until the remote reports no more pages.
pub struct Paginator<F>
where
    F: FnMut(Option<&str>) -> Result<ListPage, ApiError>,
{
    fetch_fn: F,
    cursor: Option<String>,
    started: bool,
    requests: usize,
    collected: usize,
    total: Option<u64>,
}

impl<F> Paginator<F>
where
    F: FnMut(Option<&str>) -> Result<ListPage, ApiError>,
{
    /// Create a paginator over a page-fetch function. The function receives
    /// `None` for the first request and the continuation URL afterwards.
    pub fn new(fetch_fn: F) -> Self {
        Self {
            fetch_fn,
            cursor: None,
            started: false,
            requests: 0,
            collected: 0,
            total: None,
        }
    }

    /// Fetch the next page, `None` once the listing is exhausted.
    pub fn next_page(&mut self) -> Result<Option<Vec<ReplayRecord>>, ApiError> {
        if self.started && self.cursor.is_none() {
            return Ok(None);
        }

        let page = (self.fetch_fn)(self.cursor.as_deref())?;
        self.started = true;
        self.requests += 1;
        self.collected += page.replays.len();
        if let Some(count) = page.count {
            self.total = Some(count);
            info!(
                "{}: fetched {}/{} replays",
                self.requests, self.collected, count
            );
        }
        self.cursor = page.next;
        Ok(Some(page.replays))
    }

    /// Collect all pages into one sequence.
    pub fn collect_all(mut self) -> Result<Collected, ApiError> {
        let mut replays = Vec::new();
        loop {
            match self.next_page() {
                Ok(Some(page)) => replays.extend(page),
                Ok(None) => {
                    return Ok(Collected {
                        replays,
                        complete: true,
                    })
                }
                Err(e) if e.is_transient() => {
                    warn!(error = %e, "pagination ended early, keeping partial results");
                    return Ok(Collected {
                        replays,
                        complete: false,
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}
