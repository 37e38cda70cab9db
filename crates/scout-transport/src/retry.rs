//! Bounded retry with exponential backoff.

use crate::error::ApiError;
use scout_types::RetryConfig;
use tracing::warn;

/// Run `f`, retrying transient failures up to `cfg.retries` additional
/// attempts with exponential backoff capped at `cfg.max_backoff`. Fatal and
/// decode errors are surfaced immediately; a transient error that survives
/// every attempt is surfaced to the caller rather than retried forever.
pub fn with_retries<T, F>(cfg: RetryConfig, mut f: F) -> Result<T, ApiError>
where
    F: FnMut() -> Result<T, ApiError>,
{
    let mut attempt = 0usize;
    let mut backoff = cfg.initial_backoff;

    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                if attempt >= cfg.retries || !e.is_transient() {
                    return Err(e);
                }
                attempt += 1;
                warn!(attempt, error = %e, "retrying after transient failure");
                std::thread::sleep(backoff);
                backoff = std::cmp::min(backoff * 2, cfg.max_backoff);
            }
        }
    }
}
