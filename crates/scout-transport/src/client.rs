//! Authenticated client for the replay API.
//!
//! Three endpoints matter: the paginated listing endpoint (`/replays` plus
//! query parameters, continued via server-provided `next` URLs), the detail
//! endpoint (`/replays/{id}`), and the API root used as a connectivity check.
//! Authentication is a key in the `Authorization` header, sourced from the
//! process environment by the caller.

use crate::error::ApiError;
use crate::paginate::{Collected, Paginator};
use crate::retry::with_retries;
use scout_types::env_utils::{env_string_or, env_var_or};
use scout_types::{ReplayRecord, RetryConfig};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Default API base, overridable via `BALLCHASING_API_URL`.
pub const DEFAULT_API_URL: &str = "https://ballchasing.com/api";

/// Query parameters for the listing endpoint. Unset fields are omitted.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// `platform:id` remote identifier of a tracked player.
    pub player_id: Option<String>,
    /// Playlist id filter (see `GameMode::playlist_id`).
    pub playlist: Option<String>,
    /// RFC3339 date floor.
    pub replay_date_after: Option<String>,
}

/// One page of the listing endpoint.
#[derive(Debug, Clone)]
pub struct ListPage {
    pub replays: Vec<ReplayRecord>,
    /// Continuation URL for the next page, absent on the last page.
    pub next: Option<String>,
    /// Total match count across all pages, when the remote reports it.
    pub count: Option<u64>,
}

/// Seam for per-replay detail fetches, so enrichment can be driven by a fake
/// in tests.
pub trait DetailSource {
    fn fetch_detail(&self, replay_id: &str) -> Result<ReplayRecord, ApiError>;
}

/// Blocking client for the replay API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    auth: String,
    agent: ureq::Agent,
    retry: RetryConfig,
}

impl ApiClient {
    /// Default request timeout in seconds (can be overridden by env).
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds (can be overridden by env).
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    fn default_timeouts() -> (Duration, Duration) {
        let timeout_secs = env_var_or("REPLAY_SCOUT_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS);
        let connect_secs = env_var_or(
            "REPLAY_SCOUT_CONNECT_TIMEOUT_SECS",
            Self::DEFAULT_CONNECT_TIMEOUT_SECS,
        );
        (
            Duration::from_secs(timeout_secs),
            Duration::from_secs(connect_secs),
        )
    }

    fn build_agent(timeout: Duration, connect_timeout: Duration) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(timeout)
            .timeout_connect(connect_timeout)
            .build()
    }

    /// Create a client with an explicit base URL.
    pub fn new(base_url: &str, api_key: &str, retry: RetryConfig) -> Self {
        let (timeout, connect_timeout) = Self::default_timeouts();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: api_key.to_string(),
            agent: Self::build_agent(timeout, connect_timeout),
            retry,
        }
    }

    /// Create a client with the base URL taken from `BALLCHASING_API_URL`
    /// (falling back to the public endpoint).
    pub fn from_env(api_key: &str, retry: RetryConfig) -> Self {
        let base = env_string_or("BALLCHASING_API_URL", DEFAULT_API_URL);
        Self::new(&base, api_key, retry)
    }

    fn get_json(&self, url: &str, params: &[(&str, &str)]) -> Result<Value, ApiError> {
        with_retries(self.retry, || {
            let mut req = self.agent.get(url).set("Authorization", &self.auth);
            for (k, v) in params {
                req = req.query(k, v);
            }
            let resp = req.call().map_err(ApiError::from_ureq)?;
            resp.into_json::<Value>()
                .map_err(|e| ApiError::Decode(e.to_string()))
        })
    }

    /// Fetch one page of the listing endpoint. With a continuation URL the
    /// query parameters are already baked in by the server; without one the
    /// request starts from `/replays` with `query` translated to parameters.
    pub fn list_page(&self, query: &ListQuery, cursor: Option<&str>) -> Result<ListPage, ApiError> {
        let value = match cursor {
            Some(url) => self.get_json(url, &[])?,
            None => {
                let url = format!("{}/replays", self.base_url);
                let mut params: Vec<(&str, &str)> = Vec::new();
                if let Some(p) = query.player_id.as_deref() {
                    params.push(("player-id", p));
                }
                if let Some(p) = query.playlist.as_deref() {
                    params.push(("playlist", p));
                }
                if let Some(d) = query.replay_date_after.as_deref() {
                    params.push(("replay-date-after", d));
                }
                self.get_json(&url, &params)?
            }
        };
        parse_list_page(value)
    }

    /// Connectivity check against the API root.
    pub fn ping(&self) -> Result<(), ApiError> {
        self.get_json(&self.base_url, &[]).map(|_| ())
    }

    /// Drive the listing endpoint to exhaustion for one query.
    pub fn collect_replays(&self, query: &ListQuery) -> Result<Collected, ApiError> {
        Paginator::new(|cursor| self.list_page(query, cursor)).collect_all()
    }
}

impl DetailSource for ApiClient {
    fn fetch_detail(&self, replay_id: &str) -> Result<ReplayRecord, ApiError> {
        let url = format!("{}/replays/{}", self.base_url, replay_id);
        let value = self.get_json(&url, &[])?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn parse_list_page(value: Value) -> Result<ListPage, ApiError> {
    let list = value
        .get("list")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::Decode("listing response missing `list`".into()))?;

    let mut replays = Vec::with_capacity(list.len());
    for item in list {
        match serde_json::from_value::<ReplayRecord>(item.clone()) {
            Ok(r) => replays.push(r),
            // An entry without an id cannot be stored; drop it, keep the page.
            Err(e) => warn!(error = %e, "skipping malformed listing entry"),
        }
    }

    Ok(ListPage {
        replays,
        next: value
            .get("next")
            .and_then(Value::as_str)
            .map(String::from),
        count: value.get("count").and_then(Value::as_u64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_list_page() {
        let page = parse_list_page(json!({
            "count": 117,
            "next": "https://example.test/api/replays?after=abc",
            "list": [
                { "id": "r1", "date": "2024-03-01T18:30:00+01:00" },
                { "id": "r2" }
            ]
        }))
        .unwrap();
        assert_eq!(page.replays.len(), 2);
        assert_eq!(page.replays[0].id, "r1");
        assert_eq!(page.count, Some(117));
        assert!(page.next.is_some());
    }

    #[test]
    fn test_parse_list_page_skips_entries_without_id() {
        let page = parse_list_page(json!({
            "list": [ { "id": "r1" }, { "date": "2024-03-01T18:30:00+01:00" } ]
        }))
        .unwrap();
        assert_eq!(page.replays.len(), 1);
        assert!(page.next.is_none());
        assert!(page.count.is_none());
    }

    #[test]
    fn test_parse_list_page_requires_list() {
        let err = parse_list_page(json!({ "error": "nope" })).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
