//! HTTP cache control module
//!
//! Provides the header-finalization hook that disables caching, plus the
//! `Last-Modified` / `If-Modified-Since` date handling used by file responses.

use chrono::{DateTime, Utc};
use hyper::header::{HeaderMap, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use std::time::SystemTime;

pub const NO_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate, max-age=0";
pub const NO_CACHE_PRAGMA: &str = "no-cache";
pub const NO_CACHE_EXPIRES: &str = "0";

/// Hook invoked on every outgoing header set right before the response is sent
pub trait FinalizeHeaders {
    fn finalize_headers(&self, headers: &mut HeaderMap);
}

/// Instructs clients and intermediaries never to store or reuse a response
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl FinalizeHeaders for NoCache {
    fn finalize_headers(&self, headers: &mut HeaderMap) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE_CONTROL));
        headers.insert(PRAGMA, HeaderValue::from_static(NO_CACHE_PRAGMA));
        headers.insert(EXPIRES, HeaderValue::from_static(NO_CACHE_EXPIRES));
    }
}

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn http_date(time: SystemTime) -> String {
    let time: DateTime<Utc> = time.into();
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Decide whether a conditional GET can be answered with 304
///
/// Only `If-Modified-Since` is honoured, and only when `If-None-Match` is
/// absent. Dates that fail to parse or carry a non-UTC offset are ignored.
pub fn not_modified_since(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };

    let modified: DateTime<Utc> = modified.into();
    modified.timestamp() <= since.timestamp()
}

fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc2822(value.trim()).ok()?;
    if parsed.offset().local_minus_utc() != 0 {
        return None;
    }
    Some(parsed.with_timezone(&Utc))
}
