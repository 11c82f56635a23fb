//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, static file
//! dispatch, then header finalization and access logging.

use crate::config::AppState;
use crate::handler::{path, static_files};
use crate::http::{self, FinalizeHeaders, NoCache};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{
    HeaderName, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH, REFERER, SERVER, USER_AGENT,
};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
#[derive(Debug)]
pub struct RequestContext<'a> {
    /// URL path, still percent-encoded, leading slashes collapsed
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    // The body is never read
    let (parts, _) = req.into_parts();
    let path = path::collapse_leading_slashes(parts.uri.path());
    let is_head = parts.method == Method::HEAD;

    let mut response = match check_http_method(&parts.method) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: &path,
                query: parts.uri.query(),
                is_head,
                if_modified_since: header_string(&parts, IF_MODIFIED_SINCE),
                has_if_none_match: parts.headers.contains_key(IF_NONE_MATCH),
            };
            static_files::send_head(&ctx, &state.root).await
        }
    };

    finalize_response(&mut response, &NoCache, &state.config.http.server_name);

    if state.access_log() {
        log_access(&parts, &response, &state, peer_addr, started);
    }

    Ok(response)
}

/// Only GET and HEAD are served; everything else gets 501
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        _ => {
            let message = format!("Unsupported method ('{method}')");
            logger::log_http_error(StatusCode::NOT_IMPLEMENTED.as_u16(), &message);
            Some(http::build_error_response(
                StatusCode::NOT_IMPLEMENTED,
                &message,
                false,
            ))
        }
    }
}

/// Last step before a response leaves the handler, applied to every status
pub fn finalize_response(
    response: &mut Response<Full<Bytes>>,
    hook: &impl FinalizeHeaders,
    server_name: &str,
) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(server_name) {
        headers.insert(SERVER, value);
    }
    hook.finalize_headers(headers);
}

fn log_access(
    req: &Parts,
    response: &Response<Full<Bytes>>,
    state: &AppState,
    peer_addr: SocketAddr,
    started: Instant,
) {
    let target = req
        .uri
        .path_and_query()
        .map_or_else(|| req.uri.path().to_string(), ToString::to_string);

    let mut entry =
        AccessLogEntry::new(peer_addr.ip().to_string(), req.method.to_string(), target);
    entry.http_version = version_label(req.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .filter(|&n| n > 0)
        .and_then(|n| usize::try_from(n).ok());
    entry.referer = header_string(req, REFERER);
    entry.user_agent = header_string(req, USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

fn header_string(req: &Parts, name: HeaderName) -> Option<String> {
    req.headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::http::cache::NO_CACHE_CONTROL;
    use hyper::header::{CACHE_CONTROL, EXPIRES, PRAGMA};

    fn state(root: &std::path::Path) -> Arc<AppState> {
        let mut config = Config::default();
        config.logging.access_log = false;
        Arc::new(AppState::new(config, root.to_path_buf()))
    }

    fn peer() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 50000))
    }

    async fn request(state: &Arc<AppState>, method: Method, uri: &str) -> Response<Full<Bytes>> {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        handle_request(req, Arc::clone(state), peer()).await.unwrap()
    }

    fn assert_no_cache(resp: &Response<Full<Bytes>>) {
        assert_eq!(resp.headers()[CACHE_CONTROL], NO_CACHE_CONTROL);
        assert_eq!(resp.headers()[PRAGMA], "no-cache");
        assert_eq!(resp.headers()[EXPIRES], "0");
    }

    #[tokio::test]
    async fn test_every_status_is_finalized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let state = state(dir.path());

        let cases = [
            (Method::GET, "/a.txt", 200_u16),
            (Method::GET, "/missing", 404),
            (Method::GET, "/sub", 301),
            (Method::GET, "/sub/", 200),
            (Method::HEAD, "/a.txt", 200),
            (Method::POST, "/a.txt", 501),
            (Method::DELETE, "/", 501),
        ];
        for (method, uri, status) in cases {
            let resp = request(&state, method, uri).await;
            assert_eq!(resp.status(), status, "{uri}");
            assert_no_cache(&resp);
            assert!(resp.headers()[SERVER].to_str().unwrap().starts_with("NoCacheHTTP/"));
        }
    }

    #[tokio::test]
    async fn test_double_slash_does_not_redirect_off_site() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("evil.example")).unwrap();
        let state = state(dir.path());

        let resp = request(&state, Method::GET, "//evil.example").await;
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()[hyper::header::LOCATION], "/evil.example/");
    }

    #[test]
    fn test_unsupported_method_message() {
        let resp = check_http_method(&Method::PUT).unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
        assert!(check_http_method(&Method::GET).is_none());
        assert!(check_http_method(&Method::HEAD).is_none());
    }
}
