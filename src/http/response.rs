//! HTTP response building module
//!
//! Builders for the responses the static file handler produces. None of them
//! set caching headers; those are applied afterwards by the finalization hook.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION};
use hyper::{Response, StatusCode};

const ERROR_CONTENT_TYPE: &str = "text/html;charset=utf-8";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Build 200 response for a file
///
/// `content_length` is sent even when `body` is empty for HEAD requests.
pub fn build_file_response(
    body: Bytes,
    content_length: u64,
    content_type: &str,
    last_modified: Option<&str>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length);

    if let Some(last_modified) = last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, HTML_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect response
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .header(CONTENT_LENGTH, 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build an HTML error response and close the connection afterwards
///
/// Responses that must not carry a body (1xx, 204, 205, 304) and HEAD
/// requests get headers only.
pub fn build_error_response(
    status: StatusCode,
    message: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(status)
        .header(CONNECTION, "close");

    let has_body = status.as_u16() >= 200
        && !matches!(
            status,
            StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT | StatusCode::NOT_MODIFIED
        );

    let result = if has_body {
        let page = render_error_page(status, message);
        let content_length = page.len();
        let body = if is_head {
            Bytes::new()
        } else {
            Bytes::from(page)
        };
        builder
            .header(CONTENT_TYPE, ERROR_CONTENT_TYPE)
            .header(CONTENT_LENGTH, content_length)
            .body(Full::new(body))
    } else {
        builder.body(Full::new(Bytes::new()))
    };

    result.unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        Response::new(Full::new(Bytes::new()))
    })
}

fn render_error_page(status: StatusCode, message: &str) -> String {
    let code = status.as_u16();
    format!(
        r#"<!DOCTYPE HTML>
<html lang="en">
    <head>
        <meta charset="utf-8">
        <title>Error response</title>
    </head>
    <body>
        <h1>Error response</h1>
        <p>Error code: {code}</p>
        <p>Message: {message}.</p>
        <p>Error code explanation: {code} - {explain}.</p>
    </body>
</html>
"#,
        message = escape_html(message),
        explain = escape_html(explain(status)),
    )
}

/// Long-form description of a status code for error pages
fn explain(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Bad request syntax or unsupported method",
        StatusCode::FORBIDDEN => "Request forbidden -- authorization will not help",
        StatusCode::NOT_FOUND => "Nothing matches the given URI",
        StatusCode::METHOD_NOT_ALLOWED => "Specified method is invalid for this resource",
        StatusCode::INTERNAL_SERVER_ERROR => "Server got itself in trouble",
        StatusCode::NOT_IMPLEMENTED => "Server does not support this operation",
        other => other.canonical_reason().unwrap_or("Unknown status"),
    }
}

/// Escape `&`, `<` and `>` for HTML text content
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_error_page() {
        let resp = build_error_response(StatusCode::NOT_FOUND, "File not found", false);
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()[CONNECTION], "close");
        assert_eq!(resp.headers()[CONTENT_TYPE], ERROR_CONTENT_TYPE);

        let length: usize = resp.headers()[CONTENT_LENGTH].to_str().unwrap().parse().unwrap();
        let body = body_string(resp).await;
        assert_eq!(body.len(), length);
        assert!(body.contains("<p>Error code: 404</p>"));
        assert!(body.contains("<p>Message: File not found.</p>"));
        assert!(body.contains("404 - Nothing matches the given URI."));
    }

    #[tokio::test]
    async fn test_error_page_head_has_no_body() {
        let resp = build_error_response(StatusCode::NOT_IMPLEMENTED, "Unsupported method", true);
        assert!(resp.headers().contains_key(CONTENT_LENGTH));
        assert!(body_string(resp).await.is_empty());
    }

    #[test]
    fn test_error_without_body() {
        let resp = build_error_response(StatusCode::NOT_MODIFIED, "Not Modified", false);
        assert!(!resp.headers().contains_key(CONTENT_TYPE));
        assert!(!resp.headers().contains_key(CONTENT_LENGTH));
    }

    #[test]
    fn test_error_message_is_escaped() {
        let page = render_error_page(StatusCode::NOT_IMPLEMENTED, "Unsupported method ('<X>')");
        assert!(page.contains("Unsupported method ('&lt;X&gt;')"));
    }

    #[test]
    fn test_redirect() {
        let resp = build_redirect_response("/docs/?page=2");
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()[LOCATION], "/docs/?page=2");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "0");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & <b>\"c\""), "a &amp; &lt;b&gt;\"c\"");
    }
}
