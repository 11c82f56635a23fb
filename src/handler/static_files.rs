//! Static file serving module
//!
//! Resolves the request path under the served root and produces the file,
//! an index page, a directory listing, a redirect or an error response.

use crate::handler::router::RequestContext;
use crate::handler::{listing, path};
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;

/// Index pages tried, in order, when a directory is requested
pub const INDEX_PAGES: [&str; 2] = ["index.html", "index.htm"];

/// Produce the response for a GET or HEAD request
pub async fn send_head(ctx: &RequestContext<'_>, root: &Path) -> Response<Full<Bytes>> {
    let fs_path = path::translate_path(root, ctx.path);

    if is_dir(&fs_path).await {
        if !ctx.path.ends_with('/') {
            return http::build_redirect_response(&redirect_target(ctx));
        }

        for index in INDEX_PAGES {
            let candidate = fs_path.join(index);
            if is_file(&candidate).await {
                return serve_file(ctx, &candidate).await;
            }
        }

        return listing::list_directory(ctx, &fs_path).await;
    }

    if ctx.path.ends_with('/') {
        return not_found(ctx);
    }

    serve_file(ctx, &fs_path).await
}

/// Same path with a trailing slash, query preserved
fn redirect_target(ctx: &RequestContext<'_>) -> String {
    match ctx.query {
        Some(query) => format!("{}/?{query}", ctx.path),
        None => format!("{}/", ctx.path),
    }
}

async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<Full<Bytes>> {
    let content_type = mime::content_type_for(file_path);

    let Ok(mut file) = fs::File::open(file_path).await else {
        return not_found(ctx);
    };

    let metadata = match file.metadata().await {
        Ok(m) if m.is_file() => m,
        Ok(_) => return not_found(ctx),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to stat file '{}': {e}",
                file_path.display()
            ));
            return not_found(ctx);
        }
    };

    let modified = metadata.modified().ok();
    if let Some(modified) = modified {
        if cache::not_modified_since(
            ctx.if_modified_since.as_deref(),
            ctx.has_if_none_match,
            modified,
        ) {
            return http::build_304_response();
        }
    }

    let body = if ctx.is_head {
        Bytes::new()
    } else {
        let mut content = Vec::new();
        if let Err(e) = file.read_to_end(&mut content).await {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return not_found(ctx);
        }
        Bytes::from(content)
    };

    // GET reports what was actually read; HEAD reports the size on disk
    let content_length = if ctx.is_head {
        metadata.len()
    } else {
        body.len() as u64
    };

    let last_modified = modified.map(cache::http_date);
    http::build_file_response(body, content_length, content_type, last_modified.as_deref())
}

fn not_found(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    const MESSAGE: &str = "File not found";
    logger::log_http_error(StatusCode::NOT_FOUND.as_u16(), MESSAGE);
    http::build_error_response(StatusCode::NOT_FOUND, MESSAGE, ctx.is_head)
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION};

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            query: None,
            is_head: false,
            if_modified_since: None,
            has_if_none_match: false,
        }
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.htm"), "docs").unwrap();
        std::fs::create_dir(dir.path().join("empty")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_serves_file() {
        let dir = site();
        let resp = send_head(&ctx("/notes.txt"), dir.path()).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "5");
        assert!(resp.headers().contains_key(LAST_MODIFIED));
        assert_eq!(body_string(resp).await, "hello");
    }

    #[tokio::test]
    async fn test_index_pages() {
        let dir = site();
        let resp = send_head(&ctx("/"), dir.path()).await;
        assert_eq!(body_string(resp).await, "<h1>home</h1>");

        let resp = send_head(&ctx("/docs/"), dir.path()).await;
        assert_eq!(body_string(resp).await, "docs");
    }

    #[tokio::test]
    async fn test_directory_without_slash_redirects() {
        let dir = site();
        let mut request = ctx("/docs");
        request.query = Some("v=1");
        let resp = send_head(&request, dir.path()).await;
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()[LOCATION], "/docs/?v=1");
    }

    #[tokio::test]
    async fn test_listing_when_no_index() {
        let dir = site();
        std::fs::write(dir.path().join("empty/data.json"), "{}").unwrap();
        let resp = send_head(&ctx("/empty/"), dir.path()).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        let body = body_string(resp).await;
        assert!(body.contains("Directory listing for /empty/"));
        assert!(body.contains("<a href=\"data.json\">data.json</a>"));
    }

    #[tokio::test]
    async fn test_missing_and_trailing_slash_on_file() {
        let dir = site();
        assert_eq!(send_head(&ctx("/nope.txt"), dir.path()).await.status(), 404);
        assert_eq!(send_head(&ctx("/notes.txt/"), dir.path()).await.status(), 404);
    }

    #[tokio::test]
    async fn test_head_keeps_length_without_body() {
        let dir = site();
        let mut request = ctx("/notes.txt");
        request.is_head = true;
        let resp = send_head(&request, dir.path()).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "5");
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_if_modified_since() {
        let dir = site();
        let mut request = ctx("/notes.txt");
        request.if_modified_since = Some("Fri, 01 Jan 2100 00:00:00 GMT".to_string());
        assert_eq!(send_head(&request, dir.path()).await.status(), 304);

        request.has_if_none_match = true;
        assert_eq!(send_head(&request, dir.path()).await.status(), 200);

        request.has_if_none_match = false;
        request.if_modified_since = Some("Thu, 01 Jan 1970 00:00:00 GMT".to_string());
        assert_eq!(send_head(&request, dir.path()).await.status(), 200);
    }
}
