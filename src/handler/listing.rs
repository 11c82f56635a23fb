//! Directory listing generation
//!
//! Renders an HTML index for directories that have no index page.

use crate::handler::router::RequestContext;
use crate::http::{self, escape_html};
use crate::logger;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use http_body_util::Full;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::Path;
use tokio::fs;

/// Characters left unescaped in listing links: unreserved plus `/`
const LINK_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    fn href(&self) -> String {
        let link = if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        };
        utf8_percent_encode(&link, LINK_ESCAPE).to_string()
    }

    /// Symlinks are marked with `@` instead of the directory slash
    fn label(&self) -> String {
        let suffix = if self.is_symlink {
            "@"
        } else if self.is_dir {
            "/"
        } else {
            ""
        };
        escape_html(&format!("{}{suffix}", self.name))
    }
}

const LIST_DENIED: &str = "No permission to list directory";

/// Serve the listing of `dir`, or 404 when it cannot be read
pub async fn list_directory(ctx: &RequestContext<'_>, dir: &Path) -> Response<Full<Bytes>> {
    let mut entries = match read_entries(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            logger::log_warning(&format!("Cannot list directory '{}': {e}", dir.display()));
            logger::log_http_error(StatusCode::NOT_FOUND.as_u16(), LIST_DENIED);
            return http::build_error_response(StatusCode::NOT_FOUND, LIST_DENIED, ctx.is_head);
        }
    };
    sort_entries(&mut entries);

    let html = render_listing(ctx.path, &entries);
    http::build_html_response(html, ctx.is_head)
}

async fn read_entries(dir: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let is_symlink = entry.file_type().await.is_ok_and(|t| t.is_symlink());
        // Follows symlinks, so a link to a directory is listed as one
        let is_dir = fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    Ok(entries)
}

/// Case-insensitive ordering by name
pub fn sort_entries(entries: &mut [ListingEntry]) {
    entries.sort_by_cached_key(|e| e.name.to_lowercase());
}

/// Render the listing page for `request_path` (raw URL path, percent-encoded)
pub fn render_listing(request_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!(
        "Directory listing for {}",
        escape_html(&super::path::decode(request_path))
    );

    let mut lines = vec![
        "<!DOCTYPE HTML>".to_string(),
        "<html lang=\"en\">".to_string(),
        "<head>".to_string(),
        "<meta charset=\"utf-8\">".to_string(),
        "<style type=\"text/css\">\n:root {\ncolor-scheme: light dark;\n}\n</style>".to_string(),
        format!("<title>{title}</title>\n</head>"),
        format!("<body>\n<h1>{title}</h1>"),
        "<hr>\n<ul>".to_string(),
    ];
    lines.extend(
        entries
            .iter()
            .map(|e| format!("<li><a href=\"{}\">{}</a></li>", e.href(), e.label())),
    );
    lines.push("</ul>\n<hr>\n</body>\n</html>\n".to_string());

    lines.join("\n")
}
