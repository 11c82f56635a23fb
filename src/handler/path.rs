//! Request path resolution
//!
//! Maps a request target onto the served root. The result never leaves the
//! root: `..` pops a previously kept segment and is dropped at the top.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Collapse a leading run of slashes into one, so `//host/x` cannot be
/// echoed back as a protocol-relative redirect
pub fn collapse_leading_slashes(path: &str) -> Cow<'_, str> {
    if path.starts_with("//") {
        Cow::Owned(format!("/{}", path.trim_start_matches('/')))
    } else {
        Cow::Borrowed(path)
    }
}

/// Strip query string and fragment from a request target
pub fn strip_query_and_fragment(target: &str) -> &str {
    let end = target.find(&['?', '#'][..]).unwrap_or(target.len());
    &target[..end]
}

/// Percent-decode a URL path, replacing invalid UTF-8 sequences
pub fn decode(path: &str) -> Cow<'_, str> {
    percent_decode_str(path).decode_utf8_lossy()
}

/// Translate a request target into a filesystem path under `root`
pub fn translate_path(root: &Path, target: &str) -> PathBuf {
    let decoded = decode(strip_query_and_fragment(target));

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if is_plain_segment(s) => segments.push(s),
            _ => {}
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(segments);
    resolved
}

/// A segment is usable only if the platform sees it as exactly one normal
/// component (rejects drive prefixes and `\` separators on Windows)
fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
