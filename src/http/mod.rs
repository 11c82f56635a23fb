//! HTTP protocol layer module
//!
//! Response builders, MIME detection and cache-control helpers, decoupled
//! from the file serving logic.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cache::{FinalizeHeaders, NoCache};
pub use response::{
    build_304_response, build_error_response, build_file_response, build_html_response,
    build_redirect_response, escape_html,
};
