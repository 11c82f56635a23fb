//! Request handler module
//!
//! Serves the working directory the way a stock static file handler does and
//! marks every response as non-cacheable before it is sent.

pub mod listing;
pub mod path;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::{finalize_response, handle_request, RequestContext};
