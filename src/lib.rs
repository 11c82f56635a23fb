//! Local development file server that forbids caching.
//!
//! Serves the working directory on `http://localhost:8000` and marks every
//! response with `Cache-Control: no-store, no-cache, must-revalidate, max-age=0`,
//! `Pragma: no-cache` and `Expires: 0`.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
