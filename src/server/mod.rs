// Server module entry point
// Binding, the accept loop and per-connection serving

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::{create_listener, resolve_bind_addr};
pub use server_loop::{serve, serve_until};
