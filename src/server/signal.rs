// Signal handling module
//
// Supported signals:
// - SIGINT:  stop (Ctrl+C)
// - SIGTERM: stop
//
// Neither drains in-flight requests.

use crate::logger;

/// Resolve once a termination signal arrives, yielding its description
#[cfg(unix)]
pub async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            interrupt().await;
            return "SIGINT received";
        }
    };

    tokio::select! {
        () = interrupt() => "SIGINT received",
        _ = sigterm.recv() => "SIGTERM received",
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() -> &'static str {
    interrupt().await;
    "Ctrl+C received"
}

/// Wait for Ctrl+C; never resolves if the handler cannot be installed
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_warning(&format!("Failed to register Ctrl+C handler: {e}"));
        std::future::pending::<()>().await;
    }
}
