// Application state module
// Immutable per-process state shared by every connection

use std::path::PathBuf;

use super::types::Config;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Directory every request path is resolved against
    pub root: PathBuf,
}

impl AppState {
    pub const fn new(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }

    /// Build state serving the process working directory
    pub fn from_current_dir(config: Config) -> std::io::Result<Self> {
        Ok(Self::new(config, std::env::current_dir()?))
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
