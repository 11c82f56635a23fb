// Configuration module entry point
// Loads ambient settings and holds the fixed listening address

mod state;
mod types;

pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig};

/// Host the server binds to, not configurable
pub const HOST: &str = "localhost";
/// Port the server binds to, not configurable
pub const PORT: u16 = 8000;

const DEFAULT_CONFIG_NAME: &str = "nocache";

impl Config {
    /// Load configuration from `nocache.{toml,json,yaml,...}` and `NOCACHE__*`
    /// environment variables. Both sources are optional.
    ///
    /// The file is looked up in the working directory, which is also the
    /// served root. A served site that contains its own `nocache.*` file is
    /// read as server configuration, and a malformed one fails startup.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_NAME)
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::build(config_path, None)
    }

    /// `env` replaces the process environment when given
    fn build(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("NOCACHE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// URL announced at startup
    pub fn public_url() -> String {
        format!("http://{HOST}:{PORT}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_sources() {
        let cfg = Config::load_from("definitely-not-a-config-file").unwrap();
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "simple");
        assert!(cfg.logging.access_log_file.is_none());
        assert!(cfg.performance.keep_alive);
        assert_eq!(cfg.performance.connection_timeout, 0);
        assert!(cfg.http.server_name.starts_with("NoCacheHTTP/"));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[logging]\naccess_log = false\naccess_log_format = \"json\"").unwrap();
        writeln!(file, "[performance]\nworkers = 2").unwrap();

        let base = dir.path().join("settings");
        let cfg = Config::load_from(base.to_str().unwrap()).unwrap();
        assert!(!cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "json");
        assert_eq!(cfg.performance.workers, Some(2));
        assert!(cfg.performance.keep_alive);
    }

    #[test]
    fn test_environment_overrides() {
        let env = [
            ("NOCACHE__LOGGING__ACCESS_LOG", "false"),
            ("NOCACHE__LOGGING__ACCESS_LOG_FORMAT", "json"),
            ("NOCACHE__PERFORMANCE__CONNECTION_TIMEOUT", "7"),
            ("OTHER__LOGGING__ACCESS_LOG", "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let cfg = Config::build("definitely-not-a-config-file", Some(env)).unwrap();
        assert!(!cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "json");
        assert_eq!(cfg.performance.connection_timeout, 7);
        assert!(cfg.performance.keep_alive);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nocache.json"), "{ not json").unwrap();

        let base = dir.path().join("nocache");
        assert!(Config::load_from(base.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_public_url() {
        assert_eq!(Config::public_url(), "http://localhost:8000");
    }
}
