//! Server configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! config file, then `SNIPCAT_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use snipcat_core::logging_facility::Profile;

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "SNIPCAT_CONFIG";

/// Config file read when `SNIPCAT_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "snipcat.toml";

/// Prefix of the environment overrides, e.g. `SNIPCAT_BIND`
pub const ENV_PREFIX: &str = "SNIPCAT";

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_DATABASE: &str = ".snipcat/catalog.db";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
    /// SQLite catalog path, created on first start
    pub database: PathBuf,
    /// `development` or `production`
    pub log_profile: String,
    /// Import the bundled seed when the catalog is empty
    pub seed_on_start: bool,
}

impl ServerConfig {
    /// Load configuration for the running process
    ///
    /// A `.env` file in the working directory is applied to the environment
    /// first, if present.
    ///
    /// # Errors
    /// Returns `ConfigError` when a source is malformed or a value has the
    /// wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::load_from(Path::new(&path), Environment::with_prefix(ENV_PREFIX))
    }

    /// Load from an explicit file (optional) and environment source
    ///
    /// # Errors
    /// Returns `ConfigError` when a source is malformed or a value has the
    /// wrong type.
    pub fn load_from(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind", DEFAULT_BIND)?
            .set_default("database", DEFAULT_DATABASE)?
            .set_default("log_profile", "development")?
            .set_default("seed_on_start", true)?
            .add_source(File::from(path).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// The logging profile named by `log_profile`
    ///
    /// # Errors
    /// Returns a message naming the unknown profile.
    pub fn profile(&self) -> Result<Profile, String> {
        self.log_profile.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = ServerConfig::load_from(Path::new("/nonexistent/snipcat.toml"), env(&[]))
            .unwrap();

        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.database, PathBuf::from(DEFAULT_DATABASE));
        assert!(config.seed_on_start);
        assert_eq!(config.profile(), Ok(Profile::Development));
    }

    #[test]
    fn test_file_then_env_override() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "bind = \"0.0.0.0:8080\"\nseed_on_start = false").unwrap();
        file.flush().unwrap();

        let config = ServerConfig::load_from(
            file.path(),
            env(&[("SNIPCAT_BIND", "127.0.0.1:9000"), ("SNIPCAT_LOG_PROFILE", "production")]),
        )
        .unwrap();

        assert_eq!(config.bind, "127.0.0.1:9000");
        assert!(!config.seed_on_start);
        assert_eq!(config.profile(), Ok(Profile::Production));
    }

    #[test]
    fn test_unknown_profile() {
        let config = ServerConfig::load_from(
            Path::new("/nonexistent/snipcat.toml"),
            env(&[("SNIPCAT_LOG_PROFILE", "chatty")]),
        )
        .unwrap();
        assert!(config.profile().is_err());
    }
}
