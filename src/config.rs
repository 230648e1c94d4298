//! Application configuration management
//!
//! Process settings come from environment variables (optionally via `.env`).
//! The database location comes from the platform's shared `cms.conf`, see
//! [`crate::db::dsn`]. All configuration is loaded and validated at startup
//! before anything is served.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    CMS_CONFIG_ENV_VAR, DEFAULT_CMS_CONFIG_PATHS, DEFAULT_DATABASE_ACQUIRE_TIMEOUT_SECS,
    DEFAULT_DATABASE_CONNECT_ATTEMPTS, DEFAULT_DATABASE_MAX_CONNECTIONS,
    DEFAULT_DATABASE_RETRY_BACKOFF_MS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_STATIC_DIR,
};
use crate::db::dsn::ConfigParseError;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub context: ContextConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub log_format: LogFormat,
    pub static_dir: PathBuf,
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue("LOG_FORMAT".to_string())),
        }
    }
}

/// Database pool configuration
///
/// The connection target itself is not here: it is resolved from cms.conf.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    /// Bound applied to every startup query and pool acquisition
    pub acquire_timeout: Duration,
    /// Attempts before a startup database failure becomes fatal
    pub connect_attempts: u32,
    pub retry_backoff: Duration,
    pub run_migrations: bool,
}

/// Contest context policy
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Keep serving an empty description when the requested contest is absent
    pub serve_missing_contest: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            context: ContextConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse()?,
            static_dir: PathBuf::from(
                env::var("STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string()),
            ),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let connect_attempts =
            parse_var("DATABASE_CONNECT_ATTEMPTS", DEFAULT_DATABASE_CONNECT_ATTEMPTS)?;
        if connect_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "DATABASE_CONNECT_ATTEMPTS".to_string(),
            ));
        }

        Ok(Self {
            max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
            acquire_timeout: Duration::from_secs(parse_var(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                DEFAULT_DATABASE_ACQUIRE_TIMEOUT_SECS,
            )?),
            connect_attempts,
            retry_backoff: Duration::from_millis(parse_var(
                "DATABASE_RETRY_BACKOFF_MS",
                DEFAULT_DATABASE_RETRY_BACKOFF_MS,
            )?),
            run_migrations: parse_var("DATABASE_RUN_MIGRATIONS", false)?,
        })
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_DATABASE_ACQUIRE_TIMEOUT_SECS),
            connect_attempts: DEFAULT_DATABASE_CONNECT_ATTEMPTS,
            retry_backoff: Duration::from_millis(DEFAULT_DATABASE_RETRY_BACKOFF_MS),
            run_migrations: false,
        }
    }
}

impl ContextConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            serve_missing_contest: parse_var("CWS_SERVE_MISSING_CONTEST", false)?,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Ordered list of cms.conf locations to try.
///
/// An explicit path comes first, then `CMS_CONFIG`, then the system defaults.
pub fn cms_config_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }
    if let Ok(path) = env::var(CMS_CONFIG_ENV_VAR) {
        if !path.is_empty() {
            paths.push(PathBuf::from(path));
        }
    }
    paths.extend(DEFAULT_CMS_CONFIG_PATHS.iter().map(PathBuf::from));
    paths
}

/// Read the first readable cms.conf among `candidates`.
///
/// Returns the path that was used with its raw contents. Parsing is left to
/// the resolver so that syntax errors are reported against the chosen file.
pub fn read_cms_config(candidates: &[PathBuf]) -> Result<(PathBuf, String), ConfigParseError> {
    for path in candidates {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                tracing::info!(path = %path.display(), "Using configuration file");
                return Ok((path.clone(), raw));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Configuration file not found");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unable to read configuration file");
            }
        }
    }

    Err(ConfigParseError::NoConfigFile(
        candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    ))
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_database_defaults() {
        let db = DatabaseConfig::default();
        assert_eq!(db.max_connections, 10);
        assert_eq!(db.acquire_timeout, Duration::from_secs(5));
        assert_eq!(db.connect_attempts, 3);
        assert!(!db.run_migrations);
    }

    #[test]
    fn test_unset_variable_falls_back_to_default() {
        let attempts: u32 = parse_var("CWS_TEST_NEVER_SET_VARIABLE", 7).unwrap();
        assert_eq!(attempts, 7);
    }

    #[test]
    fn test_invalid_value_names_the_variable() {
        let err = "xml".parse::<LogFormat>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for environment variable: LOG_FORMAT"
        );
    }

    #[test]
    fn test_explicit_path_is_tried_first() {
        let explicit = PathBuf::from("/tmp/custom-cms.conf");
        let candidates = cms_config_candidates(Some(explicit.as_path()));

        assert_eq!(candidates[0], explicit);
        assert!(candidates.ends_with(&[
            PathBuf::from("/usr/local/etc/cms.conf"),
            PathBuf::from("/etc/cms.conf"),
        ]));
    }

    #[test]
    fn test_read_first_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.conf");
        let present = dir.path().join("cms.conf");
        let mut file = std::fs::File::create(&present).unwrap();
        write!(file, r#"{{"database": "postgresql://u:p@h:5432/db"}}"#).unwrap();

        let (used, raw) = read_cms_config(&[missing, present.clone()]).unwrap();
        assert_eq!(used, present);
        assert!(raw.contains("postgresql://"));
    }

    #[test]
    fn test_no_config_file_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_cms_config(&[dir.path().join("nope.conf")]);

        assert!(matches!(result, Err(ConfigParseError::NoConfigFile(_))));
    }
}
