use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite://ims.db?mode=rwc";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4200";
const CONFIG_DIR: &str = "config";

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Server host address
    pub host: String,

    /// Server port (1024-65535)
    #[serde(default = "default_port")]
    #[validate(range(min = 1024))]
    pub port: u16,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default = "default_true_bool")]
    pub auto_migrate: bool,

    /// CORS: the single front-end origin allowed to call the API
    #[serde(default = "default_cors_allowed_origin")]
    #[validate(custom = "validate_cors_origin")]
    pub cors_allowed_origin: String,

    /// Scheme and authority prepended to hypermedia links, e.g. `https://ims.example.com`.
    /// Links are host-relative when unset.
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB timeouts (seconds)
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    /// Creates a new configuration
    pub fn new(database_url: String, host: String, port: u16, environment: String) -> Self {
        Self {
            database_url,
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: default_true_bool(),
            cors_allowed_origin: default_cors_allowed_origin(),
            public_base_url: None,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            db_idle_timeout_secs: default_db_idle_timeout_secs(),
            db_acquire_timeout_secs: default_db_acquire_timeout_secs(),
        }
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Root of every hypermedia link, without a trailing slash.
    pub fn link_base(&self) -> String {
        let base = self
            .public_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or("");
        format!("{}/api", base)
    }

    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.db_max_connections == 0 {
            let mut err = ValidationError::new("db_max_connections_zero");
            err.message = Some("APP__DB_MAX_CONNECTIONS must be at least 1".into());
            errors.add("db_max_connections", err);
        }

        if self.db_min_connections > self.db_max_connections {
            let mut err = ValidationError::new("db_pool_bounds");
            err.message = Some(
                "APP__DB_MIN_CONNECTIONS must not exceed APP__DB_MAX_CONNECTIONS".into(),
            );
            errors.add("db_min_connections", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_cors_allowed_origin() -> String {
    DEFAULT_CORS_ORIGIN.to_string()
}

fn default_true_bool() -> bool {
    true
}

fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}
fn default_db_acquire_timeout_secs() -> u64 {
    30
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_cors_origin(origin: &str) -> Result<(), ValidationError> {
    if !origin.trim().is_empty() && axum::http::HeaderValue::from_str(origin).is_ok() {
        Ok(())
    } else {
        let mut err = ValidationError::new("cors_allowed_origin");
        err.message = Some("Must be a non-empty origin such as http://localhost:4200".into());
        Err(err)
    }
}

pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("ims_server={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::new(filter_directive);
    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    load_config_from(Path::new(CONFIG_DIR), &run_env)
}

/// Same as [`load_config`] but reads profile files from `config_dir`.
pub fn load_config_from(config_dir: &Path, run_env: &str) -> Result<AppConfig, AppConfigError> {
    info!("Loading configuration for environment: {}", run_env);

    if !config_dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            config_dir.display()
        );
    }

    let config = Config::builder()
        .set_default("database_url", DEFAULT_DATABASE_URL)?
        .set_default("host", "0.0.0.0")?
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("environment", run_env)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::from(config_dir.join("default")).required(false))
        .add_source(File::from(config_dir.join(run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::TempDir;

    fn base_config() -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "test".into(),
        )
    }

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).unwrap();
        }
        temp_dir
    }

    #[test]
    fn new_config_passes_validation() {
        let cfg = base_config();
        assert!(cfg.validate().is_ok());
        assert!(cfg.validate_additional_constraints().is_ok());
        assert!(cfg.auto_migrate);
        assert_eq!(cfg.cors_allowed_origin, "http://localhost:4200");
    }

    #[test]
    fn rejects_privileged_port_and_unknown_log_level() {
        let mut cfg = base_config();
        cfg.port = 80;
        cfg.log_level = "verbose".into();

        let errors = cfg.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("port"));
        assert!(fields.contains_key("log_level"));
    }

    #[test]
    fn rejects_blank_cors_origin() {
        let mut cfg = base_config();
        cfg.cors_allowed_origin = "  ".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_min_connections_above_max() {
        let mut cfg = base_config();
        cfg.db_min_connections = 5;
        cfg.db_max_connections = 2;
        let errors = cfg.validate_additional_constraints().unwrap_err();
        assert!(errors.field_errors().contains_key("db_min_connections"));
    }

    #[test]
    fn link_base_defaults_to_relative_api_root() {
        let mut cfg = base_config();
        assert_eq!(cfg.link_base(), "/api");

        cfg.public_base_url = Some("https://ims.example.com/".into());
        assert_eq!(cfg.link_base(), "https://ims.example.com/api");
    }

    #[test]
    fn profile_file_overrides_default_file() {
        let dir = setup_config_dir(&[
            (
                "default.toml",
                r#"
                database_url = "postgres://localhost/ims"
                port = 9000
                log_level = "debug"
                "#,
            ),
            (
                "staging.toml",
                r#"
                port = 9100
                public_base_url = "https://staging.ims.local"
                "#,
            ),
        ]);

        let cfg = load_config_from(dir.path(), "staging").unwrap();
        assert_eq!(cfg.database_url, "postgres://localhost/ims");
        assert_eq!(cfg.port, 9100);
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.environment, "staging");
        assert_eq!(
            cfg.public_base_url.as_deref(),
            Some("https://staging.ims.local")
        );
    }

    #[test]
    fn missing_directory_uses_builtin_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = load_config_from(&dir.path().join("absent"), "development").unwrap();
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.db_max_connections, 10);
    }

    #[test]
    fn invalid_file_values_fail_validation() {
        let dir = setup_config_dir(&[("default.toml", "port = 80\nlog_level = \"loud\"\n")]);
        let result = load_config_from(dir.path(), "development");
        assert_matches!(result, Err(AppConfigError::Validation(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = setup_config_dir(&[("default.toml", "redis_url = \"redis://localhost\"\n")]);
        let result = load_config_from(dir.path(), "development");
        assert_matches!(result, Err(AppConfigError::Load(_)));
    }
}
