//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_STORAGE_DIR: &str = "./data/attachments";
    pub const DEV_MAX_UPLOAD_SIZE: usize = 52_428_800; // 50MB per postback
    pub const DEV_PURGE_DELETED: bool = true;
    pub const DOWNLOAD_PATH: &str = "/attachments/download";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Fixed texts emitted by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub file_name: String,
    pub file_size: String,
    pub yes: String,
    pub no: String,
    /// Leading option of an optional-boolean select.
    pub unset_option: String,
    /// Leading option of an enumeration select.
    pub no_selection: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            file_name: "File name".to_string(),
            file_size: "File size".to_string(),
            yes: "Yes".to_string(),
            no: "No".to_string(),
            unset_option: "Not set".to_string(),
            no_selection: String::new(),
        }
    }
}

/// Settings passed into every render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Route of the download action; the record id is appended as a path segment.
    pub download_path: String,
    pub labels: Labels,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            download_path: defaults::DOWNLOAD_PATH.to_string(),
            labels: Labels::default(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory where uploaded attachments are stored
    pub storage_dir: PathBuf,
    /// Remove files of rows posted as deleted
    pub purge_deleted: bool,
    /// Maximum bytes accepted per postback (default: 50MB)
    pub max_upload_size: usize,
    /// Directory holding the compiled wasm controller (served under /pkg)
    pub client_dir: Option<PathBuf>,
    /// Renderer settings
    pub render: RenderSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `ATTACHMENTS_HOST`: Server host (default: 127.0.0.1)
    /// - `ATTACHMENTS_PORT`: Server port (default: 8080)
    /// - `ATTACHMENTS_STORAGE_DIR`: Storage directory (required in production)
    /// - `ATTACHMENTS_PURGE_DELETED`: Delete files of removed rows (default: true)
    /// - `ATTACHMENTS_MAX_UPLOAD_SIZE`: Max bytes per postback (default: 50MB)
    /// - `ATTACHMENTS_CLIENT_DIR`: wasm-pack output directory (optional)
    /// - `ATTACHMENTS_DOWNLOAD_PATH`: Download route (default: /attachments/download)
    /// - `ATTACHMENTS_LABEL_FILE_NAME`, `ATTACHMENTS_LABEL_FILE_SIZE`,
    ///   `ATTACHMENTS_LABEL_YES`, `ATTACHMENTS_LABEL_NO`,
    ///   `ATTACHMENTS_LABEL_UNSET`, `ATTACHMENTS_LABEL_NO_SELECTION`: label overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        // Parse environment - required
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("ATTACHMENTS_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("ATTACHMENTS_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("ATTACHMENTS_PORT must be a valid port number"))?;

        let storage_dir = PathBuf::from(
            env::var("ATTACHMENTS_STORAGE_DIR")
                .unwrap_or_else(|_| defaults::DEV_STORAGE_DIR.to_string()),
        );

        let purge_deleted = match env::var("ATTACHMENTS_PURGE_DELETED") {
            Ok(value) => parse_flag(&value).ok_or(ConfigError::InvalidValue(
                "ATTACHMENTS_PURGE_DELETED must be true or false",
            ))?,
            Err(_) => defaults::DEV_PURGE_DELETED,
        };

        let max_upload_size = env::var("ATTACHMENTS_MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| defaults::DEV_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue("ATTACHMENTS_MAX_UPLOAD_SIZE must be a valid number")
            })?;

        let client_dir = env::var("ATTACHMENTS_CLIENT_DIR").ok().map(PathBuf::from);

        let download_path = env::var("ATTACHMENTS_DOWNLOAD_PATH")
            .unwrap_or_else(|_| defaults::DOWNLOAD_PATH.to_string());
        if !download_path.starts_with('/') || download_path.ends_with('/') {
            return Err(ConfigError::InvalidValue(
                "ATTACHMENTS_DOWNLOAD_PATH must start with '/' and not end with '/'",
            ));
        }

        let mut labels = Labels::default();
        override_label(&mut labels.file_name, "ATTACHMENTS_LABEL_FILE_NAME");
        override_label(&mut labels.file_size, "ATTACHMENTS_LABEL_FILE_SIZE");
        override_label(&mut labels.yes, "ATTACHMENTS_LABEL_YES");
        override_label(&mut labels.no, "ATTACHMENTS_LABEL_NO");
        override_label(&mut labels.unset_option, "ATTACHMENTS_LABEL_UNSET");
        override_label(&mut labels.no_selection, "ATTACHMENTS_LABEL_NO_SELECTION");

        let config = Config {
            environment,
            host,
            port,
            storage_dir,
            purge_deleted,
            max_upload_size,
            client_dir,
            render: RenderSettings {
                download_path,
                labels,
            },
        };

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.storage_dir == PathBuf::from(defaults::DEV_STORAGE_DIR) {
            errors.push(format!(
                "ATTACHMENTS_STORAGE_DIR is using development default '{}'. Set a persistent directory.",
                defaults::DEV_STORAGE_DIR
            ));
        }

        if self.client_dir.is_none() {
            errors.push(
                "ATTACHMENTS_CLIENT_DIR is not set. The editor cannot add rows without the client."
                    .to_string(),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn override_label(label: &mut String, var: &str) {
    if let Ok(value) = env::var(var) {
        *label = value;
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
