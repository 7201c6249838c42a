//! Configuration management for dbdeploy API
//!
//! Settings are loaded from:
//! 1. Environment variables (highest priority)
//! 2. Configuration file (TOML format)
//! 3. Default values (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::logging::{LogRotation, LoggingConfig};
use crate::password::{DEFAULT_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::validation::validate_namespace;

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Cluster connection and target namespace
    pub kubernetes: KubernetesConfig,
    /// Persistent volume settings
    pub storage: StorageConfig,
    /// Generated credential settings
    pub credentials: CredentialsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Kubernetes configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesConfig {
    /// Namespace workloads are created in
    pub namespace: String,
    /// Explicit kubeconfig path; in-cluster then ~/.kube/config when unset
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context to use
    pub context: Option<String>,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Requested volume size (Kubernetes quantity, e.g. "1Gi")
    pub size: String,
    /// Storage class; cluster default when unset
    pub storage_class: Option<String>,
}

/// Credential configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Length of generated passwords
    pub password_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            kubeconfig: None,
            context: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            size: "1Gi".to_string(),
            storage_class: None,
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            password_length: DEFAULT_PASSWORD_LENGTH,
        }
    }
}

impl DeployConfig {
    /// Load configuration from environment variables and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.clone(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            // Environment variable override
            std::env::var("DBDEPLOY_CONFIG").ok().map(PathBuf::from),
            // Standard locations
            Some(PathBuf::from("/etc/dbdeploy/config.toml")),
            Some(PathBuf::from("./config.toml")),
            Some(PathBuf::from("./dbdeploy.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply environment variable overrides read through `var`
    pub fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = var("DBDEPLOY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("DBDEPLOY_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        // Kubernetes
        if let Some(namespace) = var("DBDEPLOY_NAMESPACE") {
            self.kubernetes.namespace = namespace;
        }
        if let Some(path) = var("DBDEPLOY_KUBECONFIG") {
            self.kubernetes.kubeconfig = Some(PathBuf::from(path));
        }
        if let Some(context) = var("DBDEPLOY_KUBE_CONTEXT") {
            self.kubernetes.context = Some(context);
        }

        // Storage
        if let Some(size) = var("DBDEPLOY_STORAGE_SIZE") {
            self.storage.size = size;
        }
        if let Some(class) = var("DBDEPLOY_STORAGE_CLASS") {
            self.storage.storage_class = Some(class);
        }

        // Credentials
        if let Some(len) = var("DBDEPLOY_PASSWORD_LENGTH").and_then(|l| l.parse().ok()) {
            self.credentials.password_length = len;
        }

        // Logging
        if let Some(level) = var("DBDEPLOY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(path) = var("DBDEPLOY_LOG_DIR") {
            self.logging.log_dir = PathBuf::from(path);
        }
        if let Some(enabled) = var("DBDEPLOY_FILE_LOGGING") {
            self.logging.file_logging_enabled = enabled.parse().unwrap_or(false);
        }
        if let Some(rotation) = var("DBDEPLOY_LOG_ROTATION") {
            match rotation.to_lowercase().as_str() {
                "hourly" => self.logging.rotation = LogRotation::Hourly,
                "daily" => self.logging.rotation = LogRotation::Daily,
                "never" => self.logging.rotation = LogRotation::Never,
                _ => {}
            }
        }
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Port cannot be 0".to_string()));
        }

        validate_namespace(&self.kubernetes.namespace)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.storage.size.trim().is_empty() {
            return Err(ConfigError::Validation("Storage size cannot be empty".to_string()));
        }

        let len = self.credentials.password_length;
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
            return Err(ConfigError::Validation(format!(
                "Password length must be between {} and {}",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            )));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file {0:?}: {1}")]
    FileRead(PathBuf, String),
    /// Failed to parse configuration
    #[error("Failed to parse config: {0}")]
    Parse(String),
    /// Configuration validation failed
    #[error("Config validation failed: {0}")]
    Validation(String),
}
