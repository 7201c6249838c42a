///! CLI configuration management

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub default_server: String,
    pub default_output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_server: "http://localhost:8000".to_string(),
            default_output: "table".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&contents)?;

        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(".config/dbdeploy/cli.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("cli.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_server = \"http://db.internal:8000\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.default_server, "http://db.internal:8000");
        assert_eq!(config.default_output, "table");
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_server = [").unwrap();

        assert!(Config::load_from(file.path()).is_err());
    }
}
