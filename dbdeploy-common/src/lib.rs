//! Common types shared between dbdeploy-api and dbdeploy-cli

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported database engines
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    Mongodb,
    Mysql,
    Postgresql,
    Redis,
}

impl DbType {
    /// Every supported engine, in catalog order
    pub const ALL: [DbType; 4] = [
        DbType::Mongodb,
        DbType::Mysql,
        DbType::Postgresql,
        DbType::Redis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DbType::Mongodb => "mongodb",
            DbType::Mysql => "mysql",
            DbType::Postgresql => "postgresql",
            DbType::Redis => "redis",
        }
    }
}

impl Default for DbType {
    fn default() -> Self {
        DbType::Mysql
    }
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DbType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(DbType::Mongodb),
            "mysql" => Ok(DbType::Mysql),
            "postgresql" | "postgres" | "pg" => Ok(DbType::Postgresql),
            "redis" => Ok(DbType::Redis),
            _ => Err(Error::UnsupportedDatabase(s.to_string())),
        }
    }
}

/// Result of a successful deployment
///
/// `password` is only ever returned here; the server keeps no copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeployResponse {
    pub message: String,
    pub db_type: DbType,
    pub username: String,
    pub password: String,
    pub database: String,
    /// Node port assigned by the cluster, if it reported one
    pub port: Option<i32>,
}

/// Public view of a catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseInfo {
    pub db_type: DbType,
    pub image: String,
    pub username: String,
    pub database: String,
    pub port: i32,
    pub mount_path: String,
}

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabase(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_db_type() {
        assert_eq!("mysql".parse::<DbType>().unwrap(), DbType::Mysql);
        assert_eq!("MongoDB".parse::<DbType>().unwrap(), DbType::Mongodb);
        assert_eq!("mongo".parse::<DbType>().unwrap(), DbType::Mongodb);
        assert_eq!("postgres".parse::<DbType>().unwrap(), DbType::Postgresql);
        assert_eq!("pg".parse::<DbType>().unwrap(), DbType::Postgresql);
        assert_eq!(" redis ".parse::<DbType>().unwrap(), DbType::Redis);
    }

    #[test]
    fn test_parse_unsupported() {
        let err = "oracle".parse::<DbType>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedDatabase(ref v) if v == "oracle"));
        assert!("mariadb".parse::<DbType>().is_err());
        assert!("".parse::<DbType>().is_err());
    }

    #[test]
    fn test_display_matches_serde() {
        for db_type in DbType::ALL {
            let json = serde_json::to_string(&db_type).unwrap();
            assert_eq!(json, format!("\"{}\"", db_type));
            assert_eq!(db_type.to_string().parse::<DbType>().unwrap(), db_type);
        }
    }

    #[test]
    fn test_deploy_response_null_port() {
        let response = DeployResponse {
            message: "ok".to_string(),
            db_type: DbType::Redis,
            username: "default".to_string(),
            password: "secret".to_string(),
            database: "0".to_string(),
            port: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["port"].is_null());
        assert_eq!(json["db_type"], "redis");
    }
}
