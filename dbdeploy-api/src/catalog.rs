//! Static per-engine deployment profiles
//!
//! Each supported database engine maps to exactly one immutable
//! [`DatabaseProfile`]: which image to run, which port it listens on, where
//! its data lives, and how credentials are handed to the container.

use dbdeploy_common::{DatabaseInfo, DbType, Result};

/// Where the value of a credential environment variable comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvSource {
    Username,
    Password,
    Database,
    Literal(&'static str),
}

/// Environment variable injected into the database container
#[derive(Debug, Clone, Copy)]
pub struct CredentialEnv {
    pub name: &'static str,
    pub source: EnvSource,
}

/// Deployment parameters for one database engine
#[derive(Debug)]
pub struct DatabaseProfile {
    pub db_type: DbType,
    pub image: &'static str,
    pub username: &'static str,
    pub database: &'static str,
    pub port: i32,
    pub mount_path: &'static str,
    pub credential_env: &'static [CredentialEnv],
    /// Container args; `$(VAR)` references are expanded by the kubelet
    pub args: &'static [&'static str],
}

impl DatabaseProfile {
    /// Resolve the credential environment for a concrete password
    pub fn env_pairs(&self, password: &str) -> Vec<(String, String)> {
        self.credential_env
            .iter()
            .map(|env| {
                let value = match env.source {
                    EnvSource::Username => self.username,
                    EnvSource::Password => password,
                    EnvSource::Database => self.database,
                    EnvSource::Literal(v) => v,
                };
                (env.name.to_string(), value.to_string())
            })
            .collect()
    }

    pub fn info(&self) -> DatabaseInfo {
        DatabaseInfo {
            db_type: self.db_type,
            image: self.image.to_string(),
            username: self.username.to_string(),
            database: self.database.to_string(),
            port: self.port,
            mount_path: self.mount_path.to_string(),
        }
    }
}

static MONGODB: DatabaseProfile = DatabaseProfile {
    db_type: DbType::Mongodb,
    image: "mongo:7.0",
    username: "admin",
    database: "admin",
    port: 27017,
    mount_path: "/data/db",
    credential_env: &[
        CredentialEnv { name: "MONGO_INITDB_ROOT_USERNAME", source: EnvSource::Username },
        CredentialEnv { name: "MONGO_INITDB_ROOT_PASSWORD", source: EnvSource::Password },
        CredentialEnv { name: "MONGO_INITDB_DATABASE", source: EnvSource::Database },
    ],
    args: &[],
};

static MYSQL: DatabaseProfile = DatabaseProfile {
    db_type: DbType::Mysql,
    image: "mysql:5.7",
    username: "root",
    database: "mysql",
    port: 3306,
    mount_path: "/var/lib/mysql",
    credential_env: &[
        CredentialEnv { name: "MYSQL_ROOT_PASSWORD", source: EnvSource::Password },
    ],
    args: &[],
};

static POSTGRESQL: DatabaseProfile = DatabaseProfile {
    db_type: DbType::Postgresql,
    image: "postgres:16",
    username: "postgres",
    database: "postgres",
    port: 5432,
    mount_path: "/var/lib/postgresql/data",
    credential_env: &[
        CredentialEnv { name: "POSTGRES_USER", source: EnvSource::Username },
        CredentialEnv { name: "POSTGRES_PASSWORD", source: EnvSource::Password },
        CredentialEnv { name: "POSTGRES_DB", source: EnvSource::Database },
        // initdb refuses a non-empty directory and the volume root holds lost+found
        CredentialEnv {
            name: "PGDATA",
            source: EnvSource::Literal("/var/lib/postgresql/data/pgdata"),
        },
    ],
    args: &[],
};

static REDIS: DatabaseProfile = DatabaseProfile {
    db_type: DbType::Redis,
    image: "redis:7",
    username: "default",
    database: "0",
    port: 6379,
    mount_path: "/data",
    credential_env: &[
        CredentialEnv { name: "REDIS_PASSWORD", source: EnvSource::Password },
    ],
    args: &["redis-server", "--appendonly", "yes", "--requirepass", "$(REDIS_PASSWORD)"],
};

/// Profile for a parsed engine
pub fn profile(db_type: DbType) -> &'static DatabaseProfile {
    match db_type {
        DbType::Mongodb => &MONGODB,
        DbType::Mysql => &MYSQL,
        DbType::Postgresql => &POSTGRESQL,
        DbType::Redis => &REDIS,
    }
}

/// Parse an engine name and return its profile
pub fn lookup(name: &str) -> Result<&'static DatabaseProfile> {
    let db_type = name.parse::<DbType>()?;
    Ok(profile(db_type))
}

/// Public catalog listing
pub fn list() -> Vec<DatabaseInfo> {
    DbType::ALL.iter().map(|t| profile(*t).info()).collect()
}
