//! Database connection settings read from the environment.

use std::env;
use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: PgSslMode,
    pub run_migrations: bool,
}

impl DbConfig {
    /// Reads `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, plus
    /// the optional `DB_SSLMODE` and `DB_MIGRATE`.
    pub fn new_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let host = var("DB_HOST").unwrap_or_else(|| "localhost".to_string());
        let port = match var("DB_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "DB_PORT",
                value: raw,
            })?,
            None => 5432,
        };
        let user = var("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?;
        let password = var("DB_PASSWORD").unwrap_or_default();
        let database = var("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?;
        let ssl_mode = match var("DB_SSLMODE") {
            Some(raw) => PgSslMode::from_str(&raw).map_err(|_| ConfigError::Invalid {
                name: "DB_SSLMODE",
                value: raw,
            })?,
            None => PgSslMode::Disable,
        };
        let run_migrations = matches!(var("DB_MIGRATE").as_deref(), Some("1") | Some("true"));

        Ok(Self {
            host,
            port,
            user,
            password,
            database,
            ssl_mode,
            run_migrations,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(self.ssl_mode)
    }
}
