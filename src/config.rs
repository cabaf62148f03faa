//! Environment-driven settings for hosting controllers.
//!
//! | Variable             | Default           |
//! |----------------------|-------------------|
//! | `DATABASE_URL`       | `sqlite::memory:` |
//! | `HOST`               | `0.0.0.0`         |
//! | `PORT`               | `3000`            |
//! | `DB_MAX_CONNECTIONS` | `10`              |
//! | `DB_SQLX_LOGGING`    | `false`           |

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::{env, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub sqlx_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_connections: 10,
            sqlx_logging: false,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; unset or unparsable keys keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections),
            sqlx_logging: parse_or(&lookup, "DB_SQLX_LOGGING", defaults.sqlx_logging),
        }
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparsable setting");
            default
        }),
        None => default,
    }
}

/// Opens the database connection described by `settings`.
///
/// # Errors
///
/// Returns the driver error when the database cannot be reached.
pub async fn connect(settings: &Settings) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(settings.database_url.clone());
    options
        .max_connections(settings.max_connections)
        .sqlx_logging(settings.sqlx_logging);
    Database::connect(options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Settings::from_lookup(lookup(&[])), Settings::default());
    }

    #[test]
    fn test_reads_every_key() {
        let settings = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/library"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("DB_SQLX_LOGGING", "true"),
        ]));
        assert_eq!(settings.database_url, "postgres://localhost/library");
        assert_eq!(settings.bind_address(), "127.0.0.1:8080");
        assert_eq!(settings.max_connections, 4);
        assert!(settings.sqlx_logging);
    }

    #[test]
    fn test_unparsable_numbers_fall_back() {
        let settings = Settings::from_lookup(lookup(&[("PORT", "eighty")]));
        assert_eq!(settings.port, 3000);
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let db = connect(&Settings::default()).await;
        assert!(db.is_ok());
    }
}
