//! Process configuration read from the environment (and `.env`).

use std::fmt;
use std::str::FromStr;

use ::config::{Config, Environment};
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Which creation flow `POST /users` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreationMode {
    #[default]
    UniqueEmail,
    Synthetic,
}

impl FromStr for CreationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unique-email" | "unique_email" => Ok(Self::UniqueEmail),
            "synthetic" => Ok(Self::Synthetic),
            other => Err(format!("expected `unique-email` or `synthetic`, got `{other}`")),
        }
    }
}

#[derive(Clone)]
pub struct DatabaseSettings {
    pub url: Url,
    pub auth_token: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &self.url.as_str())
            .field("auth_token", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database: DatabaseSettings,
    pub creation: CreationMode,
}

/// Environment values as strings; validated by [`RawConfig::validate`].
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    port: Option<String>,
    database_url: Option<String>,
    database_auth_token: Option<String>,
    database_max_connections: Option<String>,
    creation_strategy: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default())
    }

    fn from_source(environment: Environment) -> Result<Self, ConfigError> {
        let raw: RawConfig = Config::builder()
            .add_source(environment.ignore_empty(true))
            .build()?
            .try_deserialize()?;
        raw.validate()
    }
}

impl RawConfig {
    fn validate(self) -> Result<AppConfig, ConfigError> {
        let port = required("PORT", self.port)?;
        let port = match port.trim().parse::<u16>() {
            Ok(0) => return Err(invalid("PORT", "must be between 1 and 65535")),
            Ok(port) => port,
            Err(e) => return Err(invalid("PORT", e.to_string())),
        };

        let url = required("DATABASE_URL", self.database_url)?;
        let url = Url::parse(url.trim()).map_err(|e| invalid("DATABASE_URL", e.to_string()))?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(invalid(
                "DATABASE_URL",
                format!("unsupported scheme `{}`, expected postgres", url.scheme()),
            ));
        }

        let auth_token = required("DATABASE_AUTH_TOKEN", self.database_auth_token)?;
        if auth_token.trim().is_empty() {
            return Err(invalid("DATABASE_AUTH_TOKEN", "must not be blank"));
        }

        let max_connections = match self.database_max_connections {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(0) => return Err(invalid("DATABASE_MAX_CONNECTIONS", "must be at least 1")),
                Ok(n) => n,
                Err(e) => return Err(invalid("DATABASE_MAX_CONNECTIONS", e.to_string())),
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let creation = self
            .creation_strategy
            .as_deref()
            .map(CreationMode::from_str)
            .transpose()
            .map_err(|reason| invalid("CREATION_STRATEGY", reason))?
            .unwrap_or_default();

        Ok(AppConfig {
            port,
            database: DatabaseSettings {
                url,
                auth_token,
                max_connections,
                acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            },
            creation,
        })
    }
}

fn required(key: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    value.ok_or(ConfigError::Missing { key })
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.into(),
    }
}
