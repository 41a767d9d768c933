use std::fmt::Display;

use config::{Config as ConfigBuilder, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub secrets: Secrets,
    pub admin: AdminConfig,
    pub token_options: TokenOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub log_level: LogLevel,
    pub log_directory: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user_name: String,
    pub password: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Secrets {
    pub jwt: SecretString,
    pub storage: SecretString,
}

/// Bootstrap admin credentials for the basic-auth `/auth` route.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub password: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenOptions {
    pub jwt_ttl_minutes: i64,
    pub session_cookie_ttl_minutes: i64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Debug => "debug",
                Self::Info => "info",
                Self::Warn => "warn",
                Self::Error => "error",
            }
        )
    }
}

impl AppConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Directive handed to the tracing EnvFilter when RUST_LOG is unset.
    pub fn filter_directive(&self) -> String {
        format!("blobgate={},warn", self.log_level)
    }
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.user_name,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.name
        )
    }
}

impl StorageConfig {
    pub fn url(&self) -> String {
        self.url.clone()
    }
}

impl AppSettings {
    pub fn load() -> Result<AppSettings, ApiError> {
        let config = ConfigBuilder::builder()
            .add_source(File::with_name("config/settings").required(false))
            .add_source(Environment::with_prefix("BLOBGATE").separator("__"))
            .build()?;

        let settings: AppSettings = config.try_deserialize()?;
        Ok(settings)
    }
}
