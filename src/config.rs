use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection string; takes precedence over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL"),
            host: var("DB_HOST", "db"),
            port: var("DB_PORT", "5432")
                .parse()
                .context("DB_PORT must be a port number")?,
            user: var("DB_USER", "postgres"),
            password: var("DB_PASSWORD", "password"),
            name: var("DB_NAME", "postgres"),
            max_connections: var("DB_MAX_CONNECTIONS", "10")
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
        };

        Ok(Self {
            host: var("APP_HOST", "0.0.0.0"),
            port: var("APP_PORT", "8080")
                .parse()
                .context("APP_PORT must be a port number")?,
            database,
        })
    }
}

impl DatabaseConfig {
    /// Connection options with TLS turned off.
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        let options = match &self.url {
            Some(url) => url
                .parse::<PgConnectOptions>()
                .context("parse DATABASE_URL")?,
            None => PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.name),
        };
        Ok(options.ssl_mode(PgSslMode::Disable))
    }
}
