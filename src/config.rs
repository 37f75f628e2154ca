use std::path::PathBuf;

use anyhow::Context;
use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Full connection URL; when set it wins over the individual `db_*` parts.
    pub database_url: Option<String>,
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub ddl_path: PathBuf,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port: var("PORT", "8080")
                .parse()
                .context("PORT must be a valid number")?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            db_host: var("MY_DATABASE_SERVICE_HOST", "localhost"),
            db_port: var("DB_PORT", "5432")
                .parse()
                .context("DB_PORT must be a valid number")?,
            db_user: var("DB_USERNAME", "user"),
            db_password: var("DB_PASSWORD", "password"),
            db_name: var("DB_NAME", "my_data"),
            ddl_path: PathBuf::from(var("DDL_PATH", "ddl.sql")),
            static_dir: lookup("STATIC_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        if let Some(url) = &self.database_url {
            return url.parse().context("DATABASE_URL is not a valid Postgres URL");
        }

        Ok(PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
