use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

use clipboard_db::DEFAULT_READER_POOL_SIZE;

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub reader_pool_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("CLIPBOARD_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("CLIPBOARD_PORT") {
            Some(v) => v
                .parse()
                .with_context(|| format!("CLIPBOARD_PORT must be a port number, got '{}'", v))?,
            None => 8080,
        };
        let db_path = lookup("CLIPBOARD_DB_PATH")
            .unwrap_or_else(|| "clipboard.db".into())
            .into();
        let reader_pool_size = match lookup("CLIPBOARD_READER_POOL_SIZE") {
            Some(v) => {
                let n: usize = v.parse().with_context(|| {
                    format!("CLIPBOARD_READER_POOL_SIZE must be a positive integer, got '{}'", v)
                })?;
                anyhow::ensure!(n > 0, "CLIPBOARD_READER_POOL_SIZE must be at least 1");
                n
            }
            None => DEFAULT_READER_POOL_SIZE,
        };

        Ok(Self {
            host,
            port,
            db_path,
            reader_pool_size,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
