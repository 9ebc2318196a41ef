use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKind {
    Sqlite(PathBuf),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageKind,
}

impl Config {
    /// Reads `CHIRP_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("CHIRP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("CHIRP_PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .context("CHIRP_PORT must be a port number")?;

        let storage = match lookup("CHIRP_STORAGE").as_deref().unwrap_or("sqlite") {
            "sqlite" => StorageKind::Sqlite(
                lookup("CHIRP_DB_PATH").unwrap_or_else(|| "chirp.db".into()).into(),
            ),
            "memory" => StorageKind::Memory,
            other => bail!("CHIRP_STORAGE must be 'sqlite' or 'memory', got '{}'", other),
        };

        Ok(Self {
            host,
            port,
            storage,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
