//! Server configuration
//!
//! Every setting is a command-line flag with an environment variable
//! fallback, so the server can run with no arguments at all.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::store::{StoreConfig, DEFAULT_KEEP_COUNT};

/// Request body ceiling for snapshot uploads (10 MB)
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("host is not a valid IP address: {0}")]
    InvalidHost(String),

    #[error("retention limit must keep at least one backup")]
    ZeroRetention,

    #[error("body limit must be greater than zero")]
    ZeroBodyLimit,

    #[error("static directory does not exist: {}", .0.display())]
    MissingStaticDir(PathBuf),
}

/// Idea Flow backup server configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "idea-flow-server")]
#[command(about = "Idea Flow backup server")]
#[command(version)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "IDEA_FLOW_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "IDEA_FLOW_PORT", default_value_t = 3001)]
    pub port: u16,

    /// Directory where backups are stored
    #[arg(long, env = "IDEA_FLOW_BACKUPS_DIR", default_value = "backups")]
    pub backups_dir: PathBuf,

    /// Number of most recent backups to keep
    #[arg(long, env = "IDEA_FLOW_KEEP", default_value_t = DEFAULT_KEEP_COUNT)]
    pub keep: usize,

    /// Maximum request body size in bytes
    #[arg(long, env = "IDEA_FLOW_BODY_LIMIT", default_value_t = DEFAULT_BODY_LIMIT)]
    pub body_limit: usize,

    /// Directory of frontend assets served for non-API paths
    #[arg(long, env = "IDEA_FLOW_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

/// Settings consumed by the HTTP layer
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub body_limit: usize,
    pub static_dir: Option<PathBuf>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            body_limit: DEFAULT_BODY_LIMIT,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Check the settings and resolve the socket address to bind.
    pub fn validate(&self) -> Result<SocketAddr, ConfigError> {
        if self.keep == 0 {
            return Err(ConfigError::ZeroRetention);
        }
        if self.body_limit == 0 {
            return Err(ConfigError::ZeroBodyLimit);
        }
        if let Some(dir) = &self.static_dir {
            if !dir.is_dir() {
                return Err(ConfigError::MissingStaticDir(dir.clone()));
            }
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.backups_dir).with_keep_count(self.keep)
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            body_limit: self.body_limit,
            static_dir: self.static_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServerConfig {
        let argv = std::iter::once("idea-flow-server").chain(args.iter().copied());
        ServerConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn config_loads_defaults() {
        let config = parse(&[]);

        assert_eq!(config.port, 3001);
        assert_eq!(config.keep, 20);
        assert_eq!(config.body_limit, 10 * 1024 * 1024);
        assert_eq!(config.backups_dir, PathBuf::from("backups"));
        assert!(config.static_dir.is_none());
        assert_eq!(
            config.validate().unwrap(),
            "127.0.0.1:3001".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn config_flags_override_defaults() {
        let config = parse(&["--port", "8080", "--keep", "5", "--backups-dir", "/srv/backups"]);

        assert_eq!(config.port, 8080);
        let store = config.store_config();
        assert_eq!(store.keep_count, 5);
        assert_eq!(store.dir, PathBuf::from("/srv/backups"));
    }

    #[test]
    fn config_rejects_zero_retention() {
        let config = parse(&["--keep", "0"]);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroRetention)));
    }

    #[test]
    fn config_rejects_bad_host() {
        let config = parse(&["--host", "not-an-ip"]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("not-an-ip"), "{}", err);
    }

    #[test]
    fn config_rejects_missing_static_dir() {
        let config = parse(&["--static-dir", "/definitely/not/here"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingStaticDir(_))
        ));
    }
}
