use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use url::Url;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// address for the HTTP server (API + HTML views) to listen on
    pub listen_addr: SocketAddr,

    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    /// base URL of the external search index, if any
    pub search_index_url: Option<Url>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 20305),
            sqlite_path: None,
            search_index_url: None,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}

/// On-disk TOML shape; every field optional so partial files work.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    listen_addr: Option<SocketAddr>,
    sqlite_path: Option<PathBuf>,
    search_index_url: Option<Url>,
    log_level: Option<String>,
    log_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration, layering an optional TOML file over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = path {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
            let file: ConfigFile = toml::from_str(&raw).map_err(ConfigError::Parse)?;

            if let Some(listen_addr) = file.listen_addr {
                config.listen_addr = listen_addr;
            }
            if file.sqlite_path.is_some() {
                config.sqlite_path = file.sqlite_path;
            }
            if file.search_index_url.is_some() {
                config.search_index_url = file.search_index_url;
            }
            if let Some(level) = file.log_level {
                config.log_level = tracing::Level::from_str(&level)
                    .map_err(|_| ConfigError::InvalidLogLevel(level))?;
            }
            if file.log_dir.is_some() {
                config.log_dir = file.log_dir;
            }
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("unable to parse config file: {0}")]
    Parse(toml::de::Error),

    #[error("unrecognized log level: {0}")]
    InvalidLogLevel(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_a_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.listen_addr.port(), 20305);
        assert!(config.sqlite_path.is_none());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "listen_addr = \"127.0.0.1:9000\"\nlog_level = \"debug\"\n"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"shouting\"").unwrap();
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}
