//! Optional `nandu.toml` defaults.
//!
//! ```toml
//! [enumerate]
//! max_sources = 20
//! workers = 4
//!
//! [table]
//! on = "Ein"
//! off = "Aus"
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use nandu_kernel::{DEFAULT_MAX_SOURCES, TableFormat};
use nandu_kernel::table::{OFF, ON};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "nandu.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub enumerate: EnumerateSection,
    pub table: TableSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnumerateSection {
    pub max_sources: usize,
    pub workers: usize,
}

impl Default for EnumerateSection {
    fn default() -> Self {
        Self {
            max_sources: DEFAULT_MAX_SOURCES,
            workers: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableSection {
    pub on: String,
    pub off: String,
}

impl Default for TableSection {
    fn default() -> Self {
        Self {
            on: ON.to_string(),
            off: OFF.to_string(),
        }
    }
}

impl TableSection {
    pub fn format(&self) -> TableFormat {
        TableFormat {
            on: self.on.clone(),
            off: self.off.clone(),
        }
    }
}

impl Config {
    pub fn parse(path: &str, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Load an explicit config file, or the default one if it exists.
    pub fn load(explicit: Option<&str>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH,
            None => return Ok(Self::default()),
        };
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        log::debug!("loaded config from {path}");
        Self::parse(path, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("nandu.toml", "").unwrap();
        assert_eq!(config.enumerate.max_sources, DEFAULT_MAX_SOURCES);
        assert_eq!(config.enumerate.workers, 1);
        assert_eq!(config.table.format(), TableFormat::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::parse("nandu.toml", "[table]\non = \"1\"\n").unwrap();
        assert_eq!(config.table.on, "1");
        assert_eq!(config.table.off, OFF);
        assert_eq!(config.enumerate.max_sources, DEFAULT_MAX_SOURCES);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::parse("nandu.toml", "[enumerate]\nthreads = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err:?}");
    }
}
