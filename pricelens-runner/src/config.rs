//! Batch configuration: which symbols to run and the default period.
//!
//! JSON is the default format:
//!
//! ```json
//! { "stocks": ["2330", "0050", "^TWII"], "default_period": "1m" }
//! ```
//!
//! A file with a `.toml` extension is parsed as TOML with the same fields.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Period used when the config does not name one.
pub const DEFAULT_PERIOD: &str = "1m";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("config {path} lists no stocks")]
    NoStocks { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    pub stocks: Vec<String>,
    #[serde(default = "default_period")]
    pub default_period: String,
}

fn default_period() -> String {
    DEFAULT_PERIOD.to_string()
}

impl BatchConfig {
    /// Load and validate a config file. The format follows the extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let parsed = if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        };
        let config = parsed.map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })?;

        if config.stocks.is_empty() {
            return Err(ConfigError::NoStocks {
                path: path.to_path_buf(),
            });
        }
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_with_defaults() {
        let config = BatchConfig::from_json(r#"{"stocks": ["2330", "^TWII"]}"#).unwrap();
        assert_eq!(config.stocks, vec!["2330", "^TWII"]);
        assert_eq!(config.default_period, "1m");
    }

    #[test]
    fn toml_with_period() {
        let config = BatchConfig::from_toml(
            r#"
stocks = ["0050.TW"]
default_period = "3y"
"#,
        )
        .unwrap();
        assert_eq!(config.stocks, vec!["0050.TW"]);
        assert_eq!(config.default_period, "3y");
    }

    #[test]
    fn missing_stocks_field_is_a_parse_error() {
        assert!(BatchConfig::from_json(r#"{"default_period": "1w"}"#).is_err());
    }

    #[test]
    fn file_errors() {
        let tmp = tempfile::tempdir().unwrap();

        let missing = tmp.path().join("absent.json");
        assert!(matches!(
            BatchConfig::from_file(&missing),
            Err(ConfigError::Io { .. })
        ));

        let broken = tmp.path().join("broken.json");
        std::fs::write(&broken, "{ stocks: ").unwrap();
        assert!(matches!(
            BatchConfig::from_file(&broken),
            Err(ConfigError::Parse { .. })
        ));

        let empty = tmp.path().join("empty.toml");
        std::fs::write(&empty, "stocks = []\n").unwrap();
        assert!(matches!(
            BatchConfig::from_file(&empty),
            Err(ConfigError::NoStocks { .. })
        ));
    }
}
