use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Result, TranslateError};

pub const DEFAULT_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";

const CONFIG_CANDIDATES: [&str; 2] = ["mdtranslate.toml", ".mdtranslate.toml"];

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub translator: TranslatorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Base URL of the translation service
    pub endpoint: String,
    /// Subscription key sent with every request
    pub key: String,
    /// Source language; the service autodetects when unset
    pub from: Option<String>,
    /// Target language
    pub to: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            key: String::new(),
            from: None,
            to: String::new(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TranslateError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            TranslateError::Configuration(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    /// Look for a config file in the working directory, falling back to
    /// defaults when none is found
    pub fn discover() -> Self {
        for candidate in CONFIG_CANDIDATES {
            let path = Path::new(candidate);
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => return config,
                    Err(e) => eprintln!("Warning: {}", e),
                }
            }
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, DEFAULT_ENDPOINT};

    #[test]
    fn full_file() {
        let config: Config = toml::from_str(
            r#"
            [translator]
            endpoint = "https://translate.example.com"
            key = "secret"
            from = "ja"
            to = "en"
            "#,
        )
        .unwrap();
        assert_eq!(config.translator.endpoint, "https://translate.example.com");
        assert_eq!(config.translator.key, "secret");
        assert_eq!(config.translator.from.as_deref(), Some("ja"));
        assert_eq!(config.translator.to, "en");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [translator]
            key = "secret"
            to = "en"
            "#,
        )
        .unwrap();
        assert_eq!(config.translator.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.translator.from, None);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.translator.endpoint, DEFAULT_ENDPOINT);
        assert!(config.translator.key.is_empty());
        assert!(config.translator.to.is_empty());
    }
}
