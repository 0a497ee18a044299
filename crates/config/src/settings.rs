// Global settings
// Loaded from ./global_config.json

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{strip_comment_lines, ConfigError};

pub const DEFAULT_CONFIG_FILE: &str = "global_config.json";

/// Language name → label-table code. Unknown names read English labels.
pub fn language_code(name: &str) -> &'static str {
    match name {
        "English" => "en",
        "Tamil" => "ta",
        "Hindi" => "hi",
        "Japanese" => "ja",
        _ => "en",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Languages offered in the selector.
    pub language: Vec<String>,

    /// Language the dashboards render in.
    pub default_language: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            language: ["English", "Tamil", "Hindi", "Japanese"].map(String::from).to_vec(),
            default_language: "English".to_string(),
        }
    }
}

impl GlobalConfig {
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load from disk. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("{} not found, using default config", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&strip_comment_lines(&contents))
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))
    }

    /// Write pretty-printed JSON. Non-ASCII names are written as-is.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Change the default language; it must be one of `language`.
    pub fn set_default_language(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.language.iter().any(|l| l == name) {
            return Err(ConfigError::UnknownLanguage {
                name: name.to_string(),
                available: self.language.clone(),
            });
        }
        self.default_language = name.to_string();
        Ok(())
    }

    /// Label-table code for the default language.
    pub fn language_code(&self) -> &'static str {
        language_code(&self.default_language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GlobalConfig::load(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config, GlobalConfig::default());
        assert_eq!(config.language.len(), 4);
        assert_eq!(config.language_code(), "en");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "// edited by hand\n{ \"default_language\": \"Tamil\" }").unwrap();
        let config = GlobalConfig::load(&path).unwrap();
        assert_eq!(config.default_language, "Tamil");
        assert_eq!(config.language.len(), 4);
        assert_eq!(config.language_code(), "ta");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(GlobalConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn set_default_language_validates() {
        let mut config = GlobalConfig::default();
        config.set_default_language("Japanese").unwrap();
        assert_eq!(config.default_language, "Japanese");

        let err = config.set_default_language("Klingon").unwrap_err();
        assert!(err.to_string().contains("Klingon"));
        assert_eq!(config.default_language, "Japanese");
    }

    #[test]
    fn save_round_trip_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let mut config = GlobalConfig::default();
        config.language.push("தமிழ்".to_string());
        config.set_default_language("தமிழ்").unwrap();
        config.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"default_language\": \"தமிழ்\""));
        assert!(text.contains("\n  \"language\""));
        assert_eq!(GlobalConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn unknown_language_names_use_english() {
        assert_eq!(language_code("Hindi"), "hi");
        assert_eq!(language_code("Japanese"), "ja");
        assert_eq!(language_code("French"), "en");
    }
}
