//! Run configuration, read from JSON.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::rules::RuleMode;

/// Rule file used when the configuration names none.
pub const DEFAULT_RULES: &str = "conversion_rules.txt";
/// LaTeX preamble used when the configuration names none.
pub const DEFAULT_LATEX_HEADER: &str = "latex_header.tex";
/// Text written after the body by default.
pub const DEFAULT_LATEX_CLOSING: &str = "\\end{multicols*}\n\\end{document}";
/// Default title of the Spanish half.
pub const DEFAULT_SPANISH_TITLE: &str = "ESPAÑOL – CH'OL";

/// Errors produced while loading a configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Error reading a configuration or header file
    #[error("Failed to read '{0}'")]
    Io(String, #[source] std::io::Error),

    /// Configuration file is not valid JSON for this structure
    #[error("Invalid configuration in '{0}'")]
    Json(String, #[source] serde_json::Error),
}

/// Locations and literal text used to build the dictionary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// rule file for the orthography engine
    pub rules: PathBuf,
    /// overrides the `#!mode` pragma of the rule file
    pub rule_mode: Option<RuleMode>,
    /// LaTeX preamble, written verbatim before the body
    pub latex_header: PathBuf,
    /// written verbatim after the body
    pub latex_closing: String,
    /// title of the Spanish–Ch'ol half
    pub spanish_title: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        DictionaryConfig {
            rules: DEFAULT_RULES.into(),
            rule_mode: None,
            latex_header: DEFAULT_LATEX_HEADER.into(),
            latex_closing: DEFAULT_LATEX_CLOSING.to_string(),
            spanish_title: DEFAULT_SPANISH_TITLE.to_string(),
        }
    }
}

impl DictionaryConfig {
    /// Reads a JSON configuration file. Missing keys take their defaults.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<DictionaryConfig, ConfigError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(name.clone(), e))?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Json(name, e))
    }

    /// Reads the LaTeX header file named by this configuration.
    pub fn read_latex_header(&self) -> Result<String, ConfigError> {
        std::fs::read_to_string(&self.latex_header)
            .map_err(|e| ConfigError::Io(self.latex_header.display().to_string(), e))
    }
}
