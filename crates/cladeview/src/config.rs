//! Viewer configuration.
//!
//! The two historical variants of the viewer are kept as named presets; a JSON file can override
//! any subset of fields on top of the chosen preset.

use crate::render::{DocumentOptions, LayoutOptions, MatchMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_EXPORT_FILE: &str = "phylogenetic_tree.html";

const COMPACT_HIGHLIGHTS: &str = include_str!("../presets/compact.txt");
const WIDE_HIGHLIGHTS: &str = include_str!("../presets/wide.txt");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    /// Show the "Save to Folder" button and accept `POST /api/save`.
    pub save_button: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
            debug: true,
            save_button: false,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub names: Vec<String>,
    #[serde(rename = "match")]
    pub mode: MatchMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Written relative to the working directory unless absolute.
    pub path: PathBuf,
    #[serde(flatten)]
    pub document: DocumentOptions,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_EXPORT_FILE),
            document: DocumentOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// 80 columns at 30px, exact highlight matching, local debug server.
    ///
    /// The built-in names carry a leading `_`; exact matching compares them verbatim.
    Compact,
    /// 5550 columns at 2px, substring highlight matching, public server with a save button.
    #[default]
    Wide,
}

impl Preset {
    /// Taxon names highlighted when no other list is configured.
    pub fn highlight_names(self) -> Vec<String> {
        match self {
            Self::Compact => parse_highlight_list(COMPACT_HIGHLIGHTS),
            Self::Wide => parse_highlight_list(WIDE_HIGHLIGHTS),
        }
    }
}

impl FromStr for Preset {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "wide" => Ok(Self::Wide),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub input: Option<PathBuf>,
    pub server: ServerConfig,
    pub layout: LayoutOptions,
    pub highlight: HighlightConfig,
    pub export: ExportConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl ViewerConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Compact => Self {
                input: None,
                server: ServerConfig::default(),
                layout: LayoutOptions::default(),
                highlight: HighlightConfig {
                    names: preset.highlight_names(),
                    mode: MatchMode::Exact,
                },
                export: ExportConfig::default(),
            },
            Preset::Wide => Self {
                input: None,
                server: ServerConfig {
                    host: "0.0.0.0".to_string(),
                    port: 8080,
                    debug: false,
                    save_button: true,
                },
                layout: LayoutOptions {
                    column_width: 5550,
                    x_scale: 2.0,
                    y_scale: 30.0,
                    ..LayoutOptions::default()
                },
                highlight: HighlightConfig {
                    names: preset.highlight_names(),
                    mode: MatchMode::Substring,
                },
                export: ExportConfig::default(),
            },
        }
    }

    /// Deep-merges a JSON object over this config. Keys absent from `overrides` keep their
    /// current values.
    pub fn merge_json(&self, overrides: &Value) -> Result<Self, serde_json::Error> {
        let mut base = serde_json::to_value(self)?;
        deep_merge_value(&mut base, overrides);
        serde_json::from_value(base)
    }

    /// Loads a JSON config file on top of `self`.
    pub fn merge_file(&self, path: &Path) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| crate::HeadlessError::Config {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;
        let value: Value =
            serde_json::from_str(&text).map_err(|err| crate::HeadlessError::Config {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        self.merge_json(&value)
            .map_err(|err| crate::HeadlessError::Config {
                path: path.to_path_buf(),
                message: err.to_string(),
            })
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base), Value::Object(incoming)) => {
            for (k, v) in incoming {
                match base.get_mut(k) {
                    Some(existing) => deep_merge_value(existing, v),
                    None => {
                        base.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (base, incoming) => {
            *base = incoming.clone();
        }
    }
}

/// Reads a highlight list: one name per line, blank lines and `#` comments skipped.
pub fn read_highlight_file(path: &Path) -> crate::Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|source| crate::HeadlessError::Config {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;
    Ok(parse_highlight_list(&text))
}

/// One name per line; blank lines and `#` comments are skipped.
pub fn parse_highlight_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
