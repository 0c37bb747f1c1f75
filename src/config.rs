use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::model::FilterCriteria;

/// Default settings file, looked up in the working directory.
pub const CONFIG_FILE: &str = "ddea.json";
/// Environment variable overriding [`CONFIG_FILE`].
pub const CONFIG_ENV: &str = "DDEA_CONFIG";

/// Startup settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the bundled example table and gene list.
    pub examples_dir: PathBuf,
    /// Markdown file shown in the documentation tab.
    pub readme_path: PathBuf,
    /// Rows shown in the raw-data preview.
    pub preview_rows: usize,
    pub default_p_value_threshold: f64,
    pub default_min_abs_fold_change: f64,
    pub default_max_rows: usize,
    pub auto_detect_comparison: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            examples_dir: PathBuf::from("Examples"),
            readme_path: PathBuf::from("readme.md"),
            preview_rows: 5,
            default_p_value_threshold: 0.05,
            default_min_abs_fold_change: 0.0,
            default_max_rows: 0,
            auto_detect_comparison: true,
        }
    }
}

impl Settings {
    /// Load settings from `$DDEA_CONFIG` or `./ddea.json`, falling back to
    /// defaults when the file is absent or invalid.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Initial thresholds for the side panel.
    pub fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            p_value_threshold: self.default_p_value_threshold,
            min_abs_fold_change: self.default_min_abs_fold_change,
            max_rows: self.default_max_rows,
        }
        .sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "preview_rows": 10, "examples_dir": "data" }}"#).unwrap();
        let s = Settings::from_file(file.path()).unwrap();
        assert_eq!(s.preview_rows, 10);
        assert_eq!(s.examples_dir, PathBuf::from("data"));
        assert_eq!(s.readme_path, PathBuf::from("readme.md"));
        assert_eq!(s.default_criteria(), FilterCriteria::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Settings::from_file(file.path()).is_err());
    }

    #[test]
    fn default_criteria_are_sanitized() {
        let s = Settings {
            default_p_value_threshold: 2.0,
            ..Settings::default()
        };
        assert_eq!(s.default_criteria().p_value_threshold, 1.0);
    }
}
