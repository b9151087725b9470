use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::LoadOptions;
use crate::error::{CustosError, Result};
use crate::models::Columns;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub columns: Columns,
}

fn default_source() -> String {
    "custos.xlsx".to_string()
}

fn default_delimiter() -> char {
    ','
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: default_source(),
            sheet: None,
            delimiter: default_delimiter(),
            columns: Columns::default(),
        }
    }
}

impl Settings {
    /// Resolve the source file, preferring an explicit `--file` override.
    pub fn source_path(&self, file_override: Option<&str>) -> PathBuf {
        PathBuf::from(shellexpand_path(file_override.unwrap_or(&self.source)))
    }

    pub fn load_options(&self) -> Result<LoadOptions> {
        if !self.delimiter.is_ascii() {
            return Err(CustosError::Settings(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )));
        }
        Ok(LoadOptions {
            sheet: self.sheet.clone(),
            delimiter: self.delimiter as u8,
            columns: self.columns.clone(),
        })
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("custos")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    read_settings(&settings_path())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    write_settings(&settings_path(), settings)
}

/// Read settings from `path`. A missing or unreadable file yields the defaults.
fn read_settings(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(path).unwrap_or_default();
    serde_json::from_str(&content).unwrap_or_else(|e| {
        log::warn!("ignoring unreadable settings at {}: {e}", path.display());
        Settings::default()
    })
}

fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| CustosError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file_exists() -> bool {
    settings_path().exists()
}

/// Expand a leading `~` to the home directory. Other paths are left as given
/// so a missing file still reports the path the user typed.
pub fn shellexpand_path(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("custos").join("settings.json");
        let settings = Settings {
            source: "/tmp/custos.xlsx".to_string(),
            sheet: Some("Plan1".to_string()),
            delimiter: ';',
            columns: Columns::default(),
        };
        write_settings(&path, &settings).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().ends_with("}\n"));

        let loaded = read_settings(&path);
        assert_eq!(loaded.source, "/tmp/custos.xlsx");
        assert_eq!(loaded.sheet.as_deref(), Some("Plan1"));
        assert_eq!(loaded.delimiter, ';');
        assert_eq!(loaded.columns, Columns::default());
    }

    #[test]
    fn test_read_missing_settings_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = read_settings(&dir.path().join("settings.json"));
        assert_eq!(loaded.source, "custos.xlsx");
        assert!(loaded.sheet.is_none());
    }

    #[test]
    fn test_read_corrupt_settings_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        let loaded = read_settings(&path);
        assert_eq!(loaded.source, "custos.xlsx");
        assert_eq!(loaded.delimiter, ',');
        assert_eq!(loaded.columns.value, "Valor");
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.source, "custos.xlsx");
        assert!(s.sheet.is_none());
        assert_eq!(s.delimiter, ',');
        assert_eq!(s.columns.planning_group, "Grp.planej.manutenç.");
        assert_eq!(s.columns.superintendence, "Superintendência");
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"source": "dados.csv", "columns": {"value": "Custo"}}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.source, "dados.csv");
        assert_eq!(s.delimiter, ',');
        assert_eq!(s.columns.value, "Custo");
        assert_eq!(s.columns.superintendence, "Superintendência");
    }

    #[test]
    fn test_source_path_prefers_override() {
        let s = Settings::default();
        assert_eq!(s.source_path(None), PathBuf::from("custos.xlsx"));
        assert_eq!(s.source_path(Some("outro.csv")), PathBuf::from("outro.csv"));
    }

    #[test]
    fn test_shellexpand_tilde() {
        let expanded = shellexpand_path("~/custos.xlsx");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/custos.xlsx"));
        assert_eq!(shellexpand_path("relative.xlsx"), "relative.xlsx");
    }

    #[test]
    fn test_load_options_rejects_non_ascii_delimiter() {
        let s = Settings {
            delimiter: 'ç',
            ..Settings::default()
        };
        assert!(s.load_options().is_err());
        let s = Settings {
            delimiter: ';',
            ..Settings::default()
        };
        assert_eq!(s.load_options().unwrap().delimiter, b';');
    }
}
