//! Configuration handling for shotlist
//!
//! Configuration is read from `.shotlist.toml` (nearest ancestor of the
//! working directory) and `~/.config/shotlist/config.toml` (global). An
//! explicit `--config` path replaces the project file lookup.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::LabelSet;

/// Name of the per-project configuration file
pub const PROJECT_CONFIG_FILE: &str = ".shotlist.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings for Markdown export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Labels for tables that carry no header of their own
    pub labels: LabelSet,

    /// Write `videoProgress`/`audioProgress` into the frontmatter
    pub include_progress: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            labels: LabelSet::Chinese,
            include_progress: true,
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectConfig {
    pub export: ExportConfig,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Export settings used when no project file overrides them
    pub export: Option<ExportConfig>,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: Option<ProjectConfig>,
    pub global: GlobalConfig,
    pub project_file: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations, or from `explicit` if given
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let global = Self::load_global()?;

        let project_file = match explicit {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_project_file(),
        };

        let project = project_file
            .as_deref()
            .map(Self::load_project_config)
            .transpose()?;

        Ok(Self {
            project,
            global,
            project_file,
        })
    }

    /// Returns the export settings in effect: project, then global, then defaults
    pub fn export(&self) -> ExportConfig {
        self.project
            .as_ref()
            .map(|p| p.export.clone())
            .or_else(|| self.global.export.clone())
            .unwrap_or_default()
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "shotlist", "shotlist").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads a project configuration file
    fn load_project_config(path: &Path) -> Result<ProjectConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read project config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse project config: {}", path.display()))
    }

    /// Finds `.shotlist.toml` in the current directory or a parent
    pub fn find_project_file() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_file_from(&current)
    }

    fn find_project_file_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(PROJECT_CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();
        let export = config.export();

        assert_eq!(export.labels, LabelSet::Chinese);
        assert!(export.include_progress);
        assert_eq!(config.global.default_format, OutputFormat::Text);
    }

    #[test]
    fn parse_project_config() {
        let toml = r#"
[export]
labels = "english"
include_progress = false
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.export.labels, LabelSet::English);
        assert!(!config.export.include_progress);
    }

    #[test]
    fn partial_export_section_keeps_defaults() {
        let config: ProjectConfig = toml::from_str("[export]\nlabels = \"english\"\n").unwrap();
        assert!(config.export.include_progress);
    }

    #[test]
    fn parse_global_config() {
        let toml = r#"
default_format = "json"
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
        assert!(config.export.is_none());
    }

    #[test]
    fn project_overrides_global_export() {
        let config = Config {
            project: Some(ProjectConfig {
                export: ExportConfig {
                    labels: LabelSet::English,
                    include_progress: true,
                },
            }),
            global: GlobalConfig {
                default_format: OutputFormat::Text,
                export: Some(ExportConfig {
                    labels: LabelSet::Chinese,
                    include_progress: false,
                }),
            },
            project_file: None,
        };

        assert_eq!(config.export().labels, LabelSet::English);
        assert!(config.export().include_progress);
    }

    #[test]
    fn finds_project_file_in_ancestor() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROJECT_CONFIG_FILE), "").unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let found = Config::find_project_file_from(&sub_dir).unwrap();
        assert_eq!(found, dir.path().join(PROJECT_CONFIG_FILE));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = Config::load(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[export]\ninclude_progress = false\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(!config.export().include_progress);
        assert_eq!(config.project_file, Some(path));
    }
}
