//! # Storage Layer
//!
//! File access and configuration for shotlist.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Scripts | Markdown + frontmatter + task tables | anywhere, one file per script |
//! | Project config | TOML | `.shotlist.toml` (nearest ancestor) |
//! | Global config | TOML | `~/.config/shotlist/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`ScriptFile`] writes are atomic (temp file + rename) under an `fs2` lock
//!
//! ## Key Types
//!
//! - [`ScriptFile`] - Read/decode and atomically write a script file
//! - [`Config`] - Project and global configuration

mod config;
mod script_file;

pub use config::{
    Config, ConfigError, ExportConfig, GlobalConfig, OutputFormat, ProjectConfig,
    PROJECT_CONFIG_FILE,
};
pub use script_file::ScriptFile;
