//! Script files on disk
//!
//! Reads go through the tolerant decoder; writes are atomic (temp file +
//! rename) and hold an exclusive lock on the temp file while it is written.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::markdown::{decode_with_diagnostics, Decoded};

/// A Markdown script file
pub struct ScriptFile {
    path: PathBuf,
}

impl ScriptFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns true if the file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the raw file contents
    pub fn read_text(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read script file: {}", self.path.display()))
    }

    /// Reads and decodes the file
    pub fn read(&self) -> Result<Decoded> {
        let text = self.read_text()?;
        decode_with_diagnostics(&text)
            .with_context(|| format!("Import failed: {}", self.path.display()))
    }

    /// Replaces the file contents atomically
    pub fn write_text(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("md.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on script file")?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(content.as_bytes())
                .context("Failed to write script")?;
            writer.flush().context("Failed to flush script file")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}
