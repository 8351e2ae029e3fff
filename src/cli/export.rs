//! Commands that write whole documents: fmt and new

use std::path::Path;

use anyhow::{bail, Result};

use super::output::Output;
use super::query::{load, report_diagnostics};
use crate::domain::{Progress, Script, Section};
use crate::markdown::Encoder;
use crate::storage::{ExportConfig, ScriptFile};

/// Fields for a freshly created script
pub struct NewScript {
    pub id: String,
    pub title: String,
    pub sections: Vec<String>,
}

/// Canonical Markdown for a script under the export settings
pub(super) fn render(script: &Script, settings: &ExportConfig) -> String {
    let progress = settings.include_progress.then(|| Progress::of(script));
    Encoder::new()
        .with_labels(settings.labels)
        .encode(script, progress)
}

/// Re-export a script in canonical form
pub fn fmt(output: &Output, path: &Path, settings: &ExportConfig, write: bool) -> Result<()> {
    let decoded = load(output, path)?;
    report_diagnostics(output, path, &decoded);

    let markdown = render(&decoded.script, settings);

    if !write {
        print!("{}", markdown);
        return Ok(());
    }

    ScriptFile::new(path).write_text(&markdown)?;

    output.success(&format!(
        "Formatted {} ({} tasks)",
        path.display(),
        decoded.script.task_count()
    ));
    Ok(())
}

/// Create an empty script file
pub fn new(
    output: &Output,
    path: &Path,
    fields: &NewScript,
    settings: &ExportConfig,
    force: bool,
) -> Result<()> {
    if fields.id.trim().is_empty() {
        bail!("Script ID must not be empty");
    }
    if fields.sections.iter().any(|title| title.trim().is_empty()) {
        bail!("Section titles must not be empty");
    }

    let file = ScriptFile::new(path);
    if file.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut script = Script::new(fields.id.trim(), fields.title.trim());
    script.sections = fields
        .sections
        .iter()
        .map(|title| Section::new(title.trim()))
        .collect();

    file.write_text(&render(&script, settings))?;

    output.success(&format!(
        "Created {} with {} section(s)",
        path.display(),
        script.sections.len()
    ));
    Ok(())
}
