//! Check command: report decoder findings

use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use super::output::{strip_line, Output};
use super::query::load;
use crate::markdown::Diagnostic;

#[derive(Serialize)]
struct CheckReport<'a> {
    file: String,
    clean: bool,
    tasks: usize,
    diagnostics: &'a [Diagnostic],
}

/// Print every diagnostic; with `strict`, fail when there are any
pub fn run(output: &Output, path: &Path, strict: bool) -> Result<()> {
    let decoded = load(output, path)?;
    let count = decoded.diagnostics.len();

    if output.is_json() {
        output.data(&CheckReport {
            file: path.display().to_string(),
            clean: decoded.is_clean(),
            tasks: decoded.script.task_count(),
            diagnostics: &decoded.diagnostics,
        });
    } else if decoded.is_clean() {
        println!("{}: ok ({} tasks)", path.display(), decoded.script.task_count());
    } else {
        for diagnostic in &decoded.diagnostics {
            let severity = if diagnostic.is_data_loss() { "error" } else { "warning" };
            match diagnostic.line() {
                Some(line) => println!(
                    "{}:{}: {}: {}",
                    path.display(),
                    line,
                    severity,
                    strip_line(diagnostic)
                ),
                None => println!("{}: {}: {}", path.display(), severity, diagnostic),
            }
        }
        println!();
        println!("{} problem(s) found", count);
    }

    if strict && count > 0 {
        bail!("{} has {} problem(s)", path.display(), count);
    }

    Ok(())
}
