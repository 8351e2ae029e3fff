//! Read-only commands: show and progress

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use super::output::Output;
use crate::domain::{keys, Progress, Script, Task};
use crate::markdown::Decoded;
use crate::storage::ScriptFile;

/// Decodes a file and reports recoverable problems on stderr
pub(super) fn load(output: &Output, path: &Path) -> Result<Decoded> {
    let decoded = ScriptFile::new(path).read()?;

    output.verbose_ctx(
        "decode",
        &format!(
            "{} section(s), {} task(s), {} diagnostic(s)",
            decoded.script.sections.len(),
            decoded.script.task_count(),
            decoded.diagnostics.len()
        ),
    );

    Ok(decoded)
}

pub(super) fn report_diagnostics(output: &Output, path: &Path, decoded: &Decoded) {
    let source = path.display().to_string();
    for diagnostic in &decoded.diagnostics {
        output.diagnostic(&source, diagnostic);
    }
}

/// Show the decoded script
pub fn show(output: &Output, path: &Path) -> Result<()> {
    let decoded = load(output, path)?;

    if output.is_json() {
        output.data(&decoded);
        return Ok(());
    }

    report_diagnostics(output, path, &decoded);
    print_script(&decoded.script);
    Ok(())
}

fn print_script(script: &Script) {
    println!("{} ({})", script.title, script.id);
    for (key, value) in script.metadata.iter() {
        if key != keys::SCRIPT_ID && key != keys::TITLE {
            println!("  {}: {}", key, value);
        }
    }

    let progress = Progress::of(script);
    println!(
        "  progress: video {}%, audio {}% ({} tasks)",
        progress.video_percentage,
        progress.audio_percentage,
        script.task_count()
    );

    if script.sections.is_empty() {
        println!();
        println!("No sections.");
        return;
    }

    for section in &script.sections {
        println!();
        println!("## {}", section.title);
        for task in &section.tasks {
            print_task(task, 2);
        }
        for chapter in &section.chapters {
            println!("  ### {}", chapter.title);
            for task in &chapter.tasks {
                print_task(task, 4);
            }
        }
    }
}

fn print_task(task: &Task, indent: usize) {
    let flags = format!(
        "[{}{}]",
        if task.video { 'V' } else { '-' },
        if task.audio { 'A' } else { '-' }
    );
    let summary = first_line(if task.content.is_empty() {
        &task.dialogue
    } else {
        &task.content
    });

    println!(
        "{:indent$}{} {:<16} {:<8} {}",
        "",
        flags,
        task.id.as_str(),
        task.timestamp,
        summary,
        indent = indent
    );
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

/// Progress with the counts it was computed from
#[derive(Debug, Serialize)]
struct ProgressReport {
    #[serde(flatten)]
    progress: Progress,
    tasks: usize,
    video_done: usize,
    audio_done: usize,
}

/// Show video and audio completion
pub fn progress(output: &Output, path: &Path) -> Result<()> {
    let decoded = load(output, path)?;
    report_diagnostics(output, path, &decoded);

    let script = &decoded.script;
    let report = ProgressReport {
        progress: Progress::of(script),
        tasks: script.task_count(),
        video_done: script.tasks().filter(|t| t.video).count(),
        audio_done: script.tasks().filter(|t| t.audio).count(),
    };

    if output.is_json() {
        output.data(&report);
    } else {
        println!(
            "Video: {:>3}% ({}/{})",
            report.progress.video_percentage, report.video_done, report.tasks
        );
        println!(
            "Audio: {:>3}% ({}/{})",
            report.progress.audio_percentage, report.audio_done, report.tasks
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_of_multiline_cell() {
        assert_eq!(first_line("one\ntwo"), "one");
        assert_eq!(first_line(""), "");
    }

    #[test]
    fn progress_report_flattens_percentages() {
        let report = ProgressReport {
            progress: Progress::new(50, 0),
            tasks: 2,
            video_done: 1,
            audio_done: 0,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["video_percentage"], 50);
        assert_eq!(json["audio_percentage"], 0);
        assert_eq!(json["tasks"], 2);
    }
}
