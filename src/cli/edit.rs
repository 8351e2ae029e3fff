//! Commands that change tasks in place: mark, add and rm

use std::path::Path;

use anyhow::{Context, Result};

use super::export::render;
use super::output::Output;
use super::query::{load, report_diagnostics};
use crate::domain::{EditError, Placement, Script, Task, TaskId};
use crate::storage::{ExportConfig, ScriptFile};

/// Completion flags a `mark` touches; naming neither means both
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub video: bool,
    pub audio: bool,
}

impl Flags {
    pub fn from_args(video: bool, audio: bool) -> Self {
        if video || audio {
            Self { video, audio }
        } else {
            Self {
                video: true,
                audio: true,
            }
        }
    }
}

/// Fields for a task row added by `add`
#[derive(Debug, Default)]
pub struct NewTask {
    pub id: Option<TaskId>,
    pub section: Option<String>,
    pub chapter: Option<String>,
    pub after: Option<TaskId>,
    pub before: Option<TaskId>,
    pub timestamp: String,
    pub content: String,
    pub dialogue: String,
    pub notes: String,
    pub video: bool,
    pub audio: bool,
}

fn open(output: &Output, path: &Path) -> Result<Script> {
    let decoded = load(output, path)?;
    report_diagnostics(output, path, &decoded);
    Ok(decoded.script)
}

fn save(path: &Path, script: &Script, settings: &ExportConfig) -> Result<()> {
    ScriptFile::new(path).write_text(&render(script, settings))
}

/// Set or clear completion flags
pub fn mark(
    output: &Output,
    path: &Path,
    ids: &[TaskId],
    flags: Flags,
    value: bool,
    settings: &ExportConfig,
) -> Result<()> {
    let mut script = open(output, path)?;

    for id in ids {
        let task = script
            .task_mut(id)
            .with_context(|| format!("No task '{}' in {}", id, path.display()))?;
        if flags.video {
            task.video = value;
        }
        if flags.audio {
            task.audio = value;
        }
        output.verbose_ctx(
            "mark",
            &format!("{}: video={}, audio={}", id, task.video, task.audio),
        );
    }

    save(path, &script, settings)?;

    output.success(&format!(
        "{} {} task(s) in {}",
        if value { "Marked" } else { "Unmarked" },
        ids.len(),
        path.display()
    ));
    Ok(())
}

/// Add a task row
pub fn add(output: &Output, path: &Path, fields: &NewTask, settings: &ExportConfig) -> Result<()> {
    let mut script = open(output, path)?;

    let (placement, section) = resolve_placement(&script, path, fields)?;
    let id = match &fields.id {
        Some(id) => id.clone(),
        None => script.next_task_id(section),
    };

    let mut task = Task::new(id.clone());
    task.video = fields.video;
    task.audio = fields.audio;
    task.timestamp = fields.timestamp.trim().to_string();
    task.content = fields.content.trim().to_string();
    task.dialogue = fields.dialogue.trim().to_string();
    task.notes = fields.notes.trim().to_string();

    output.verbose_ctx("add", &format!("Inserting {} at {:?}", id, placement));
    script.insert_task(task, &placement)?;
    save(path, &script, settings)?;

    output.success(&format!("Added {} to {}", id, path.display()));
    Ok(())
}

/// Resolves `--after`/`--before`/`--section`/`--chapter` to a placement and
/// the section the new row lands in
fn resolve_placement(
    script: &Script,
    path: &Path,
    fields: &NewTask,
) -> Result<(Placement, usize)> {
    if let Some(anchor) = fields.after.as_ref().or(fields.before.as_ref()) {
        let section = script
            .section_of(anchor)
            .ok_or_else(|| EditError::TaskNotFound(anchor.clone()))?;
        let placement = match &fields.after {
            Some(id) => Placement::After(id.clone()),
            None => Placement::Before(anchor.clone()),
        };
        return Ok((placement, section));
    }

    let section = match &fields.section {
        Some(title) => script
            .sections
            .iter()
            .position(|s| s.title == title.trim())
            .with_context(|| format!("No section '{}' in {}", title.trim(), path.display()))?,
        None => script
            .sections
            .len()
            .checked_sub(1)
            .with_context(|| format!("{} has no sections", path.display()))?,
    };

    let chapter = match &fields.chapter {
        Some(title) => Some(
            script.sections[section]
                .chapters
                .iter()
                .position(|c| c.title == title.trim())
                .with_context(|| {
                    format!(
                        "No chapter '{}' in section '{}'",
                        title.trim(),
                        script.sections[section].title
                    )
                })?,
        ),
        None => None,
    };

    Ok((Placement::End { section, chapter }, section))
}

/// Remove a task row
pub fn rm(output: &Output, path: &Path, id: &TaskId, settings: &ExportConfig) -> Result<()> {
    let mut script = open(output, path)?;

    script
        .remove_task(id)
        .with_context(|| format!("No task '{}' in {}", id, path.display()))?;
    save(path, &script, settings)?;

    output.success(&format!("Removed {} from {}", id, path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Chapter, Section};

    fn script() -> Script {
        let mut script = Script::new("s", "S");
        let mut intro = Section::new("Intro");
        intro.tasks.push(Task::new("t1"));
        intro.chapters.push(Chapter::new("Setup"));
        script.sections.push(intro);
        script.sections.push(Section::new("Outro"));
        script
    }

    #[test]
    fn no_flag_named_means_both() {
        assert_eq!(Flags::from_args(false, false), Flags { video: true, audio: true });
        assert_eq!(Flags::from_args(true, false), Flags { video: true, audio: false });
    }

    #[test]
    fn placement_defaults_to_last_section() {
        let (placement, section) =
            resolve_placement(&script(), Path::new("s.md"), &NewTask::default()).unwrap();
        assert_eq!(section, 1);
        assert_eq!(placement, Placement::End { section: 1, chapter: None });
    }

    #[test]
    fn placement_by_titles() {
        let fields = NewTask {
            section: Some(" Intro ".to_string()),
            chapter: Some("Setup".to_string()),
            ..NewTask::default()
        };
        let (placement, _) = resolve_placement(&script(), Path::new("s.md"), &fields).unwrap();
        assert_eq!(placement, Placement::End { section: 0, chapter: Some(0) });

        let missing = NewTask {
            section: Some("Middle".to_string()),
            ..NewTask::default()
        };
        let err = resolve_placement(&script(), Path::new("s.md"), &missing).unwrap_err();
        assert_eq!(err.to_string(), "No section 'Middle' in s.md");
    }

    #[test]
    fn placement_relative_to_task_uses_its_section() {
        let fields = NewTask {
            before: Some(TaskId::from("t1")),
            ..NewTask::default()
        };
        let (placement, section) =
            resolve_placement(&script(), Path::new("s.md"), &fields).unwrap();
        assert_eq!(section, 0);
        assert_eq!(placement, Placement::Before(TaskId::from("t1")));

        let unknown = NewTask {
            after: Some(TaskId::from("zz")),
            ..NewTask::default()
        };
        assert!(resolve_placement(&script(), Path::new("s.md"), &unknown).is_err());
    }
}
