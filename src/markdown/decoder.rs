//! Markdown to script
//!
//! Only two conditions abort a decode: no frontmatter block and no
//! `scriptId`. Everything else falls back to a defined behaviour and is
//! reported through [`Diagnostic`]s.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::diagnostic::Diagnostic;
use super::{frontmatter, hierarchy, table};
use crate::domain::{keys, Chapter, Script, Section, TaskId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Markdown frontmatter (---...---) not found")]
    MissingFrontmatter,

    #[error("`scriptId` is missing in the Markdown frontmatter")]
    MissingScriptId,
}

/// A decoded script together with everything the decoder had to recover from
#[derive(Debug, Clone, Serialize)]
pub struct Decoded {
    pub script: Script,
    pub diagnostics: Vec<Diagnostic>,
}

impl Decoded {
    /// Returns true if the file decoded without any fallback
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// A source line with its 1-based number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    pub number: usize,
    pub text: &'a str,
}

pub(crate) fn lines_of(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .enumerate()
        .map(|(i, text)| Line { number: i + 1, text })
        .collect()
}

/// State scoped to a single decode call
#[derive(Debug, Default)]
pub(crate) struct DecodeContext {
    /// Running counter for minted IDs; spans the whole document
    counter: usize,
    diagnostics: Vec<Diagnostic>,
}

impl DecodeContext {
    pub fn mint(&mut self, section: usize) -> TaskId {
        let id = TaskId::minted(section, self.counter);
        self.counter += 1;
        id
    }

    pub fn warn(&mut self, diagnostic: Diagnostic) {
        debug!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Parses a script file
pub fn decode(text: &str) -> Result<Script, DecodeError> {
    decode_with_diagnostics(text).map(|decoded| decoded.script)
}

/// Parses a script file and reports every fallback taken
pub fn decode_with_diagnostics(text: &str) -> Result<Decoded, DecodeError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines = lines_of(text);
    let mut ctx = DecodeContext::default();

    let fm = frontmatter::parse(&lines, &mut ctx)?;
    let id = fm.meta.script_id().unwrap_or_default().to_string();
    let title = fm.meta.get(keys::TITLE).unwrap_or_default().to_string();

    let mut sections = Vec::new();
    for (index, block) in hierarchy::split(&lines[fm.body_start..], &mut ctx)
        .into_iter()
        .enumerate()
    {
        let mut section = Section::new(block.title);
        let group = table::parse_group(&block.lines, index, &mut ctx);
        section.tasks = group.tasks;
        section.header = group.header;

        for chapter_block in block.chapters {
            let mut chapter = Chapter::new(chapter_block.title);
            let group = table::parse_group(&chapter_block.lines, index, &mut ctx);
            chapter.tasks = group.tasks;
            chapter.header = group.header;
            section.chapters.push(chapter);
        }

        sections.push(section);
    }

    let script = Script {
        id,
        title,
        metadata: fm.meta,
        sections,
    };

    for id in script.duplicate_task_ids() {
        ctx.warn(Diagnostic::DuplicateTaskId { id });
    }

    debug!(
        "decoded script '{}': {} sections, {} tasks",
        script.id,
        script.sections.len(),
        script.task_count()
    );

    Ok(Decoded {
        script,
        diagnostics: ctx.into_diagnostics(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_counter_spans_sections() {
        let mut ctx = DecodeContext::default();
        assert_eq!(ctx.mint(0).as_str(), "task-0-0");
        assert_eq!(ctx.mint(0).as_str(), "task-0-1");
        assert_eq!(ctx.mint(1).as_str(), "task-1-2");
    }

    #[test]
    fn each_decode_starts_a_fresh_counter() {
        let text = "---\nscriptId: s\n---\n## A\n| Time |\n| --- |\n| 0:01 |\n";
        let first = decode(text).unwrap();
        let second = decode(text).unwrap();
        assert_eq!(first.sections[0].tasks[0].id.as_str(), "task-0-0");
        assert_eq!(second.sections[0].tasks[0].id.as_str(), "task-0-0");
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let script = decode("\u{feff}---\nscriptId: s\n---\n").unwrap();
        assert_eq!(script.id, "s");
    }

    #[test]
    fn crlf_line_endings() {
        let script = decode("---\r\nscriptId: s\r\ntitle: T\r\n---\r\n## A\r\n").unwrap();
        assert_eq!(script.title, "T");
        assert_eq!(script.sections[0].title, "A");
    }

    #[test]
    fn missing_title_defaults_to_empty() {
        let script = decode("---\nscriptId: s\n---\n").unwrap();
        assert_eq!(script.title, "");
        assert!(script.sections.is_empty());
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let text = "---\nscriptId: s\n---\n## A\n| Time |\n| --- |\n| <!-- id:x video:unchecked audio:unchecked --> |\n| <!-- id:x video:checked audio:checked --> |\n";
        let decoded = decode_with_diagnostics(text).unwrap();

        assert_eq!(decoded.script.task_count(), 2);
        assert_eq!(
            decoded.diagnostics,
            vec![Diagnostic::DuplicateTaskId {
                id: TaskId::from("x")
            }]
        );
    }
}
