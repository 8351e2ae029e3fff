//! Non-fatal decode findings
//!
//! Decoding is tolerant: anything short of a missing frontmatter or script ID
//! degrades to a well-defined fallback. Each fallback taken is recorded here
//! so callers can tell a clean import from a partial one.

use std::fmt;

use serde::Serialize;

use crate::domain::TaskId;

/// Something the decoder recovered from; line numbers are 1-based
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Frontmatter line with nothing before the colon
    EmptyMetadataKey { line: usize },

    /// Table found before the first section heading; its rows were dropped
    ContentBeforeSection { line: usize },

    /// Chapter heading before the first section heading; it was dropped
    OrphanChapter { line: usize, title: String },

    /// Table without a `---` separator row; it yielded no tasks
    MalformedTable { line: usize },

    /// `TABLE_START` without a matching `TABLE_END`
    UnterminatedTable { line: usize },

    /// Row with more cells than the header; it was skipped
    RowTooWide {
        line: usize,
        cells: usize,
        columns: usize,
    },

    /// Header label that maps to no task field; kept as a pass-through column
    UnknownColumn { line: usize, label: String },

    /// Row without an identity marker; a new ID was minted
    MissingMarker { line: usize, id: TaskId },

    /// Two or more rows share an ID
    DuplicateTaskId { id: TaskId },
}

impl Diagnostic {
    /// Returns the source line the finding refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Diagnostic::EmptyMetadataKey { line }
            | Diagnostic::ContentBeforeSection { line }
            | Diagnostic::OrphanChapter { line, .. }
            | Diagnostic::MalformedTable { line }
            | Diagnostic::UnterminatedTable { line }
            | Diagnostic::RowTooWide { line, .. }
            | Diagnostic::UnknownColumn { line, .. }
            | Diagnostic::MissingMarker { line, .. } => Some(*line),
            Diagnostic::DuplicateTaskId { .. } => None,
        }
    }

    /// Returns true if task data was lost rather than merely re-derived
    pub fn is_data_loss(&self) -> bool {
        matches!(
            self,
            Diagnostic::ContentBeforeSection { .. }
                | Diagnostic::OrphanChapter { .. }
                | Diagnostic::MalformedTable { .. }
                | Diagnostic::RowTooWide { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::EmptyMetadataKey { line } => {
                write!(f, "line {}: frontmatter entry has an empty key", line)
            }
            Diagnostic::ContentBeforeSection { line } => {
                write!(f, "line {}: table before the first section was ignored", line)
            }
            Diagnostic::OrphanChapter { line, title } => write!(
                f,
                "line {}: chapter '{}' appears before any section and was ignored",
                line, title
            ),
            Diagnostic::MalformedTable { line } => write!(
                f,
                "line {}: table has no '---' separator row and was skipped",
                line
            ),
            Diagnostic::UnterminatedTable { line } => {
                write!(f, "line {}: TABLE_START has no matching TABLE_END", line)
            }
            Diagnostic::RowTooWide {
                line,
                cells,
                columns,
            } => write!(
                f,
                "line {}: row has {} cells but the header has {}; row skipped",
                line, cells, columns
            ),
            Diagnostic::UnknownColumn { line, label } => {
                write!(f, "line {}: unrecognised column '{}'", line, label)
            }
            Diagnostic::MissingMarker { line, id } => {
                write!(f, "line {}: row has no identity marker; assigned '{}'", line, id)
            }
            Diagnostic::DuplicateTaskId { id } => {
                write!(f, "task ID '{}' is used by more than one row", id)
            }
        }
    }
}
