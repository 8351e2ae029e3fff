//! Shotlist - checklists for video-production scripts
//!
//! A script is kept as a Markdown file: frontmatter metadata, sections and
//! chapters as headings, and one table row per task with separate video and
//! audio completion flags. Hidden identity markers in each row keep task IDs
//! stable across export, hand edits and re-import.

pub mod domain;
pub mod markdown;
pub mod storage;
pub mod cli;

pub use domain::{Chapter, Progress, Script, Section, Task, TaskId};
pub use markdown::{decode, decode_with_diagnostics, encode, DecodeError, Decoded, Diagnostic};
