//! Task identity
//!
//! A task keeps its ID across import/export cycles through the hidden
//! identity marker written into its table row. Rows that arrive without a
//! marker get a minted ID of the form `task-{section}-{counter}`, e.g.
//! `task-0-3`. Any other non-blank token is accepted as-is.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Task ID must not be empty")]
    Empty,

    #[error("Task ID must not contain whitespace, got '{0}'")]
    Whitespace(String),
}

/// Stable identifier of a task row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates the ID given to a row that had no identity marker
    ///
    /// `section` is the zero-based index of the owning section; `counter`
    /// runs across the whole document.
    pub fn minted(section: usize, counter: usize) -> Self {
        Self(format!("task-{}-{}", section, counter))
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        if s.chars().any(char::is_whitespace) {
            return Err(IdError::Whitespace(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_format() {
        assert_eq!(TaskId::minted(0, 0).to_string(), "task-0-0");
        assert_eq!(TaskId::minted(2, 17).to_string(), "task-2-17");
    }

    #[test]
    fn parse_trims_and_validates() {
        assert_eq!("  t1 ".parse::<TaskId>().unwrap().as_str(), "t1");
        assert_eq!("".parse::<TaskId>(), Err(IdError::Empty));
        assert!(matches!("a b".parse::<TaskId>(), Err(IdError::Whitespace(_))));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TaskId::from("intro-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"intro-1\"");
        let back: TaskId = serde_json::from_str("\"intro-1\"").unwrap();
        assert_eq!(back, id);
    }
}
