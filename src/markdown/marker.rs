//! Identity marker embedded in table rows
//!
//! `<!-- id:<ID> video:<checked|unchecked> audio:<checked|unchecked> -->`
//!
//! The marker is invisible when the Markdown is rendered and carries the
//! task's ID and both flags, so a row keeps its identity when the file is
//! edited by hand and imported again.

use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{Task, TaskId};

/// Identity and flags recovered from (or written to) a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub id: TaskId,
    pub video: bool,
    pub audio: bool,
}

impl Marker {
    /// Builds the marker describing a task's current state
    pub fn for_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            video: task.video,
            audio: task.audio,
        }
    }

    /// Finds the first well-formed marker in a cell
    ///
    /// Partial or garbled markers do not match and are left in the text.
    pub fn find(cell: &str) -> Option<(Marker, Range<usize>)> {
        let caps = pattern().captures(cell)?;
        let whole = caps.get(0)?;
        let marker = Marker {
            id: TaskId::from(caps.get(1)?.as_str()),
            video: caps.get(2)?.as_str() == "checked",
            audio: caps.get(3)?.as_str() == "checked",
        };
        Some((marker, whole.range()))
    }

    /// Removes the first marker from a cell, returning it with the remainder
    ///
    /// Spaces around the remainder are trimmed; line breaks are cell content
    /// and stay.
    pub fn strip(cell: &str) -> Option<(Marker, String)> {
        let (marker, range) = Self::find(cell)?;
        let mut rest = String::with_capacity(cell.len() - range.len());
        rest.push_str(&cell[..range.start]);
        rest.push_str(&cell[range.end..]);
        let rest = rest.trim_matches(|c: char| c.is_whitespace() && c != '\n');
        Some((marker, rest.to_string()))
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<!-- id:{} video:{} audio:{} -->",
            self.id,
            status(self.video),
            status(self.audio)
        )
    }
}

fn status(checked: bool) -> &'static str {
    if checked {
        "checked"
    } else {
        "unchecked"
    }
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<!--\s*id:(\S+)\s+video:(checked|unchecked)\s+audio:(checked|unchecked)\s*-->")
            .expect("Invalid regex pattern")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_marker_from_timestamp() {
        let (marker, rest) =
            Marker::strip("<!-- id:t1 video:checked audio:unchecked -->0:15").unwrap();

        assert_eq!(marker.id.as_str(), "t1");
        assert!(marker.video);
        assert!(!marker.audio);
        assert_eq!(rest, "0:15");
    }

    #[test]
    fn tolerates_extra_whitespace() {
        let (marker, rest) =
            Marker::strip("1:00 <!--id:abc   video:unchecked audio:checked-->").unwrap();
        assert_eq!(marker.id.as_str(), "abc");
        assert!(!marker.video);
        assert!(marker.audio);
        assert_eq!(rest, "1:00");
    }

    #[test]
    fn keeps_line_breaks_next_to_marker() {
        let (_, rest) =
            Marker::strip("<!-- id:t1 video:checked audio:checked -->\nsecond line").unwrap();
        assert_eq!(rest, "\nsecond line");
    }

    #[test]
    fn ids_may_hold_punctuation() {
        let (marker, _) =
            Marker::strip("<!-- id:a|b#c/-1 video:unchecked audio:unchecked -->").unwrap();
        assert_eq!(marker.id.as_str(), "a|b#c/-1");
    }

    #[test]
    fn garbled_markers_do_not_match() {
        assert!(Marker::find("<!-- id:t1 video:yes audio:unchecked -->").is_none());
        assert!(Marker::find("<!-- id:t1 video:checked -->").is_none());
        assert!(Marker::find("<!-- id: video:checked audio:checked -->").is_none());
        assert!(Marker::find("id:t1 video:checked audio:checked").is_none());
    }

    #[test]
    fn display_is_canonical() {
        let marker = Marker {
            id: TaskId::from("task-0-3"),
            video: false,
            audio: true,
        };
        assert_eq!(
            marker.to_string(),
            "<!-- id:task-0-3 video:unchecked audio:checked -->"
        );
    }
}
