//! Script domain model
//!
//! A script is a video-production checklist: sections (level-2 headings)
//! hold tasks directly and/or chapters (level-3 headings), and each task is
//! one table row with two independent completion flags.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::column::Column;
use super::id::TaskId;
use super::meta::{keys, ScriptMeta};

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Task ID already in use: {0}")]
    DuplicateId(TaskId),

    #[error("No section at index {0}")]
    NoSection(usize),

    #[error("No chapter at index {chapter} in section {section}")]
    NoChapter { section: usize, chapter: usize },
}

/// Where [`Script::insert_task`] puts a new task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Last task of a section's own table, or of one of its chapters
    End {
        section: usize,
        chapter: Option<usize>,
    },
    Before(TaskId),
    After(TaskId),
}

/// Position of a task: section, chapter (if any), row
type Location = (usize, Option<usize>, usize);

/// One row of trackable work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identity, carried by the row's identity marker
    pub id: TaskId,

    /// Footage recorded
    pub video: bool,

    /// Voice-over recorded
    pub audio: bool,

    /// Free-text time marker such as `0:15`
    #[serde(default)]
    pub timestamp: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub dialogue: String,

    #[serde(default)]
    pub notes: String,

    /// Cells of columns with unrecognised labels, keyed by the literal label
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, String>,
}

impl Task {
    /// Creates an empty, unchecked task
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            video: false,
            audio: false,
            timestamp: String::new(),
            content: String::new(),
            dialogue: String::new(),
            notes: String::new(),
            extra: IndexMap::new(),
        }
    }

    /// Returns the text held by a column (flags render as empty text)
    pub fn text(&self, column: Column) -> &str {
        match column {
            Column::Video | Column::Audio => "",
            Column::Timestamp => &self.timestamp,
            Column::Content => &self.content,
            Column::Dialogue => &self.dialogue,
            Column::Notes => &self.notes,
        }
    }

    /// Stores text into a column; flag columns are left untouched
    pub fn set_text(&mut self, column: Column, value: impl Into<String>) {
        let value = value.into();
        match column {
            Column::Video | Column::Audio => {}
            Column::Timestamp => self.timestamp = value,
            Column::Content => self.content = value,
            Column::Dialogue => self.dialogue = value,
            Column::Notes => self.notes = value,
        }
    }

    /// Returns the completion flag for a flag column
    pub fn flag(&self, column: Column) -> Option<bool> {
        match column {
            Column::Video => Some(self.video),
            Column::Audio => Some(self.audio),
            _ => None,
        }
    }
}

/// A level-3 grouping under a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,

    #[serde(default)]
    pub tasks: Vec<Task>,

    /// Literal column labels of the last table read for this chapter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<String>>,
}

impl Chapter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tasks: Vec::new(),
            header: None,
        }
    }
}

/// A top-level grouping, rendered as a level-2 heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,

    /// Tasks listed before the first chapter
    #[serde(default)]
    pub tasks: Vec<Task>,

    #[serde(default)]
    pub chapters: Vec<Chapter>,

    /// Literal column labels of the last table read for this section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<String>>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tasks: Vec::new(),
            chapters: Vec::new(),
            header: None,
        }
    }

    /// Iterates over the section's own tasks, then each chapter's tasks
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .chain(self.chapters.iter().flat_map(|c| c.tasks.iter()))
    }
}

/// A complete script document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Globally unique ID, mirrored from `scriptId`
    pub id: String,

    /// Display title, mirrored from `title`
    pub title: String,

    pub metadata: ScriptMeta,

    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Script {
    /// Creates an empty script; `scriptId` and `title` are recorded in metadata
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        let title = title.into();
        let mut metadata = ScriptMeta::new();
        metadata.set(keys::SCRIPT_ID, id.clone());
        metadata.set(keys::TITLE, title.clone());
        Self {
            id,
            title,
            metadata,
            sections: Vec::new(),
        }
    }

    /// Iterates over every task in document order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.sections.iter().flat_map(Section::tasks)
    }

    /// Returns the number of tasks in the script
    pub fn task_count(&self) -> usize {
        self.tasks().count()
    }

    /// Finds a task by ID
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks().find(|t| &t.id == id)
    }

    /// Finds a task by ID for in-place edits
    pub fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.sections.iter_mut().find_map(|section| {
            section.tasks.iter_mut().find(|t| &t.id == id).or_else(|| {
                section
                    .chapters
                    .iter_mut()
                    .find_map(|c| c.tasks.iter_mut().find(|t| &t.id == id))
            })
        })
    }

    /// Returns the first ID of the form `task-{section}-{n}` not yet in use
    pub fn next_task_id(&self, section: usize) -> TaskId {
        let taken: HashSet<&TaskId> = self.tasks().map(|t| &t.id).collect();
        let mut n = self.task_count();
        loop {
            let id = TaskId::minted(section, n);
            if !taken.contains(&id) {
                return id;
            }
            n += 1;
        }
    }

    /// Inserts a task; its ID must not be in use yet
    pub fn insert_task(&mut self, task: Task, at: &Placement) -> Result<(), EditError> {
        if self.task(&task.id).is_some() {
            return Err(EditError::DuplicateId(task.id));
        }

        let (section, chapter, row) = match at {
            Placement::End { section, chapter } => {
                let len = self.group_mut(*section, *chapter)?.len();
                (*section, *chapter, len)
            }
            Placement::Before(id) => self
                .locate(id)
                .ok_or_else(|| EditError::TaskNotFound(id.clone()))?,
            Placement::After(id) => {
                let (section, chapter, row) = self
                    .locate(id)
                    .ok_or_else(|| EditError::TaskNotFound(id.clone()))?;
                (section, chapter, row + 1)
            }
        };

        self.group_mut(section, chapter)?.insert(row, task);
        Ok(())
    }

    /// Removes the first task with this ID
    pub fn remove_task(&mut self, id: &TaskId) -> Option<Task> {
        let (section, chapter, row) = self.locate(id)?;
        let tasks = self.group_mut(section, chapter).ok()?;
        Some(tasks.remove(row))
    }

    /// Returns the index of the section holding a task
    pub fn section_of(&self, id: &TaskId) -> Option<usize> {
        self.locate(id).map(|(section, _, _)| section)
    }

    fn locate(&self, id: &TaskId) -> Option<Location> {
        self.sections.iter().enumerate().find_map(|(s, section)| {
            if let Some(row) = section.tasks.iter().position(|t| &t.id == id) {
                return Some((s, None, row));
            }
            section.chapters.iter().enumerate().find_map(|(c, chapter)| {
                chapter
                    .tasks
                    .iter()
                    .position(|t| &t.id == id)
                    .map(|row| (s, Some(c), row))
            })
        })
    }

    fn group_mut(
        &mut self,
        section: usize,
        chapter: Option<usize>,
    ) -> Result<&mut Vec<Task>, EditError> {
        let owner = self
            .sections
            .get_mut(section)
            .ok_or(EditError::NoSection(section))?;
        match chapter {
            None => Ok(&mut owner.tasks),
            Some(c) => owner
                .chapters
                .get_mut(c)
                .map(|chapter| &mut chapter.tasks)
                .ok_or(EditError::NoChapter { section, chapter: c }),
        }
    }

    /// Returns IDs that occur on more than one task, in first-repeat order
    pub fn duplicate_task_ids(&self) -> Vec<TaskId> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();

        for task in self.tasks() {
            if !seen.insert(&task.id) && reported.insert(&task.id) {
                duplicates.push(task.id.clone());
            }
        }

        duplicates
    }
}
