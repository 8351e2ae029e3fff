//! Table columns
//!
//! Every script table maps its header labels onto a fixed set of task
//! properties. Files exported by the editor use Chinese labels; English
//! aliases are accepted on input as well.

use serde::{Deserialize, Serialize};

/// A task property that a table column can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Video,
    Audio,
    Timestamp,
    Content,
    Dialogue,
    Notes,
}

impl Column {
    /// Canonical column order
    pub fn all() -> &'static [Column] {
        &[
            Column::Video,
            Column::Audio,
            Column::Timestamp,
            Column::Content,
            Column::Dialogue,
            Column::Notes,
        ]
    }

    /// Maps a header label to a column, if recognised
    pub fn from_label(label: &str) -> Option<Column> {
        let label = label.trim();
        let column = match label {
            "录视频" | "视频" => Column::Video,
            "配音" => Column::Audio,
            "时间轴" => Column::Timestamp,
            "画面内容" => Column::Content,
            "旁白/对话" => Column::Dialogue,
            "备注" | "视觉引导/备注" => Column::Notes,
            _ => match label.to_ascii_lowercase().as_str() {
                "video" => Column::Video,
                "audio" | "voiceover" => Column::Audio,
                "timestamp" | "time" | "timecode" => Column::Timestamp,
                "content" | "visual" | "scene" => Column::Content,
                "dialogue" | "narration" => Column::Dialogue,
                "notes" | "note" => Column::Notes,
                _ => return None,
            },
        };
        Some(column)
    }

    /// Returns true for the two completion-flag columns
    pub fn is_flag(&self) -> bool {
        matches!(self, Column::Video | Column::Audio)
    }
}

/// Display labels used for the canonical header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LabelSet {
    #[default]
    Chinese,
    English,
}

impl LabelSet {
    /// Returns the display label of a column in this label set
    pub fn label(&self, column: Column) -> &'static str {
        match self {
            LabelSet::Chinese => match column {
                Column::Video => "录视频",
                Column::Audio => "配音",
                Column::Timestamp => "时间轴",
                Column::Content => "画面内容",
                Column::Dialogue => "旁白/对话",
                Column::Notes => "备注",
            },
            LabelSet::English => match column {
                Column::Video => "Video",
                Column::Audio => "Audio",
                Column::Timestamp => "Timestamp",
                Column::Content => "Content",
                Column::Dialogue => "Dialogue",
                Column::Notes => "Notes",
            },
        }
    }

    /// Returns the canonical header row in this label set
    pub fn canonical_header(&self) -> Vec<String> {
        Column::all().iter().map(|c| self.label(*c).to_string()).collect()
    }
}
