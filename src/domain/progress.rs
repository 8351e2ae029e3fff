//! Completion progress
//!
//! Progress is always derived from task flags. Exported files carry it in
//! the frontmatter for readers, but it is never read back.

use serde::{Deserialize, Serialize};

use super::script::Script;

/// Percentage of tasks with video and audio recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub video_percentage: u8,
    pub audio_percentage: u8,
}

impl Progress {
    pub fn new(video_percentage: u8, audio_percentage: u8) -> Self {
        Self {
            video_percentage,
            audio_percentage,
        }
    }

    /// Computes progress over every task in the script
    pub fn of(script: &Script) -> Self {
        let mut total = 0usize;
        let mut video = 0usize;
        let mut audio = 0usize;

        for task in script.tasks() {
            total += 1;
            video += usize::from(task.video);
            audio += usize::from(task.audio);
        }

        Self {
            video_percentage: percentage(video, total),
            audio_percentage: percentage(audio, total),
        }
    }
}

/// Rounds half up; an empty script is 0%
fn percentage(checked: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (checked as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
