//! Script to Markdown
//!
//! Output is canonical: for the same script, progress and clock reading the
//! bytes are identical. Every row gets a freshly computed identity marker,
//! so exporting a legacy file upgrades it to the round-trippable format.

use chrono::SecondsFormat;

use super::clock::{Clock, SystemClock};
use super::marker::Marker;
use super::table::{escape_cell, resolve_header, Slot, CHECKMARK, TABLE_END, TABLE_START};
use crate::domain::{keys, Column, LabelSet, Progress, Script, ScriptMeta, Task};

/// Renders scripts as Markdown
#[derive(Debug, Clone, Default)]
pub struct Encoder<C = SystemClock> {
    clock: C,
    labels: LabelSet,
}

impl Encoder<SystemClock> {
    /// Creates an encoder using wall-clock time and Chinese column labels
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> Encoder<C> {
    /// Replaces the time source used for `exportDate`
    pub fn with_clock<D: Clock>(self, clock: D) -> Encoder<D> {
        Encoder {
            clock,
            labels: self.labels,
        }
    }

    /// Sets the labels used for tables without a stored header
    pub fn with_labels(mut self, labels: LabelSet) -> Self {
        self.labels = labels;
        self
    }

    /// Renders a complete script file
    ///
    /// Headings are always written as `## {title}` with the separating
    /// space, so an untitled section still reads back as a section.
    pub fn encode(&self, script: &Script, progress: Option<Progress>) -> String {
        let mut out = String::new();

        self.write_frontmatter(&mut out, script, progress);

        out.push_str(&format!("# {}\n\n", flatten(&script.title)));

        for section in &script.sections {
            out.push_str(&format!("## {}\n\n", flatten(&section.title)));
            if !section.tasks.is_empty() || section.header.is_some() {
                self.write_table(&mut out, section.header.as_deref(), &section.tasks);
            }

            for chapter in &section.chapters {
                out.push_str(&format!("### {}\n\n", flatten(&chapter.title)));
                if !chapter.tasks.is_empty() || chapter.header.is_some() {
                    self.write_table(&mut out, chapter.header.as_deref(), &chapter.tasks);
                }
            }
        }

        out
    }

    fn write_frontmatter(&self, out: &mut String, script: &Script, progress: Option<Progress>) {
        out.push_str("---\n");

        if !script.metadata.contains(keys::SCRIPT_ID) {
            push_pair(out, keys::SCRIPT_ID, &script.id);
        }
        if !script.metadata.contains(keys::TITLE) {
            push_pair(out, keys::TITLE, &script.title);
        }

        for (key, value) in script.metadata.iter() {
            let value = match key {
                "" | keys::EXPORT_DATE => continue,
                keys::SCRIPT_ID => script.id.as_str(),
                keys::TITLE => script.title.as_str(),
                _ if ScriptMeta::is_derived_key(key) => continue,
                _ => value,
            };
            push_pair(out, key, value);
        }

        if let Some(progress) = progress {
            push_pair(
                out,
                keys::VIDEO_PROGRESS,
                &format!("{}%", progress.video_percentage),
            );
            push_pair(
                out,
                keys::AUDIO_PROGRESS,
                &format!("{}%", progress.audio_percentage),
            );
        }

        let exported = self.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true);
        push_pair(out, keys::EXPORT_DATE, &exported);

        out.push_str("---\n\n");
    }

    fn write_table(&self, out: &mut String, header: Option<&[String]>, tasks: &[Task]) {
        let (labels, slots) = self.columns(header, tasks);

        out.push_str(TABLE_START);
        out.push('\n');

        let header_cells: Vec<_> = labels.iter().map(|l| escape_cell(l)).collect();
        push_row(out, &header_cells);

        let alignment: Vec<_> = slots
            .iter()
            .map(|slot| match slot {
                Slot::Field(column) if column.is_flag() => ":---:".to_string(),
                _ => "---".to_string(),
            })
            .collect();
        push_row(out, &alignment);

        let marker_at = slots
            .iter()
            .position(|s| *s == Slot::Field(Column::Timestamp))
            .unwrap_or(0);

        for task in tasks {
            let cells: Vec<_> = slots
                .iter()
                .enumerate()
                .map(|(i, slot)| {
                    let cell = render_cell(task, slot);
                    if i == marker_at {
                        escape_cell(&format!("{}{}", Marker::for_task(task), cell))
                    } else {
                        escape_cell(&cell)
                    }
                })
                .collect();
            push_row(out, &cells);
        }

        out.push_str(TABLE_END);
        out.push_str("\n\n");
    }

    /// Stored header (or the canonical one) plus the columns it lacks
    ///
    /// A field column is appended when some task has text for it, or when a
    /// pass-through key carries that field's label and would otherwise be
    /// read back as the field. Pass-through keys the header does not cover
    /// come last.
    fn columns(&self, header: Option<&[String]>, tasks: &[Task]) -> (Vec<String>, Vec<Slot>) {
        let mut labels = match header {
            Some(header) if !header.is_empty() => header.to_vec(),
            _ => self.labels.canonical_header(),
        };
        let slots = resolve_header(&labels);

        let mut uncovered: Vec<&String> = Vec::new();
        for key in tasks.iter().flat_map(|t| t.extra.keys()) {
            let covered = slots
                .iter()
                .any(|s| matches!(s, Slot::Extra(existing) if existing == key));
            if !covered && !uncovered.contains(&key) {
                uncovered.push(key);
            }
        }

        for column in Column::all() {
            if slots.contains(&Slot::Field(*column)) {
                continue;
            }
            let has_text = tasks.iter().any(|t| !t.text(*column).is_empty());
            let shadowed = uncovered
                .iter()
                .any(|key| Column::from_label(key) == Some(*column));
            if has_text || shadowed {
                labels.push(self.labels.label(*column).to_string());
            }
        }

        labels.extend(uncovered.into_iter().cloned());

        let slots = resolve_header(&labels);
        (labels, slots)
    }
}

/// Renders a script with wall-clock `exportDate` and the default labels
pub fn encode(script: &Script, progress: Option<Progress>) -> String {
    Encoder::new().encode(script, progress)
}

/// Cell text before escaping
fn render_cell(task: &Task, slot: &Slot) -> String {
    match slot {
        Slot::Field(column) => match task.flag(*column) {
            Some(true) => CHECKMARK.to_string(),
            Some(false) => " ".to_string(),
            None => task.text(*column).to_string(),
        },
        Slot::Extra(key) => task.extra.get(key).cloned().unwrap_or_default(),
    }
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}

/// Writes `key: "value"`; an empty ID or title is left out
fn push_pair(out: &mut String, key: &str, value: &str) {
    if value.is_empty() && (key == keys::SCRIPT_ID || key == keys::TITLE) {
        return;
    }
    out.push_str(&format!("{}: \"{}\"\n", key, flatten(value)));
}

/// Keeps single-line constructs on one line
fn flatten(text: &str) -> String {
    text.replace("\r\n", " ").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Chapter, Section, TaskId};
    use crate::markdown::decode;
    use crate::markdown::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap())
    }

    fn sample() -> Script {
        let mut script = Script::new("lesson-1", "Fire hit");
        script.metadata.set("author", "Lin");

        let mut task = Task::new("t1");
        task.video = true;
        task.timestamp = "0:15".to_string();
        task.content = "Burst | flash".to_string();
        task.dialogue = "Line one\nLine two".to_string();

        let mut section = Section::new("Intro");
        section.tasks.push(task);
        section.chapters.push(Chapter::new("Empty chapter"));
        script.sections.push(section);
        script
    }

    #[test]
    fn renders_canonical_document() {
        let md = Encoder::new()
            .with_clock(clock())
            .encode(&sample(), Some(Progress::new(100, 0)));

        let expected = "---\n\
scriptId: \"lesson-1\"\n\
title: \"Fire hit\"\n\
author: \"Lin\"\n\
videoProgress: \"100%\"\n\
audioProgress: \"0%\"\n\
exportDate: \"2024-05-01T08:30:00.000Z\"\n\
---\n\
\n\
# Fire hit\n\
\n\
## Intro\n\
\n\
<!-- TABLE_START -->\n\
| 录视频 | 配音 | 时间轴 | 画面内容 | 旁白/对话 | 备注 |\n\
| :---: | :---: | --- | --- | --- | --- |\n\
| ✓ |   | <!-- id:t1 video:checked audio:unchecked -->0:15 | Burst \\| flash | Line one<br>Line two |  |\n\
<!-- TABLE_END -->\n\
\n\
### Empty chapter\n\
\n";
        assert_eq!(md, expected);
    }

    #[test]
    fn stale_derived_keys_are_replaced() {
        let mut script = sample();
        script.metadata.set("exportDate", "2000-01-01T00:00:00.000Z");
        script.metadata.set("videoProgress", "3%");

        let md = Encoder::new().with_clock(clock()).encode(&script, None);

        assert!(!md.contains("2000-01-01"));
        assert!(!md.contains("videoProgress"));
        assert_eq!(md.matches("exportDate").count(), 1);
    }

    #[test]
    fn empty_id_and_title_are_skipped() {
        let mut script = Script::new("", "");
        script.metadata.set("status", "");
        let md = Encoder::new().with_clock(clock()).encode(&script, None);

        assert!(!md.contains("scriptId"));
        assert!(!md.contains("title:"));
        assert!(md.contains("status: \"\"\n"));
    }

    #[test]
    fn mirrored_fields_win_over_metadata() {
        let mut script = sample();
        script.title = "Renamed".to_string();
        let md = Encoder::new().with_clock(clock()).encode(&script, None);
        assert!(md.contains("title: \"Renamed\"\n"));
        assert!(md.contains("# Renamed\n"));
    }

    #[test]
    fn stored_header_controls_order_and_labels() {
        let mut script = sample();
        script.sections[0].header = Some(vec![
            "Timestamp".to_string(),
            "Video".to_string(),
            "Shot".to_string(),
        ]);
        script.sections[0].tasks[0]
            .extra
            .insert("Shot".to_string(), "Wide".to_string());

        let md = Encoder::new().with_clock(clock()).encode(&script, None);

        assert!(md.contains(
            "| Timestamp | Video | Shot | 画面内容 | 旁白/对话 |\n| --- | :---: | --- | --- | --- |\n"
        ));
        assert!(md.contains(
            "| <!-- id:t1 video:checked audio:unchecked -->0:15 | ✓ | Wide | Burst \\| flash | Line one<br>Line two |\n"
        ));
    }

    #[test]
    fn uncovered_extra_columns_are_appended() {
        let mut script = sample();
        script.sections[0].tasks[0]
            .extra
            .insert("Lens".to_string(), "35mm".to_string());

        let md = Encoder::new()
            .with_clock(clock())
            .with_labels(LabelSet::English)
            .encode(&script, None);

        assert!(md.contains("| Video | Audio | Timestamp | Content | Dialogue | Notes | Lens |\n"));
        assert!(md.contains("| 35mm |\n"));
    }

    #[test]
    fn marker_prefixes_first_cell_without_timestamp_column() {
        let mut script = sample();
        script.sections[0].header = Some(vec!["Content".to_string()]);
        script.sections[0].tasks[0].timestamp.clear();
        script.sections[0].tasks[0].dialogue.clear();
        let md = Encoder::new().with_clock(clock()).encode(&script, None);
        assert!(md.contains("| <!-- id:t1 video:checked audio:unchecked -->Burst \\| flash |\n"));
    }

    #[test]
    fn marker_is_escaped_with_its_cell() {
        let mut script = sample();
        script.sections[0].tasks[0].id = TaskId::from("shot|1");
        let md = Encoder::new().with_clock(clock()).encode(&script, None);

        assert!(md.contains("| <!-- id:shot\\|1 video:checked audio:unchecked -->0:15 |"));
        let back = decode(&md).unwrap();
        assert_eq!(back.sections[0].tasks[0].id.as_str(), "shot|1");
    }

    #[test]
    fn repeated_extra_labels_survive_without_header() {
        let text = "---\nscriptId: \"s\"\n---\n## A\n| 时间轴 | Cam | Cam |\n| --- | --- | --- |\n| 0:01 | first | second |\n";
        let mut script = decode(text).unwrap();
        script.sections[0].header = None;

        let back = decode(&Encoder::new().with_clock(clock()).encode(&script, None)).unwrap();
        let task = &back.sections[0].tasks[0];
        assert_eq!(task.extra.get("Cam").map(String::as_str), Some("first"));
        assert_eq!(task.extra.get("Cam (2)").map(String::as_str), Some("second"));
    }

    #[test]
    fn fields_missing_from_last_header_are_appended() {
        let text = "---\nscriptId: \"s\"\n---\n## A\n| Time |\n| --- |\n| 0:01 |\n\n| Content |\n| --- |\n| b |\n";
        let script = decode(text).unwrap();

        let md = Encoder::new().with_clock(clock()).encode(&script, None);
        assert!(md.contains("| Content | 时间轴 |\n"));

        let back = decode(&md).unwrap();
        assert_eq!(back.sections[0].tasks[0].timestamp, "0:01");
        assert_eq!(back.sections[0].tasks[1].content, "b");
    }

    #[test]
    fn extra_key_named_like_a_field_stays_extra() {
        let mut script = sample();
        script.sections[0].header = Some(vec!["Timestamp".to_string()]);
        let task = &mut script.sections[0].tasks[0];
        task.content.clear();
        task.dialogue.clear();
        task.extra.insert("Notes".to_string(), "aside".to_string());

        let md = Encoder::new().with_clock(clock()).encode(&script, None);
        let back = decode(&md).unwrap();
        let task = &back.sections[0].tasks[0];

        assert_eq!(task.notes, "");
        assert_eq!(task.extra.get("Notes").map(String::as_str), Some("aside"));
    }

    #[test]
    fn untitled_section_keeps_heading_space() {
        let mut script = sample();
        script.sections[0].title.clear();
        let md = Encoder::new().with_clock(clock()).encode(&script, None);

        assert!(md.contains("\n## \n\n<!-- TABLE_START -->"));
        let back = decode(&md).unwrap();
        assert_eq!(back.sections.len(), 1);
        assert_eq!(back.sections[0].title, "");
        assert_eq!(back.sections[0].tasks.len(), 1);
    }

    #[test]
    fn output_is_deterministic_for_fixed_clock() {
        let encoder = Encoder::new().with_clock(clock());
        let script = sample();
        let progress = Some(Progress::of(&script));
        assert_eq!(
            encoder.encode(&script, progress),
            encoder.encode(&script, progress)
        );
    }
}
