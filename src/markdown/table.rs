//! Task tables
//!
//! Each section or chapter holds its tasks in a pipe table wrapped in
//! `<!-- TABLE_START -->` / `<!-- TABLE_END -->` comment lines. Files from
//! older editor versions have bare tables, so any run of `|` lines outside a
//! marked region is read as a table too.
//!
//! Row 1 is the header, row 2 must be the `---` alignment row, the rest are
//! tasks. Header labels are mapped onto task fields through
//! [`Column::from_label`]; unrecognised columns ride along in `Task::extra`.

use tracing::debug;

use super::decoder::{DecodeContext, Line};
use super::diagnostic::Diagnostic;
use super::marker::Marker;
use crate::domain::{Column, Task};

pub(crate) const TABLE_START: &str = "<!-- TABLE_START -->";
pub(crate) const TABLE_END: &str = "<!-- TABLE_END -->";

/// In-cell stand-in for a newline
pub(crate) const LINE_BREAK: &str = "<br>";

/// Glyph for a completed flag
pub(crate) const CHECKMARK: &str = "✓";

/// Where a header column's cell goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot {
    Field(Column),
    Extra(String),
}

/// Tasks and header recovered from one section or chapter block
#[derive(Debug, Default)]
pub(crate) struct Group {
    pub tasks: Vec<Task>,
    pub header: Option<Vec<String>>,
}

/// Returns true for lines that open a table, marked or bare
pub(crate) fn looks_like_table(text: &str) -> bool {
    let text = text.trim();
    text == TABLE_START || text.starts_with('|')
}

/// Maps header labels to slots; a field claimed twice keeps its first column
///
/// Pass-through columns are keyed by their label. A label seen again gets
/// the first free ` (n)` suffix so no two columns share a key.
pub(crate) fn resolve_header(labels: &[String]) -> Vec<Slot> {
    let mut claimed = Vec::new();
    let mut keys: Vec<String> = Vec::new();

    labels
        .iter()
        .map(|label| match Column::from_label(label) {
            Some(column) if !claimed.contains(&column) => {
                claimed.push(column);
                Slot::Field(column)
            }
            _ => {
                let mut key = label.clone();
                let mut n = 2;
                while keys.contains(&key) {
                    key = format!("{} ({})", label, n);
                    n += 1;
                }
                keys.push(key.clone());
                Slot::Extra(key)
            }
        })
        .collect()
}

/// Splits a table row into cells
///
/// A backslash keeps the next character out of the split, so `\|` never
/// ends a cell. Each cell is trimmed before it is unescaped.
pub(crate) fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut closed = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        closed = false;
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '|' => {
                cells.push(unescape_cell(current.trim()));
                current.clear();
                closed = true;
            }
            _ => current.push(c),
        }
    }
    if !closed {
        cells.push(unescape_cell(current.trim()));
    }

    cells
}

/// Undoes [`escape_cell`]; unknown escapes keep their backslash
fn unescape_cell(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(c) = rest.chars().next() {
        if c == '\\' {
            if let Some(next @ ('\\' | '|' | '<')) = rest[1..].chars().next() {
                out.push(next);
                rest = &rest[2..];
                continue;
            }
        } else if c == '<' {
            if let Some(tag) = BREAK_TAGS.iter().find(|tag| rest.starts_with(*tag)) {
                out.push('\n');
                rest = &rest[tag.len()..];
                continue;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

const BREAK_TAGS: [&str; 3] = [LINE_BREAK, "<br/>", "<br />"];

/// Escapes text for a single table cell
///
/// Backslashes and pipes are backslash-escaped, newlines become `<br>`, and
/// a literal `<br` is escaped so it is not read back as a line break.
pub(crate) fn escape_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for (i, c) in text.char_indices() {
        match c {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            '\n' => out.push_str(LINE_BREAK),
            '<' if text[i..].starts_with("<br") => out.push_str("\\<"),
            _ => out.push(c),
        }
    }

    out
}

/// Reads every table in a block
///
/// `section` is the zero-based index of the owning section, used when
/// minting IDs for rows without a marker.
pub(crate) fn parse_group(lines: &[Line<'_>], section: usize, ctx: &mut DecodeContext) -> Group {
    let mut group = Group::default();

    for rows in regions(lines, ctx) {
        parse_table(&rows, section, ctx, &mut group);
    }

    group
}

/// Collects the row lines of each table region in the block
fn regions<'a>(lines: &[Line<'a>], ctx: &mut DecodeContext) -> Vec<Vec<Line<'a>>> {
    let mut regions = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let text = lines[i].text.trim();

        if text == TABLE_START {
            let start = lines[i].number;
            let mut rows = Vec::new();
            let mut closed = false;
            i += 1;
            while let Some(line) = lines.get(i) {
                i += 1;
                let text = line.text.trim();
                if text == TABLE_END {
                    closed = true;
                    break;
                }
                if text.starts_with('|') {
                    rows.push(*line);
                }
            }
            if !closed {
                ctx.warn(Diagnostic::UnterminatedTable { line: start });
            }
            if rows.is_empty() {
                ctx.warn(Diagnostic::MalformedTable { line: start });
            } else {
                regions.push(rows);
            }
            continue;
        }

        if text.starts_with('|') {
            let mut rows = Vec::new();
            while i < lines.len() && lines[i].text.trim().starts_with('|') {
                rows.push(lines[i]);
                i += 1;
            }
            regions.push(rows);
            continue;
        }

        i += 1;
    }

    regions
}

fn parse_table(rows: &[Line<'_>], section: usize, ctx: &mut DecodeContext, group: &mut Group) {
    let Some(header_row) = rows.first() else {
        return;
    };

    let separated = rows.get(1).is_some_and(|row| row.text.contains("---"));
    if !separated {
        debug!("skipping table without separator at line {}", header_row.number);
        ctx.warn(Diagnostic::MalformedTable {
            line: header_row.number,
        });
        return;
    }

    let header = split_row(header_row.text);
    let slots = resolve_header(&header);

    for (label, slot) in header.iter().zip(&slots) {
        if matches!(slot, Slot::Extra(_)) {
            ctx.warn(Diagnostic::UnknownColumn {
                line: header_row.number,
                label: label.clone(),
            });
        }
    }

    for row in &rows[2..] {
        let mut cells = split_row(row.text);
        if cells.len() > slots.len() {
            ctx.warn(Diagnostic::RowTooWide {
                line: row.number,
                cells: cells.len(),
                columns: slots.len(),
            });
            continue;
        }
        cells.resize(slots.len(), String::new());

        group.tasks.push(build_task(&slots, cells, row.number, section, ctx));
    }

    group.header = Some(header);
}

fn build_task(
    slots: &[Slot],
    mut cells: Vec<String>,
    line: usize,
    section: usize,
    ctx: &mut DecodeContext,
) -> Task {
    let marker = take_marker(slots, &mut cells);

    let mut task = match marker {
        Some(marker) => {
            let mut task = Task::new(marker.id);
            task.video = marker.video;
            task.audio = marker.audio;
            task
        }
        None => {
            let id = ctx.mint(section);
            ctx.warn(Diagnostic::MissingMarker {
                line,
                id: id.clone(),
            });
            let mut task = Task::new(id);
            task.video = flag_cell(slots, &cells, Column::Video);
            task.audio = flag_cell(slots, &cells, Column::Audio);
            task
        }
    };

    for (slot, cell) in slots.iter().zip(cells) {
        match slot {
            Slot::Field(column) if column.is_flag() => {}
            Slot::Field(column) => task.set_text(*column, cell),
            Slot::Extra(_) if cell.is_empty() => {}
            Slot::Extra(key) => {
                task.extra.insert(key.clone(), cell);
            }
        }
    }

    task
}

/// Finds and removes the identity marker
///
/// Only the timestamp cell and then the first cell are searched; a marker
/// quoted in any other cell is plain text.
fn take_marker(slots: &[Slot], cells: &mut [String]) -> Option<Marker> {
    let timestamp = slots
        .iter()
        .position(|s| *s == Slot::Field(Column::Timestamp));

    let mut order = timestamp.into_iter().collect::<Vec<_>>();
    if timestamp != Some(0) && !cells.is_empty() {
        order.push(0);
    }

    for index in order {
        if let Some((marker, rest)) = Marker::strip(&cells[index]) {
            cells[index] = rest;
            return Some(marker);
        }
    }

    None
}

/// Legacy fallback: a visible checkmark in the flag column
fn flag_cell(slots: &[Slot], cells: &[String], column: Column) -> bool {
    slots
        .iter()
        .position(|s| *s == Slot::Field(column))
        .is_some_and(|i| cells[i].contains(CHECKMARK))
}
