//! Heading hierarchy
//!
//! The body is cut into sections at `## ` lines and each section into
//! chapters at `### ` lines. Anything before the first section (the `# `
//! document title, stray prose) is not part of any group.

use super::decoder::{DecodeContext, Line};
use super::diagnostic::Diagnostic;
use super::table;

/// Lines under a heading, up to the next heading of the same or higher level
#[derive(Debug)]
pub(crate) struct Block<'a> {
    pub title: String,
    pub lines: Vec<Line<'a>>,
}

/// A section's own lines plus its chapter blocks, in document order
#[derive(Debug)]
pub(crate) struct SectionBlock<'a> {
    pub title: String,
    pub lines: Vec<Line<'a>>,
    pub chapters: Vec<Block<'a>>,
}

pub(crate) fn split<'a>(body: &[Line<'a>], ctx: &mut DecodeContext) -> Vec<SectionBlock<'a>> {
    let mut sections: Vec<SectionBlock<'a>> = Vec::new();
    let mut preamble_table_seen = false;

    for line in body {
        if let Some(title) = line.text.strip_prefix("## ") {
            sections.push(SectionBlock {
                title: title.trim().to_string(),
                lines: Vec::new(),
                chapters: Vec::new(),
            });
            continue;
        }

        let Some(section) = sections.last_mut() else {
            preamble_line(line, &mut preamble_table_seen, ctx);
            continue;
        };

        if let Some(title) = line.text.strip_prefix("### ") {
            section.chapters.push(Block {
                title: title.trim().to_string(),
                lines: Vec::new(),
            });
            continue;
        }

        match section.chapters.last_mut() {
            Some(chapter) => chapter.lines.push(*line),
            None => section.lines.push(*line),
        }
    }

    sections
}

/// Records preamble lines that would have carried tasks
fn preamble_line(line: &Line<'_>, table_seen: &mut bool, ctx: &mut DecodeContext) {
    if let Some(title) = line.text.strip_prefix("### ") {
        ctx.warn(Diagnostic::OrphanChapter {
            line: line.number,
            title: title.trim().to_string(),
        });
    } else if !*table_seen && table::looks_like_table(line.text) {
        *table_seen = true;
        ctx.warn(Diagnostic::ContentBeforeSection { line: line.number });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::decoder::lines_of;

    fn split_str(text: &str) -> (Vec<(String, usize, Vec<(String, usize)>)>, Vec<Diagnostic>) {
        let lines = lines_of(text);
        let mut ctx = DecodeContext::default();
        let shape = split(&lines, &mut ctx)
            .into_iter()
            .map(|s| {
                let chapters = s
                    .chapters
                    .into_iter()
                    .map(|c| (c.title, c.lines.len()))
                    .collect();
                (s.title, s.lines.len(), chapters)
            })
            .collect();
        (shape, ctx.into_diagnostics())
    }

    #[test]
    fn splits_sections_and_chapters() {
        let (shape, diags) = split_str(
            "# Title\n\n## A\nline\n### B\nb1\nb2\n### C\n## D\nd\n",
        );

        assert!(diags.is_empty());
        assert_eq!(
            shape,
            vec![
                (
                    "A".to_string(),
                    1,
                    vec![("B".to_string(), 2), ("C".to_string(), 0)]
                ),
                ("D".to_string(), 1, vec![]),
            ]
        );
    }

    #[test]
    fn titles_are_trimmed() {
        let (shape, _) = split_str("##   Spaced  \n###  Inner \n");
        assert_eq!(shape[0].0, "Spaced");
        assert_eq!(shape[0].2[0].0, "Inner");
    }

    #[test]
    fn deeper_headings_stay_in_block() {
        let (shape, _) = split_str("## A\n#### Deep\n##No space\n");
        assert_eq!(shape.len(), 1);
        assert_eq!(shape[0].1, 2);
    }

    #[test]
    fn preamble_is_discarded_with_findings() {
        let (shape, diags) = split_str("### Early\n| a |\n| --- |\nprose\n## A\n");

        assert_eq!(shape.len(), 1);
        assert_eq!(
            diags,
            vec![
                Diagnostic::OrphanChapter {
                    line: 1,
                    title: "Early".to_string()
                },
                Diagnostic::ContentBeforeSection { line: 2 },
            ]
        );
    }
}
