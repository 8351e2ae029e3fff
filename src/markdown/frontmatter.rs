//! Frontmatter block
//!
//! A script file opens with a `---` line, `key: value` lines and a closing
//! `---` line. Values may be wrapped in quotes; the first colon splits key
//! from value so timestamps like `12:30` survive.

use tracing::trace;

use super::decoder::{DecodeContext, DecodeError, Line};
use super::diagnostic::Diagnostic;
use crate::domain::ScriptMeta;

/// Parsed frontmatter and where the body starts
#[derive(Debug)]
pub(crate) struct Frontmatter {
    pub meta: ScriptMeta,

    /// Index into the line slice of the first body line
    pub body_start: usize,
}

pub(crate) fn parse(
    lines: &[Line<'_>],
    ctx: &mut DecodeContext,
) -> Result<Frontmatter, DecodeError> {
    match lines.first() {
        Some(first) if is_delimiter(first.text) => {}
        _ => return Err(DecodeError::MissingFrontmatter),
    }

    let close = lines
        .iter()
        .skip(1)
        .position(|l| is_delimiter(l.text))
        .map(|pos| pos + 1)
        .ok_or(DecodeError::MissingFrontmatter)?;

    let mut meta = ScriptMeta::new();
    for line in &lines[1..close] {
        let Some((key, value)) = line.text.split_once(':') else {
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            ctx.warn(Diagnostic::EmptyMetadataKey { line: line.number });
            continue;
        }

        if ScriptMeta::is_derived_key(key) {
            trace!("dropping derived frontmatter key {}", key);
            continue;
        }

        meta.set(key, unquote(value.trim()));
    }

    if meta.script_id().is_none() {
        return Err(DecodeError::MissingScriptId);
    }

    Ok(Frontmatter {
        meta,
        body_start: close + 1,
    })
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Strips one matching pair of surrounding quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
