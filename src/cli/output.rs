//! Output formatting for CLI commands

use serde::Serialize;

use crate::markdown::Diagnostic;

pub use crate::storage::OutputFormat;

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                // Callers normally render text themselves; pretty JSON is the fallback
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Prints a decode finding, prefixed with the file it came from
    pub fn diagnostic(&self, source: &str, diagnostic: &Diagnostic) {
        match self.format {
            OutputFormat::Text => match diagnostic.line() {
                Some(line) => eprintln!("warning: {}:{}: {}", source, line, strip_line(diagnostic)),
                None => eprintln!("warning: {}: {}", source, diagnostic),
            },
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(diagnostic) {
                    eprintln!("{}", json);
                }
            }
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}

/// Drops the `line N: ` prefix when the location is printed separately
pub(super) fn strip_line(diagnostic: &Diagnostic) -> String {
    let text = diagnostic.to_string();
    match text.split_once(": ") {
        Some((prefix, rest)) if prefix.starts_with("line ") => rest.to_string(),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_line_removes_location_prefix() {
        let diagnostic = Diagnostic::MalformedTable { line: 7 };
        assert_eq!(
            strip_line(&diagnostic),
            "table has no '---' separator row and was skipped"
        );
    }
}
