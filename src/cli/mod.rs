//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `show` | Print the section/chapter/task tree |
//! | `fmt` | Canonical re-export, optionally in place (`--write`) |
//! | `check` | List decoder findings (`--strict` fails on any) |
//! | `progress` | Video and audio completion |
//! | `new` | Create an empty script |
//! | `mark` | Set or clear video/audio flags (`--off` clears) |
//! | `add` | Insert a task row |
//! | `rm` | Remove a task row |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default comes from `default_format` in the global config.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output; `RUST_LOG` controls the
//! library's `tracing` events:
//! ```bash
//! shotlist --verbose check script.md
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod check;
mod edit;
mod export;
mod output;
mod query;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
