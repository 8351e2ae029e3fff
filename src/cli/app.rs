//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{check, edit, export, query};
use crate::domain::{LabelSet, TaskId};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "shotlist")]
#[command(author, version, about = "Checklists for video-production scripts kept in Markdown")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured `default_format`)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of `.shotlist.toml`
    #[arg(long, global = true, env = "SHOTLIST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the sections, chapters and tasks of a script
    Show {
        /// Script file
        file: PathBuf,
    },

    /// Re-export a script in canonical form
    Fmt {
        /// Script file
        file: PathBuf,

        /// Replace the file instead of printing to stdout
        #[arg(long, short)]
        write: bool,

        /// Leave videoProgress/audioProgress out of the frontmatter
        #[arg(long)]
        no_progress: bool,

        /// Column labels for tables without a header of their own
        #[arg(long, value_enum)]
        labels: Option<LabelSet>,
    },

    /// Report everything the decoder had to recover from
    Check {
        /// Script file
        file: PathBuf,

        /// Fail if any problem is found
        #[arg(long)]
        strict: bool,
    },

    /// Show video and audio completion
    Progress {
        /// Script file
        file: PathBuf,
    },

    /// Create an empty script
    New {
        /// Script file to create
        file: PathBuf,

        /// Script ID (scriptId)
        #[arg(long)]
        id: String,

        /// Script title
        #[arg(long)]
        title: String,

        /// Section title (repeatable, in order)
        #[arg(long = "section", short = 's')]
        sections: Vec<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Set completion flags on tasks (both unless --video or --audio)
    Mark {
        /// Script file
        file: PathBuf,

        /// Task IDs
        #[arg(required = true)]
        ids: Vec<TaskId>,

        /// Only the video flag
        #[arg(long)]
        video: bool,

        /// Only the audio flag
        #[arg(long)]
        audio: bool,

        /// Clear the flags instead of setting them
        #[arg(long)]
        off: bool,
    },

    /// Add a task row (to the last section unless placed otherwise)
    Add {
        /// Script file
        file: PathBuf,

        /// Section title
        #[arg(long, short = 's')]
        section: Option<String>,

        /// Chapter title within the section
        #[arg(long, short = 'c')]
        chapter: Option<String>,

        /// Insert right after this task
        #[arg(long, conflicts_with_all = ["section", "chapter", "before"])]
        after: Option<TaskId>,

        /// Insert right before this task
        #[arg(long, conflicts_with_all = ["section", "chapter"])]
        before: Option<TaskId>,

        /// Task ID (default: the next free task-<section>-<n>)
        #[arg(long)]
        id: Option<TaskId>,

        /// Time marker such as 0:15
        #[arg(long, short = 't', default_value = "")]
        timestamp: String,

        /// Picture content
        #[arg(long, default_value = "")]
        content: String,

        /// Narration or dialogue
        #[arg(long, default_value = "")]
        dialogue: String,

        /// Notes
        #[arg(long, default_value = "")]
        notes: String,

        /// Start with the video flag set
        #[arg(long)]
        video: bool,

        /// Start with the audio flag set
        #[arg(long)]
        audio: bool,
    },

    /// Remove a task row
    Rm {
        /// Script file
        file: PathBuf,

        /// Task ID
        id: TaskId,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(config.global.default_format);
    let output = Output::new(format, cli.verbose);

    output.verbose("Shotlist CLI starting");
    if let Some(path) = &config.project_file {
        output.verbose_ctx("config", &format!("Using project config: {}", path.display()));
    }

    match cli.command {
        Commands::Show { file } => {
            output.verbose_ctx("show", &format!("Reading {}", file.display()));
            query::show(&output, &file)?
        }

        Commands::Fmt {
            file,
            write,
            no_progress,
            labels,
        } => {
            let mut settings = config.export();
            if let Some(labels) = labels {
                settings.labels = labels;
            }
            if no_progress {
                settings.include_progress = false;
            }
            output.verbose_ctx(
                "fmt",
                &format!(
                    "Formatting {}: write={}, labels={:?}, progress={}",
                    file.display(),
                    write,
                    settings.labels,
                    settings.include_progress
                ),
            );
            export::fmt(&output, &file, &settings, write)?
        }

        Commands::Check { file, strict } => {
            output.verbose_ctx("check", &format!("Checking {}, strict={}", file.display(), strict));
            check::run(&output, &file, strict)?
        }

        Commands::Progress { file } => {
            output.verbose_ctx("progress", &format!("Computing progress for {}", file.display()));
            query::progress(&output, &file)?
        }

        Commands::New {
            file,
            id,
            title,
            sections,
            force,
        } => {
            output.verbose_ctx("new", &format!("Creating {} with {} section(s)", file.display(), sections.len()));
            let fields = export::NewScript {
                id,
                title,
                sections,
            };
            export::new(&output, &file, &fields, &config.export(), force)?
        }

        Commands::Mark {
            file,
            ids,
            video,
            audio,
            off,
        } => {
            let flags = edit::Flags::from_args(video, audio);
            output.verbose_ctx(
                "mark",
                &format!("{} task(s) in {}, {:?}, off={}", ids.len(), file.display(), flags, off),
            );
            edit::mark(&output, &file, &ids, flags, !off, &config.export())?
        }

        Commands::Add {
            file,
            section,
            chapter,
            after,
            before,
            id,
            timestamp,
            content,
            dialogue,
            notes,
            video,
            audio,
        } => {
            output.verbose_ctx("add", &format!("Adding a task to {}", file.display()));
            let fields = edit::NewTask {
                id,
                section,
                chapter,
                after,
                before,
                timestamp,
                content,
                dialogue,
                notes,
                video,
                audio,
            };
            edit::add(&output, &file, &fields, &config.export())?
        }

        Commands::Rm { file, id } => {
            output.verbose_ctx("rm", &format!("Removing {} from {}", id, file.display()));
            edit::rm(&output, &file, &id, &config.export())?
        }
    }

    Ok(())
}

/// Installs the stderr log subscriber; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "shotlist=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when run() is called twice in-process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
