//! `mlv progress` subcommand group.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use mlv_config::{CliSettings, Config};
use mlv_progress::{ProgressStore, quiz_id};

use crate::error::CliError;
use crate::output::Output;

/// Options shared by progress commands.
#[derive(Args)]
pub(crate) struct ProgressArgs {
    /// Path to configuration file (default: auto-discover mlv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Progress directory (overrides config).
    #[arg(long)]
    progress_dir: Option<PathBuf>,
}

impl ProgressArgs {
    fn open_store(&self) -> Result<ProgressStore, CliError> {
        let cli_settings = CliSettings {
            progress_dir: self.progress_dir.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        Ok(ProgressStore::open(config.progress.dir))
    }
}

/// Progress commands.
#[derive(Subcommand)]
pub(crate) enum ProgressCommand {
    /// Print done lessons and quiz completion.
    Show {
        #[command(flatten)]
        args: ProgressArgs,
    },
    /// Mark a lesson done, or undo it.
    Toggle {
        #[command(flatten)]
        args: ProgressArgs,
        /// Lesson slug.
        slug: String,
    },
    /// Record the answer to a quiz question.
    Answer {
        #[command(flatten)]
        args: ProgressArgs,
        /// Lesson slug.
        slug: String,
        /// Question text.
        question: String,
        /// Index of the selected option.
        selected: u32,
        /// Whether the selected option is correct.
        #[arg(long)]
        correct: bool,
    },
    /// Record how many questions a lesson's quiz has.
    Total {
        #[command(flatten)]
        args: ProgressArgs,
        /// Lesson slug.
        slug: String,
        /// Number of questions.
        total: u32,
    },
}

impl ProgressCommand {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        match self {
            Self::Show { args } => {
                let store = args.open_store()?;
                output.json(&store.snapshot())?;
            }
            Self::Toggle { args, slug } => {
                let store = args.open_store()?;
                let done = store.toggle_done(&slug)?;
                if done.contains(&slug) {
                    output.success(&format!("Marked {slug} as done"));
                } else {
                    output.info(&format!("Marked {slug} as not done"));
                }
                output.json(&done)?;
            }
            Self::Answer {
                args,
                slug,
                question,
                selected,
                correct,
            } => {
                let store = args.open_store()?;
                store.set_quiz_answer(&slug, &quiz_id(&slug, &question), selected, correct)?;
                report_completion(&output, &store, &slug)?;
            }
            Self::Total { args, slug, total } => {
                let store = args.open_store()?;
                store.set_quiz_total(&slug, total)?;
                report_completion(&output, &store, &slug)?;
            }
        }
        Ok(())
    }
}

fn report_completion(output: &Output, store: &ProgressStore, slug: &str) -> Result<(), CliError> {
    let completion = store.quiz_completion(slug);
    if completion.completed {
        output.success(&format!("Quiz for {slug} complete"));
    }
    output.json(&completion)?;
    Ok(())
}
