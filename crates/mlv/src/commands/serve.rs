//! `mlv serve` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mlv_config::{CliSettings, Config};
use mlv_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover mlv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directory (overrides config).
    #[arg(short = 's', long)]
    content_dir: Option<PathBuf>,

    /// Progress directory (overrides config).
    #[arg(long)]
    progress_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (info-level logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            content_root: self.content_dir,
            progress_dir: self.progress_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        ensure_progress_dir(&config.progress.dir)?;

        output.highlight(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Content directory: {}",
            config.content.root.display()
        ));
        output.info(&format!(
            "Progress directory: {}",
            config.progress.dir.display()
        ));
        if !config.content.root.is_dir() {
            output.warning("Content directory does not exist; every page will be not found");
        }

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        output.success("Server stopped");
        Ok(())
    }
}

/// Create the progress directory, with a `.gitignore` when it is new.
fn ensure_progress_dir(dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| CliError::Server(format!("Failed to create progress directory: {e}")))?;

    let gitignore_path = dir.join(".gitignore");
    if !gitignore_path.exists() {
        let _ = std::fs::write(&gitignore_path, "# Automatically created by mlv\n*\n");
    }

    Ok(())
}
