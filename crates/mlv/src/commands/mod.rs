//! CLI command implementations.

pub(crate) mod nav;
pub(crate) mod progress;
pub(crate) mod resolve;
pub(crate) mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use mlv_config::{CliSettings, Config};
use mlv_content::FsContentStore;
use mlv_server::site_config_from_config;
use mlv_site::Site;

pub(crate) use nav::NavArgs;
pub(crate) use progress::ProgressCommand;
pub(crate) use resolve::ResolveArgs;
pub(crate) use serve::ServeArgs;

use crate::error::CliError;

/// Options shared by commands that read lesson content.
#[derive(Args)]
pub(crate) struct ContentArgs {
    /// Path to configuration file (default: auto-discover mlv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directory (overrides config).
    #[arg(short = 's', long)]
    content_dir: Option<PathBuf>,
}

impl ContentArgs {
    fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            content_root: self.content_dir.clone(),
            ..CliSettings::default()
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Site over the configured content directory.
    fn load_site(&self) -> Result<Site, CliError> {
        let config = self.load_config()?;
        tracing::debug!(root = %config.content.root.display(), "Opening content");
        let store = Arc::new(FsContentStore::new(config.content.root.clone()));
        Ok(Site::new(store, site_config_from_config(&config)))
    }
}
