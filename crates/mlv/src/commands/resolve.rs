//! `mlv resolve` command implementation.

use clap::Args;
use mlv_site::Resolution;

use super::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    #[command(flatten)]
    content: ContentArgs,

    /// URL path to resolve (e.g. /modules/machine-learning/overview).
    path: String,
}

impl ResolveArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let site = self.content.load_site()?;

        let resolution = site.resolve(&self.path)?;
        if let Resolution::Redirect {
            location,
            permanent,
        } = &resolution
        {
            let status = if *permanent { 308 } else { 307 };
            output.highlight(&format!("{} -> {location} ({status})", self.path));
        }
        output.json(&resolution)?;
        Ok(())
    }
}
