//! `mlv nav` command implementation.

use clap::Args;

use super::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    #[command(flatten)]
    content: ContentArgs,

    /// Print every canonical route instead of the navigation tree.
    #[arg(long)]
    routes: bool,
}

impl NavArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let site = self.content.load_site()?;

        if self.routes {
            let routes = site.static_routes()?;
            if routes.is_empty() {
                output.warning("No routes: the content directory has no lessons");
            }
            for route in &routes {
                output.data(route);
            }
            return Ok(());
        }

        let groups = site.navigation()?;
        if groups.is_empty() {
            output.warning("Navigation is empty: the content directory has no lessons");
        }
        output.json(&serde_json::json!({ "groups": groups }))?;
        Ok(())
    }
}
