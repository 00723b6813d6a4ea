//! CLI error types.

use mlv_config::ConfigError;
use mlv_content::ContentError;
use mlv_progress::ProgressError;
use mlv_site::ResolveError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Content(#[from] ContentError),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("{0}")]
    Progress(#[from] ProgressError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Server(String),
}
