//! HTTP API server for the mlv learning site.
//!
//! Serves, from an axum router:
//! - navigation and module resolution over the lesson content
//! - progress bookkeeping (done lessons, quiz answers)
//! - a WebSocket stream of progress change notifications
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use mlv_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         content_root: PathBuf::from("content"),
//!         progress_dir: PathBuf::from(".mlv/progress"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Client ──HTTP──► axum router (mlv-server)
//!                      │
//!                      ├─► /api/navigation, /api/modules/* ──► Site ──► FsContentStore
//!                      │
//!                      ├─► /api/progress/* ──► ProgressStore ──► FileBackend
//!                      │
//!                      └─► /ws/progress ◄── broadcast ◄── store events + notify watcher
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod progress_events;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use mlv_content::FsContentStore;
use mlv_progress::ProgressStore;
use mlv_site::{NavConfig, Site, SiteConfig};

use crate::progress_events::ProgressBroadcaster;
use crate::state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding chapter and collection directories.
    pub content_root: PathBuf,
    /// Directory holding persisted progress.
    pub progress_dir: PathBuf,
    /// Catalog, routing and navigation settings.
    pub site: SiteConfig,
    /// Application version, mixed into `ETag`s.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            content_root: PathBuf::from("content"),
            progress_dir: PathBuf::from(".mlv/progress"),
            site: SiteConfig::default(),
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the progress watcher cannot start, the address is
/// invalid, or binding fails.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(FsContentStore::new(config.content_root.clone()));
    let site = Site::new(store, config.site);

    let progress = Arc::new(ProgressStore::open(config.progress_dir.clone()));
    let broadcaster = ProgressBroadcaster::start(&progress, Some(&config.progress_dir))?;

    let state = Arc::new(AppState {
        site,
        progress,
        broadcaster,
        version: config.version,
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        content = %config.content_root.display(),
        progress = %config.progress_dir.display(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Site settings from mlv configuration.
///
/// Unset options keep the site's built-in defaults.
#[must_use]
pub fn site_config_from_config(config: &mlv_config::Config) -> SiteConfig {
    let defaults = SiteConfig::default();
    let nav_defaults = NavConfig::default();
    let content = &config.content;
    let navigation = &config.navigation;

    SiteConfig {
        chapter_priority: content.chapter_priority.clone(),
        collections: content.collections.clone().unwrap_or(defaults.collections),
        linear_algebra_chapter: content
            .linear_algebra_chapter
            .clone()
            .unwrap_or(defaults.linear_algebra_chapter),
        navigation: NavConfig {
            section_order: navigation
                .section_order
                .clone()
                .unwrap_or(nav_defaults.section_order),
            pinned_groups: navigation
                .pinned_groups
                .clone()
                .unwrap_or(nav_defaults.pinned_groups),
        },
    }
}

/// Create server configuration from mlv configuration.
#[must_use]
pub fn server_config_from_config(config: &mlv_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        content_root: config.content.root.clone(),
        progress_dir: config.progress.dir.clone(),
        site: site_config_from_config(config),
        version,
    }
}
