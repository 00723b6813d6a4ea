//! State shared by all request handlers.

use std::sync::Arc;

use mlv_progress::ProgressStore;
use mlv_site::Site;

use crate::progress_events::ProgressBroadcaster;

pub(crate) struct AppState {
    /// Catalog, navigation and routing over the content store.
    pub(crate) site: Site,
    pub(crate) progress: Arc<ProgressStore>,
    /// Fan-out of progress notifications to WebSocket clients.
    pub(crate) broadcaster: ProgressBroadcaster,
    /// Mixed into `ETag`s so a new build invalidates cached responses.
    pub(crate) version: String,
}
