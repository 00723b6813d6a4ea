//! Site facade over a content store.

use std::collections::HashSet;
use std::sync::Arc;

use mlv_content::{ContentError, ContentStore};

use crate::catalog::{Catalog, LINEAR_ALGEBRA_LABEL};
use crate::navigation::{NavConfig, NavGroup, build_navigation};
use crate::paths::{MODULES_PREFIX, OVERVIEW, feature_path, lesson_path, overview_path, to_path_segment};
use crate::routes::COLLECTION_SECTION;

/// Configuration for [`Site`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Chapters read first; the rest follow alphabetically.
    pub chapter_priority: Vec<String>,
    /// Flat standalone directories left out of the chapter scan.
    pub collections: Vec<String>,
    /// Chapter served as the linear-algebra virtual chapter.
    pub linear_algebra_chapter: String,
    pub navigation: NavConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            chapter_priority: Vec::new(),
            collections: vec!["mistake-bounded".to_owned()],
            linear_algebra_chapter: "linear_algebra".to_owned(),
            navigation: NavConfig::default(),
        }
    }
}

/// Catalog, navigation and routing over a [`ContentStore`].
///
/// Nothing is cached: every call reads the store afresh, so edits to the
/// content show up on the next request.
pub struct Site {
    pub(crate) store: Arc<dyn ContentStore>,
    pub(crate) config: SiteConfig,
}

impl Site {
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, config: SiteConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Load the merged catalog of every chapter.
    pub fn catalog(&self) -> Result<Catalog, ContentError> {
        Catalog::load(self.store.as_ref(), &self.config)
    }

    /// Build the navigation tree from the current catalog.
    pub fn navigation(&self) -> Result<Vec<NavGroup>, ContentError> {
        let catalog = self.catalog()?;
        Ok(build_navigation(catalog.lessons(), &self.config.navigation))
    }

    /// Every canonical path the site serves.
    ///
    /// Lessons, their features and group overviews come first in catalog
    /// order, followed by the standalone collections.
    pub fn static_routes(&self) -> Result<Vec<String>, ContentError> {
        let catalog = self.catalog()?;
        let mut seen = HashSet::new();
        let mut routes = Vec::new();
        let mut push = |route: String| {
            if seen.insert(route.clone()) {
                routes.push(route);
            }
        };

        for entry in catalog.entries() {
            let lesson = &entry.lesson;
            push(overview_path(lesson));
            push(lesson_path(lesson));
            if entry.chapter == self.config.linear_algebra_chapter
                || !self.store.has_introduction(&entry.chapter, &lesson.slug)
            {
                continue;
            }
            for feature in self.store.features(&entry.chapter, &lesson.slug)? {
                push(feature_path(lesson, &feature.slug));
            }
        }

        for name in &self.config.collections {
            let base = format!(
                "{MODULES_PREFIX}/{COLLECTION_SECTION}/{}",
                to_path_segment(name)
            );
            let entries = match self.store.collection(name) {
                Ok(entries) => entries,
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            };
            push(format!("{base}/{OVERVIEW}"));
            for entry in entries {
                push(format!("{base}/{}", entry.slug));
            }
        }

        tracing::debug!(count = routes.len(), "Collected static routes");
        Ok(routes)
    }

    pub(crate) fn linear_algebra_segment() -> String {
        to_path_segment(LINEAR_ALGEBRA_LABEL)
    }
}
