//! Catalog, navigation and routing for the mlv learning site.
//!
//! This crate provides:
//! - [`Site`]: catalog loading, navigation and URL resolution over a
//!   [`ContentStore`](mlv_content::ContentStore)
//! - canonical path computation ([`lesson_path`], [`to_path_segment`])
//! - the legacy redirect table and table-of-contents extraction
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use mlv_content::FsContentStore;
//! use mlv_site::{Site, SiteConfig};
//!
//! let store = Arc::new(FsContentStore::new(PathBuf::from("content")));
//! let site = Site::new(store, SiteConfig::default());
//!
//! let nav = site.navigation()?;
//! let page = site.resolve("/modules/machine-learning/algorithms/perceptron")?;
//! ```

mod catalog;
mod labels;
mod navigation;
mod page;
mod paths;
mod redirects;
mod routes;
mod site;
mod toc;

pub use catalog::{Catalog, CatalogEntry, LINEAR_ALGEBRA_LABEL};
pub use labels::{display_section_label, group_label, is_lectures_section, section_key};
pub use navigation::{NavConfig, NavGroup, NavItem, NavSection, build_navigation, is_active};
pub use page::{
    CollectionPage, FeaturePage, LessonPage, OverviewCard, OverviewPage, PageLink, Resolution,
};
pub use paths::{
    MODULES_PREFIX, OVERVIEW, feature_path, lesson_path, overview_path, segments, to_path_segment,
};
pub use redirects::{LEGACY_REDIRECTS, RedirectRule, find_redirect};
pub use routes::{COLLECTION_SECTION, LINEAR_ALGEBRA_NOMINAL_LESSON, ResolveError};
pub use site::{Site, SiteConfig};
pub use toc::{TocItem, extract_toc, normalize_heading_text};

pub use mlv_content::slugify;
