//! Lesson content storage for the mlv learning site.
//!
//! This crate defines the [`ContentStore`] contract used by the site layer to
//! enumerate chapters, list lessons and read lesson, feature and collection
//! documents, along with the front-matter schema shared by every backend.
//!
//! # Backends
//!
//! - [`FsContentStore`] reads `.mdx` documents below a content root.
//! - `MockContentStore` (feature `mock`) keeps everything in memory.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use mlv_content::{ContentStore, FsContentStore};
//!
//! let store = FsContentStore::new(PathBuf::from("content"));
//! for chapter in store.chapters()? {
//!     for lesson in store.lessons(&chapter)? {
//!         println!("{chapter}/{}: {}", lesson.slug, lesson.title);
//!     }
//! }
//! ```

mod error;
mod frontmatter;
mod fs;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod slug;
mod store;

pub use error::{ContentError, ContentErrorKind};
pub use frontmatter::{FeatureSpec, FrontMatter, parse_document, split_front_matter};
pub use fs::FsContentStore;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockContentStore;
pub use slug::{slugify, titlecase_from_slug};
pub use store::{
    COLLECTION_ORDER_DEFAULT, CollectionEntry, ContentStore, DEFAULT_SECTION, Document, Feature,
    INTRODUCTION, Lesson, LessonMeta, ORDER_SENTINEL, by_order_then_title, sort_collection,
    sort_feature_slugs, sort_lessons,
};
