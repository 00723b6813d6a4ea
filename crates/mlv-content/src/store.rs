//! Content store contract and the data it yields.
//!
//! A content root holds one directory per chapter. Inside a chapter a lesson
//! is either a single `{slug}.mdx` document or a `{slug}/` directory with an
//! `introduction.mdx` and further feature documents. Standalone collections
//! are flat directories of `{slug}.mdx` documents that the chapter scan
//! leaves alone.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::ContentError;
use crate::frontmatter::FrontMatter;

/// Section used when a document declares none.
pub const DEFAULT_SECTION: &str = "Lectures";

/// Sort key for lessons without an explicit order.
pub const ORDER_SENTINEL: i64 = 9999;

/// Sort key for collection documents without an explicit order.
pub const COLLECTION_ORDER_DEFAULT: i64 = 999;

/// Name of the first feature of a directory lesson.
pub const INTRODUCTION: &str = "introduction";

/// Metadata of one lesson, built from its front matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonMeta {
    pub slug: String,
    pub title: String,
    pub chapter: String,
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub disabled: bool,
    pub exact: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Feature>,
}

impl LessonMeta {
    /// Create metadata with defaults for everything but slug and chapter.
    #[must_use]
    pub fn new(chapter: impl Into<String>, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            title: slug.clone(),
            slug,
            chapter: chapter.into(),
            section: DEFAULT_SECTION.to_owned(),
            group: None,
            order: None,
            summary: None,
            nav_label: None,
            icon_key: None,
            badge: None,
            disabled: false,
            exact: false,
            features: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon_key: impl Into<String>) -> Self {
        self.icon_key = Some(icon_key.into());
        self
    }

    #[must_use]
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    /// Group name, falling back to the section.
    pub fn group_or_section(&self) -> &str {
        self.group.as_deref().unwrap_or(&self.section)
    }

    /// Order used for sorting; absent orders sort last.
    pub fn sort_order(&self) -> i64 {
        self.order.unwrap_or(ORDER_SENTINEL)
    }

    /// Label shown in navigation.
    pub fn nav_title(&self) -> &str {
        self.nav_label.as_deref().unwrap_or(&self.title)
    }
}

/// Compare lessons by order, then title.
pub fn by_order_then_title(a: &LessonMeta, b: &LessonMeta) -> Ordering {
    a.sort_order()
        .cmp(&b.sort_order())
        .then_with(|| a.title.cmp(&b.title))
}

/// Sort a chapter listing by section, order, then title.
pub fn sort_lessons(lessons: &mut [LessonMeta]) {
    lessons.sort_by(|a, b| {
        a.section
            .cmp(&b.section)
            .then_with(|| by_order_then_title(a, b))
    });
}

/// A named sub-page of a directory lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub label: String,
    pub slug: String,
}

impl Feature {
    #[must_use]
    pub fn new(label: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            slug: slug.into(),
        }
    }
}

/// Order discovered feature slugs: `introduction` first, the rest alphabetical.
pub fn sort_feature_slugs(slugs: &mut [String]) {
    slugs.sort_by(|a, b| {
        (a != INTRODUCTION)
            .cmp(&(b != INTRODUCTION))
            .then_with(|| a.cmp(b))
    });
}

/// A lesson with its body source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub meta: LessonMeta,
    pub body: String,
}

/// A standalone document (feature page or collection entry).
#[derive(Debug, Clone)]
pub struct Document {
    pub front_matter: FrontMatter,
    pub body: String,
}

impl Document {
    #[must_use]
    pub fn new(front_matter: FrontMatter, body: impl Into<String>) -> Self {
        Self {
            front_matter,
            body: body.into(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.front_matter.title.as_deref()
    }
}

/// Listing entry of a standalone collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionEntry {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub order: i64,
}

impl CollectionEntry {
    /// Build an entry from front matter, defaulting the title to the slug.
    #[must_use]
    pub fn from_front_matter(slug: &str, front_matter: &FrontMatter) -> Self {
        Self {
            slug: slug.to_owned(),
            title: front_matter
                .title
                .clone()
                .unwrap_or_else(|| slug.to_owned()),
            summary: front_matter.summary.clone(),
            order: front_matter.order.unwrap_or(COLLECTION_ORDER_DEFAULT),
        }
    }
}

/// Sort a collection listing by order, then slug.
pub fn sort_collection(entries: &mut [CollectionEntry]) {
    entries.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.slug.cmp(&b.slug)));
}

/// Read access to lesson content.
///
/// Every call reads the backing source afresh; nothing is cached between
/// calls.
pub trait ContentStore: Send + Sync {
    /// Chapter directory names, sorted.
    fn chapters(&self) -> Result<Vec<String>, ContentError>;

    /// Lessons of a chapter, sorted by section, order, then title.
    ///
    /// Documents whose front matter cannot be parsed are skipped with a
    /// warning.
    fn lessons(&self, chapter: &str) -> Result<Vec<LessonMeta>, ContentError>;

    /// One lesson with its body.
    fn lesson(&self, chapter: &str, slug: &str) -> Result<Lesson, ContentError>;

    /// Whether the lesson is stored as a directory with an introduction.
    fn has_introduction(&self, chapter: &str, slug: &str) -> bool;

    /// Features of a directory lesson; empty for single-document lessons.
    fn features(&self, chapter: &str, slug: &str) -> Result<Vec<Feature>, ContentError>;

    /// One feature document of a directory lesson.
    fn feature(&self, chapter: &str, slug: &str, feature: &str)
    -> Result<Document, ContentError>;

    /// Entries of a standalone collection, sorted by order.
    fn collection(&self, name: &str) -> Result<Vec<CollectionEntry>, ContentError>;

    /// One document of a standalone collection.
    fn collection_document(&self, name: &str, slug: &str) -> Result<Document, ContentError>;
}
