//! Resolved page payloads.

use mlv_content::{Feature, LessonMeta};
use serde::Serialize;

use crate::toc::TocItem;

/// Link to a neighbouring page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub title: String,
    pub href: String,
}

/// A single-document lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonPage {
    /// Chapter directory the lesson was read from.
    pub chapter: String,
    /// Header label (group or section display name).
    pub label: String,
    pub meta: LessonMeta,
    /// Raw document body.
    pub body: String,
    pub toc: Vec<TocItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
}

/// One feature of a directory lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeaturePage {
    pub chapter: String,
    pub label: String,
    pub lesson: LessonMeta,
    pub feature: Feature,
    /// Every feature of the lesson, as tabs.
    pub tabs: Vec<PageLink>,
    pub body: String,
    pub toc: Vec<TocItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
}

/// Lesson card on an overview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewCard {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// Landing page of a group or collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewPage {
    pub title: String,
    pub href: String,
    pub lessons: Vec<OverviewCard>,
}

/// A document of a standalone collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionPage {
    pub collection: String,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// 1-based position in the collection, if listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub body: String,
    pub toc: Vec<TocItem>,
    /// The whole track, in order.
    pub lessons: Vec<OverviewCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
}

/// Outcome of resolving a URL path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Resolution {
    Lesson(LessonPage),
    Feature(FeaturePage),
    Overview(OverviewPage),
    Collection(CollectionPage),
    Redirect { location: String, permanent: bool },
}

impl Resolution {
    pub(crate) fn redirect(location: impl Into<String>, permanent: bool) -> Self {
        Self::Redirect {
            location: location.into(),
            permanent,
        }
    }
}

/// Previous and next items around `index`.
pub(crate) fn neighbours<T>(items: &[T], index: usize) -> (Option<&T>, Option<&T>) {
    let prev = index.checked_sub(1).and_then(|i| items.get(i));
    (prev, items.get(index + 1))
}
