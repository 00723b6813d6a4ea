//! URL path resolution.
//!
//! Resolution runs in a fixed order:
//!
//! 1. the legacy redirect table,
//! 2. the linear-algebra virtual chapter,
//! 3. standalone collections under the machine-learning section,
//! 4. the generic `section/group/lesson/feature` matcher over the catalog.

use mlv_content::{ContentError, Feature, INTRODUCTION, LessonMeta, by_order_then_title};

use crate::catalog::{Catalog, normalize_chapter};
use crate::labels::{display_section_label, group_label};
use crate::page::{
    CollectionPage, FeaturePage, LessonPage, OverviewCard, OverviewPage, PageLink, Resolution,
    neighbours,
};
use crate::paths::{
    MODULES_PREFIX, OVERVIEW, feature_path, lesson_path, meta_segments, overview_path_for,
    to_path_segment,
};
use crate::redirects::find_redirect;
use crate::site::Site;
use crate::toc::extract_toc;

/// Section segment standalone collections are published under.
pub const COLLECTION_SECTION: &str = "machine-learning";

/// Lesson segment every long-form linear-algebra URL funnels through.
pub const LINEAR_ALGEBRA_NOMINAL_LESSON: &str = "eigen";

/// Error returned when a path cannot be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No content matches the path.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Reading content failed.
    #[error(transparent)]
    Content(#[from] ContentError),
}

impl ResolveError {
    fn not_found(path: &[&str]) -> Self {
        Self::NotFound(format!("{MODULES_PREFIX}/{}", path.join("/")))
    }
}

type Resolved = Result<Resolution, ResolveError>;

fn lesson_link(meta: &LessonMeta) -> PageLink {
    PageLink {
        title: meta.title.clone(),
        href: lesson_path(meta),
    }
}

fn lesson_card(meta: &LessonMeta) -> OverviewCard {
    OverviewCard {
        slug: meta.slug.clone(),
        title: meta.nav_title().to_owned(),
        summary: meta.summary.clone(),
        href: lesson_path(meta),
        order: meta.order,
    }
}

impl Site {
    /// Resolve a URL path such as `/modules/optimization/convexity/sets`.
    ///
    /// Trailing slashes are ignored.
    pub fn resolve(&self, path: &str) -> Resolved {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let normalized = format!("/{}", segments.join("/"));

        if let Some((location, permanent)) = find_redirect(&normalized) {
            tracing::debug!(from = %normalized, to = %location, "Legacy redirect");
            return Ok(Resolution::redirect(location, permanent));
        }

        let Some((&"modules", rest)) = segments.split_first() else {
            return Err(ResolveError::NotFound(normalized));
        };
        self.resolve_segments(rest)
    }

    /// Resolve the segments following `/modules`.
    pub fn resolve_segments(&self, segments: &[&str]) -> Resolved {
        let Some((&first, rest)) = segments.split_first() else {
            return Err(ResolveError::not_found(segments));
        };

        if first == Self::linear_algebra_segment() {
            return self.resolve_linear_algebra(rest);
        }

        if first == COLLECTION_SECTION
            && let Some((&second, tail)) = rest.split_first()
            && let Some(name) = self.collection_for_segment(second)
        {
            return self.resolve_collection(&name, second, tail);
        }

        match *segments {
            [section, OVERVIEW] => self.resolve_overview(section, section),
            [section, group, OVERVIEW] => self.resolve_overview(section, group),
            [section, lesson] => self.resolve_lesson(section, section, lesson),
            [section, group, lesson] => match self.resolve_lesson(section, group, lesson) {
                Err(ResolveError::NotFound(_)) => {
                    self.resolve_feature(section, section, group, lesson)
                }
                other => other,
            },
            [section, group, lesson, feature] => {
                self.resolve_feature(section, group, lesson, feature)
            }
            _ => Err(ResolveError::not_found(segments)),
        }
    }

    /// Lessons of a chapter as the catalog sees them.
    fn chapter_lessons(&self, chapter: &str) -> Result<Vec<LessonMeta>, ContentError> {
        let lessons = self.store.lessons(chapter)?;
        Ok(normalize_chapter(chapter, lessons, &self.config))
    }

    /// Find a lesson by route and re-verify it against its own chapter.
    fn locate(
        &self,
        section: &str,
        group: &str,
        slug: &str,
    ) -> Result<(String, Vec<LessonMeta>, usize), ResolveError> {
        let catalog = self.catalog()?;
        let not_found = || ResolveError::not_found(&[section, group, slug]);

        let chapter = catalog
            .find_by_route(section, group, slug)
            .ok_or_else(not_found)?
            .chapter
            .clone();

        let lessons = self.chapter_lessons(&chapter)?;
        let index = lessons
            .iter()
            .position(|l| l.slug == slug)
            .ok_or_else(not_found)?;

        let (s, g) = meta_segments(&lessons[index]);
        if s != section || g != group {
            return Err(not_found());
        }
        Ok((chapter, lessons, index))
    }

    fn resolve_lesson(&self, section: &str, group: &str, slug: &str) -> Resolved {
        let (chapter, lessons, index) = self.locate(section, group, slug)?;
        let target = &lessons[index];

        if self.store.has_introduction(&chapter, slug) {
            return Ok(Resolution::redirect(
                feature_path(target, INTRODUCTION),
                false,
            ));
        }

        let lesson = self.store.lesson(&chapter, slug)?;
        let (prev, next) = neighbours(&lessons, index);

        Ok(Resolution::Lesson(LessonPage {
            label: display_section_label(target.group_or_section()).to_owned(),
            meta: target.clone(),
            toc: extract_toc(&lesson.body),
            body: lesson.body,
            prev: prev.map(lesson_link),
            next: next.map(lesson_link),
            chapter,
        }))
    }

    fn resolve_feature(&self, section: &str, group: &str, slug: &str, feature: &str) -> Resolved {
        let (chapter, lessons, index) = self.locate(section, group, slug)?;
        let target = &lessons[index];
        let not_found = || ResolveError::not_found(&[section, group, slug, feature]);

        if !self.store.has_introduction(&chapter, slug) {
            return Err(not_found());
        }

        let features = self.store.features(&chapter, slug)?;
        let position = features
            .iter()
            .position(|f| f.slug == feature)
            .ok_or_else(not_found)?;
        let doc = self.store.feature(&chapter, slug, feature)?;

        let link = |f: &Feature| PageLink {
            title: f.label.clone(),
            href: feature_path(target, &f.slug),
        };
        let (prev, next) = neighbours(&features, position);

        Ok(Resolution::Feature(FeaturePage {
            label: display_section_label(target.group_or_section()).to_owned(),
            lesson: target.clone(),
            feature: features[position].clone(),
            tabs: features.iter().map(link).collect(),
            toc: extract_toc(&doc.body),
            body: doc.body,
            prev: prev.map(link),
            next: next.map(link),
            chapter,
        }))
    }

    fn resolve_overview(&self, section: &str, group: &str) -> Resolved {
        let catalog = self.catalog()?;
        overview_of(&catalog, section, group)
            .ok_or_else(|| ResolveError::not_found(&[section, group, OVERVIEW]))
            .map(Resolution::Overview)
    }

    fn resolve_linear_algebra(&self, rest: &[&str]) -> Resolved {
        let segment = Self::linear_algebra_segment();
        match *rest {
            [OVERVIEW] => self.linear_algebra_overview(),
            [slug] => self.linear_algebra_lesson(slug),
            [group, LINEAR_ALGEBRA_NOMINAL_LESSON] if group == segment => {
                let mut lessons = self.chapter_lessons(&self.config.linear_algebra_chapter)?;
                lessons.sort_by(by_order_then_title);
                let first = lessons.first().ok_or_else(|| {
                    ResolveError::not_found(&[&segment, group, LINEAR_ALGEBRA_NOMINAL_LESSON])
                })?;
                Ok(Resolution::redirect(lesson_path(first), false))
            }
            [group, LINEAR_ALGEBRA_NOMINAL_LESSON, slug] if group == segment => {
                self.linear_algebra_lesson(slug)
            }
            _ => {
                let mut path = vec![segment.as_str()];
                path.extend_from_slice(rest);
                Err(ResolveError::not_found(&path))
            }
        }
    }

    fn linear_algebra_overview(&self) -> Resolved {
        let segment = Self::linear_algebra_segment();
        let mut lessons = self.chapter_lessons(&self.config.linear_algebra_chapter)?;
        if lessons.is_empty() {
            return Err(ResolveError::not_found(&[&segment, OVERVIEW]));
        }
        lessons.sort_by(by_order_then_title);

        Ok(Resolution::Overview(OverviewPage {
            title: group_label(&segment),
            href: overview_path_for(&segment, &segment),
            lessons: lessons.iter().map(lesson_card).collect(),
        }))
    }

    /// Resolve a linear-algebra lesson from a loosely spelled slug.
    ///
    /// The slug is lower-cased and trimmed, then tried as is, with `-` as
    /// `_`, and with `_` as `-`.
    fn linear_algebra_lesson(&self, raw: &str) -> Resolved {
        let segment = Self::linear_algebra_segment();
        let normalized = raw.trim().to_lowercase();
        if normalized == INTRODUCTION {
            return Ok(Resolution::redirect(
                overview_path_for(&segment, &segment),
                false,
            ));
        }

        let chapter = self.config.linear_algebra_chapter.clone();
        let mut lessons = self.chapter_lessons(&chapter)?;
        lessons.sort_by(by_order_then_title);

        let candidates = [
            normalized.clone(),
            normalized.replace('-', "_"),
            normalized.replace('_', "-"),
        ];
        let index = lessons
            .iter()
            .position(|l| candidates.contains(&l.slug))
            .ok_or_else(|| ResolveError::not_found(&[&segment, raw]))?;

        let target = &lessons[index];
        let lesson = self.store.lesson(&chapter, &target.slug)?;
        let (prev, next) = neighbours(&lessons, index);

        Ok(Resolution::Lesson(LessonPage {
            label: group_label(&segment),
            meta: target.clone(),
            toc: extract_toc(&lesson.body),
            body: lesson.body,
            prev: prev.map(lesson_link),
            next: next.map(lesson_link),
            chapter,
        }))
    }

    fn collection_for_segment(&self, segment: &str) -> Option<String> {
        self.config
            .collections
            .iter()
            .find(|name| to_path_segment(name) == segment)
            .cloned()
    }

    fn resolve_collection(&self, name: &str, segment: &str, rest: &[&str]) -> Resolved {
        let base = format!("{MODULES_PREFIX}/{COLLECTION_SECTION}/{segment}");
        let href = |slug: &str| format!("{base}/{slug}");
        let not_found = || {
            let mut path = vec![COLLECTION_SECTION, segment];
            path.extend_from_slice(rest);
            ResolveError::not_found(&path)
        };

        let entries = match self.store.collection(name) {
            Ok(entries) => entries,
            Err(e) if e.is_not_found() => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        let cards: Vec<OverviewCard> = entries
            .iter()
            .map(|e| OverviewCard {
                slug: e.slug.clone(),
                title: e.title.clone(),
                summary: e.summary.clone(),
                href: href(&e.slug),
                order: Some(e.order),
            })
            .collect();

        match *rest {
            [] => Ok(Resolution::redirect(href(OVERVIEW), false)),
            [OVERVIEW] => Ok(Resolution::Overview(OverviewPage {
                title: group_label(segment),
                href: href(OVERVIEW),
                lessons: cards,
            })),
            [slug] => {
                let doc = match self.store.collection_document(name, slug) {
                    Ok(doc) => doc,
                    Err(e) if e.is_not_found() => return Err(not_found()),
                    Err(e) => return Err(e.into()),
                };
                let index = cards.iter().position(|c| c.slug == slug);
                let (prev, next) = index.map_or((None, None), |i| neighbours(&cards, i));
                let link = |c: &OverviewCard| PageLink {
                    title: c.title.clone(),
                    href: c.href.clone(),
                };

                Ok(Resolution::Collection(CollectionPage {
                    collection: name.to_owned(),
                    slug: slug.to_owned(),
                    title: doc
                        .front_matter
                        .title
                        .clone()
                        .unwrap_or_else(|| slug.to_owned()),
                    summary: doc.front_matter.summary.clone(),
                    position: index.map(|i| i + 1),
                    toc: extract_toc(&doc.body),
                    body: doc.body,
                    prev: prev.map(link),
                    next: next.map(link),
                    lessons: cards,
                }))
            }
            _ => Err(not_found()),
        }
    }
}

/// Overview of one group: its lessons sorted by order.
fn overview_of(catalog: &Catalog, section: &str, group: &str) -> Option<OverviewPage> {
    let mut lessons: Vec<&LessonMeta> = catalog
        .lessons()
        .filter(|lesson| {
            let (s, g) = meta_segments(lesson);
            s == section && g == group
        })
        .collect();
    if lessons.is_empty() {
        return None;
    }
    lessons.sort_by(|a, b| by_order_then_title(a, b));

    Some(OverviewPage {
        title: group_label(group),
        href: overview_path_for(section, group),
        lessons: lessons.into_iter().map(lesson_card).collect(),
    })
}
