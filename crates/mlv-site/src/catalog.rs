//! Merged lesson catalog across chapters.

use std::collections::HashSet;

use mlv_content::{ContentError, ContentStore, LessonMeta};
use rayon::prelude::*;

use crate::paths::meta_segments;
use crate::site::SiteConfig;

/// Section and group every lesson of the linear-algebra chapter is filed under.
pub const LINEAR_ALGEBRA_LABEL: &str = "Linear Algebra";

/// A lesson together with the chapter directory it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub chapter: String,
    pub lesson: LessonMeta,
}

/// All lessons of all chapters, in chapter order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Load every chapter of the store.
    ///
    /// Chapters are read in parallel; a chapter that fails to load is logged
    /// and contributes no lessons. Only a failure to enumerate chapters is
    /// returned.
    pub fn load(store: &dyn ContentStore, config: &SiteConfig) -> Result<Self, ContentError> {
        let chapters = order_chapters(store.chapters()?, config);

        let loaded: Vec<Vec<CatalogEntry>> = chapters
            .par_iter()
            .map(|chapter| load_chapter(store, chapter, config))
            .collect();

        let catalog = Self::from_entries(loaded.into_iter().flatten().collect());
        tracing::debug!(
            chapters = chapters.len(),
            lessons = catalog.len(),
            "Loaded catalog"
        );
        catalog.warn_duplicates();
        Ok(catalog)
    }

    #[must_use]
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn lessons(&self) -> impl Iterator<Item = &LessonMeta> {
        self.entries.iter().map(|entry| &entry.lesson)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose slug and normalized section/group match the
    /// requested segments.
    pub fn find_by_route(&self, section: &str, group: &str, lesson: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| {
            entry.lesson.slug == lesson && {
                let (s, g) = meta_segments(&entry.lesson);
                s == section && g == group
            }
        })
    }

    fn warn_duplicates(&self) {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            let (section, group) = meta_segments(&entry.lesson);
            if !seen.insert((section, group, entry.lesson.slug.as_str())) {
                tracing::warn!(
                    chapter = %entry.chapter,
                    slug = %entry.lesson.slug,
                    "Duplicate lesson route, earlier chapter wins"
                );
            }
        }
    }
}

/// Drop collections and order chapters: configured priority first, then
/// alphabetical.
fn order_chapters(mut chapters: Vec<String>, config: &SiteConfig) -> Vec<String> {
    chapters.retain(|chapter| !config.collections.contains(chapter));
    chapters.sort_by_key(|chapter| {
        let rank = config
            .chapter_priority
            .iter()
            .position(|p| p == chapter)
            .unwrap_or(usize::MAX);
        (rank, chapter.clone())
    });
    chapters
}

fn load_chapter(store: &dyn ContentStore, chapter: &str, config: &SiteConfig) -> Vec<CatalogEntry> {
    let lessons = match store.lessons(chapter) {
        Ok(lessons) => lessons,
        Err(e) => {
            tracing::warn!(chapter, error = %e, "Skipping chapter that failed to load");
            return Vec::new();
        }
    };

    normalize_chapter(chapter, lessons, config)
        .into_iter()
        .map(|lesson| CatalogEntry {
            chapter: chapter.to_owned(),
            lesson,
        })
        .collect()
}

/// Apply chapter-specific filing rules to a chapter listing.
///
/// Lessons of the linear-algebra chapter are all filed under
/// [`LINEAR_ALGEBRA_LABEL`].
pub(crate) fn normalize_chapter(
    chapter: &str,
    mut lessons: Vec<LessonMeta>,
    config: &SiteConfig,
) -> Vec<LessonMeta> {
    if chapter == config.linear_algebra_chapter {
        for lesson in &mut lessons {
            LINEAR_ALGEBRA_LABEL.clone_into(&mut lesson.section);
            lesson.group = Some(LINEAR_ALGEBRA_LABEL.to_owned());
        }
    }
    lessons
}
