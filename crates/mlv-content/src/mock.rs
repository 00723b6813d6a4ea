//! In-memory content store for tests of dependent crates.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::RwLock;

use crate::error::{ContentError, ContentErrorKind};
use crate::frontmatter::FrontMatter;
use crate::store::{
    CollectionEntry, ContentStore, Document, Feature, INTRODUCTION, Lesson, LessonMeta,
    sort_collection, sort_feature_slugs, sort_lessons,
};

const BACKEND: &str = "Mock";

type LessonKey = (String, String);

/// Mock content store.
///
/// Built with the `with_*` methods:
///
/// ```ignore
/// let store = MockContentStore::new()
///     .with_lesson(LessonMeta::new("chapter1", "perceptron").with_order(1), "Body")
///     .with_feature("chapter1", "boosting", "introduction", "Boosting", "Intro");
/// ```
#[derive(Debug, Default)]
pub struct MockContentStore {
    lessons: RwLock<BTreeMap<LessonKey, Lesson>>,
    features: RwLock<BTreeMap<LessonKey, Vec<(Feature, String)>>>,
    collections: RwLock<BTreeMap<String, Vec<(CollectionEntry, String)>>>,
    failing_chapters: RwLock<BTreeSet<String>>,
}

impl MockContentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a lesson.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_lesson(self, meta: LessonMeta, body: impl Into<String>) -> Self {
        let key = (meta.chapter.clone(), meta.slug.clone());
        self.lessons.write().unwrap().insert(
            key,
            Lesson {
                meta,
                body: body.into(),
            },
        );
        self
    }

    /// Add a feature document to a lesson, turning it into a directory lesson
    /// once an `introduction` feature is present.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_feature(
        self,
        chapter: impl Into<String>,
        slug: impl Into<String>,
        feature: impl Into<String>,
        label: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.features
            .write()
            .unwrap()
            .entry((chapter.into(), slug.into()))
            .or_default()
            .push((Feature::new(label, feature), body.into()));
        self
    }

    /// Add a document to a standalone collection.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_collection_document(
        self,
        name: impl Into<String>,
        entry: CollectionEntry,
        body: impl Into<String>,
    ) -> Self {
        self.collections
            .write()
            .unwrap()
            .entry(name.into())
            .or_default()
            .push((entry, body.into()));
        self
    }

    /// Make every read of a chapter fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_chapter(self, chapter: impl Into<String>) -> Self {
        self.failing_chapters.write().unwrap().insert(chapter.into());
        self
    }

    fn check_chapter(&self, chapter: &str) -> Result<(), ContentError> {
        if self.failing_chapters.read().unwrap().contains(chapter) {
            return Err(ContentError::new(ContentErrorKind::Other)
                .with_path(chapter)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    fn not_found(parts: &[&str]) -> ContentError {
        let path: std::path::PathBuf = parts.iter().map(Path::new).collect();
        ContentError::not_found(path).with_backend(BACKEND)
    }
}

impl ContentStore for MockContentStore {
    fn chapters(&self) -> Result<Vec<String>, ContentError> {
        let mut chapters: BTreeSet<String> = self
            .lessons
            .read()
            .unwrap()
            .keys()
            .map(|(chapter, _)| chapter.clone())
            .collect();
        chapters.extend(self.collections.read().unwrap().keys().cloned());
        chapters.extend(self.failing_chapters.read().unwrap().iter().cloned());
        Ok(chapters.into_iter().collect())
    }

    fn lessons(&self, chapter: &str) -> Result<Vec<LessonMeta>, ContentError> {
        self.check_chapter(chapter)?;
        let mut lessons: Vec<LessonMeta> = self
            .lessons
            .read()
            .unwrap()
            .iter()
            .filter(|((c, _), _)| c == chapter)
            .map(|(_, lesson)| lesson.meta.clone())
            .collect();
        if lessons.is_empty() {
            return Err(Self::not_found(&[chapter]));
        }
        sort_lessons(&mut lessons);
        Ok(lessons)
    }

    fn lesson(&self, chapter: &str, slug: &str) -> Result<Lesson, ContentError> {
        self.check_chapter(chapter)?;
        self.lessons
            .read()
            .unwrap()
            .get(&(chapter.to_owned(), slug.to_owned()))
            .cloned()
            .ok_or_else(|| Self::not_found(&[chapter, slug]))
    }

    fn has_introduction(&self, chapter: &str, slug: &str) -> bool {
        self.features
            .read()
            .unwrap()
            .get(&(chapter.to_owned(), slug.to_owned()))
            .is_some_and(|features| features.iter().any(|(f, _)| f.slug == INTRODUCTION))
    }

    fn features(&self, chapter: &str, slug: &str) -> Result<Vec<Feature>, ContentError> {
        self.check_chapter(chapter)?;
        if !self.has_introduction(chapter, slug) {
            return Ok(Vec::new());
        }

        if let Some(lesson) = self
            .lessons
            .read()
            .unwrap()
            .get(&(chapter.to_owned(), slug.to_owned()))
            && !lesson.meta.features.is_empty()
        {
            return Ok(lesson.meta.features.clone());
        }

        let features = self.features.read().unwrap();
        let registered = features
            .get(&(chapter.to_owned(), slug.to_owned()))
            .map(Vec::as_slice)
            .unwrap_or_default();
        let mut slugs: Vec<String> = registered.iter().map(|(f, _)| f.slug.clone()).collect();
        sort_feature_slugs(&mut slugs);
        Ok(slugs
            .into_iter()
            .filter_map(|s| registered.iter().find(|(f, _)| f.slug == s))
            .map(|(f, _)| f.clone())
            .collect())
    }

    fn feature(&self, chapter: &str, slug: &str, feature: &str) -> Result<Document, ContentError> {
        self.check_chapter(chapter)?;
        self.features
            .read()
            .unwrap()
            .get(&(chapter.to_owned(), slug.to_owned()))
            .and_then(|features| features.iter().find(|(f, _)| f.slug == feature))
            .map(|(f, body)| Document::new(FrontMatter::titled(f.label.clone()), body.clone()))
            .ok_or_else(|| Self::not_found(&[chapter, slug, feature]))
    }

    fn collection(&self, name: &str) -> Result<Vec<CollectionEntry>, ContentError> {
        let mut entries: Vec<CollectionEntry> = self
            .collections
            .read()
            .unwrap()
            .get(name)
            .ok_or_else(|| Self::not_found(&[name]))?
            .iter()
            .map(|(entry, _)| entry.clone())
            .collect();
        sort_collection(&mut entries);
        Ok(entries)
    }

    fn collection_document(&self, name: &str, slug: &str) -> Result<Document, ContentError> {
        self.collections
            .read()
            .unwrap()
            .get(name)
            .and_then(|entries| entries.iter().find(|(e, _)| e.slug == slug))
            .map(|(entry, body)| {
                let mut front_matter = FrontMatter::titled(entry.title.clone());
                front_matter.summary.clone_from(&entry.summary);
                front_matter.order = Some(entry.order);
                Document::new(front_matter, body.clone())
            })
            .ok_or_else(|| Self::not_found(&[name, slug]))
    }
}
