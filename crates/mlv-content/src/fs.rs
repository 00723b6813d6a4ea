//! Filesystem content store.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ContentError, ContentErrorKind};
use crate::frontmatter::{FeatureSpec, parse_document};
use crate::slug::titlecase_from_slug;
use crate::store::{
    CollectionEntry, ContentStore, Document, Feature, INTRODUCTION, Lesson, LessonMeta,
    sort_collection, sort_feature_slugs, sort_lessons,
};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Document file extension.
const EXTENSION: &str = "mdx";

/// Content store reading `.mdx` documents below a root directory.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Content root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reject components that are empty, hidden, or could leave the root.
    fn validate_component(component: &str) -> Result<(), ContentError> {
        if component.is_empty()
            || component.starts_with('.')
            || component.contains(['/', '\\'])
            || component.contains("..")
        {
            return Err(ContentError::new(ContentErrorKind::InvalidPath)
                .with_path(component)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    fn dir(&self, name: &str) -> Result<PathBuf, ContentError> {
        Self::validate_component(name)?;
        Ok(self.root.join(name))
    }

    fn document_path(dir: &Path, stem: &str) -> PathBuf {
        dir.join(format!("{stem}.{EXTENSION}"))
    }

    fn introduction_path(&self, chapter: &str, slug: &str) -> Result<PathBuf, ContentError> {
        Self::validate_component(slug)?;
        let dir = self.dir(chapter)?.join(slug);
        Ok(Self::document_path(&dir, INTRODUCTION))
    }

    /// Resolve the document holding a lesson's metadata.
    ///
    /// Prefers `{slug}.mdx`, falling back to `{slug}/introduction.mdx`.
    fn lesson_source(dir: &Path, slug: &str) -> Option<PathBuf> {
        let file = Self::document_path(dir, slug);
        if file.is_file() {
            return Some(file);
        }
        let intro = Self::document_path(&dir.join(slug), INTRODUCTION);
        intro.is_file().then_some(intro)
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    fn read_document(&self, path: &Path) -> Result<Document, ContentError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ContentError::io(e, Some(self.relative(path).to_path_buf())).with_backend(BACKEND)
        })?;
        let (front_matter, body) = parse_document(&raw).map_err(|e| {
            ContentError::new(ContentErrorKind::InvalidFrontMatter)
                .with_path(self.relative(path))
                .with_backend(BACKEND)
                .with_source(e)
        })?;
        front_matter.warn_unknown_keys(&self.relative(path).display().to_string());
        Ok(Document::new(front_matter, body))
    }

    fn read_dir(&self, dir: &Path) -> Result<fs::ReadDir, ContentError> {
        fs::read_dir(dir).map_err(|e| {
            ContentError::io(e, Some(self.relative(dir).to_path_buf())).with_backend(BACKEND)
        })
    }

    /// Stems of the visible `.mdx` files directly inside `dir`.
    fn document_stems(&self, dir: &Path) -> Result<BTreeSet<String>, ContentError> {
        let mut stems = BTreeSet::new();
        for entry in self.read_dir(dir)?.filter_map(Result::ok) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && !stem.starts_with('.')
            {
                stems.insert(stem.to_owned());
            }
        }
        Ok(stems)
    }

    fn discover_features(&self, dir: &Path) -> Result<Vec<Feature>, ContentError> {
        let mut slugs: Vec<String> = self.document_stems(dir)?.into_iter().collect();
        sort_feature_slugs(&mut slugs);

        Ok(slugs
            .into_iter()
            .map(|slug| {
                let label = match self.read_document(&Self::document_path(dir, &slug)) {
                    Ok(doc) => doc.front_matter.title,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read feature title");
                        None
                    }
                }
                .unwrap_or_else(|| titlecase_from_slug(&slug));
                Feature { label, slug }
            })
            .collect())
    }
}

impl ContentStore for FsContentStore {
    fn chapters(&self) -> Result<Vec<String>, ContentError> {
        let mut chapters = Vec::new();
        for entry in self.read_dir(&self.root)?.filter_map(Result::ok) {
            if !entry.path().is_dir() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string()
                && !name.starts_with('.')
            {
                chapters.push(name);
            }
        }
        chapters.sort();
        Ok(chapters)
    }

    fn lessons(&self, chapter: &str) -> Result<Vec<LessonMeta>, ContentError> {
        let dir = self.dir(chapter)?;

        let mut slugs = self.document_stems(&dir)?;
        for entry in self.read_dir(&dir)?.filter_map(Result::ok) {
            let path = entry.path();
            if path.is_dir()
                && Self::document_path(&path, INTRODUCTION).is_file()
                && let Ok(name) = entry.file_name().into_string()
                && !name.starts_with('.')
            {
                slugs.insert(name);
            }
        }

        let mut lessons = Vec::with_capacity(slugs.len());
        for slug in slugs {
            let Some(source) = Self::lesson_source(&dir, &slug) else {
                continue;
            };
            match self.read_document(&source) {
                Ok(doc) => lessons.push(doc.front_matter.into_lesson_meta(&slug, chapter)),
                Err(e) if e.kind == ContentErrorKind::InvalidFrontMatter => {
                    tracing::warn!(error = %e, "Skipping lesson with invalid front matter");
                }
                Err(e) => return Err(e),
            }
        }

        sort_lessons(&mut lessons);
        tracing::debug!(chapter, count = lessons.len(), "Loaded chapter lessons");
        Ok(lessons)
    }

    fn lesson(&self, chapter: &str, slug: &str) -> Result<Lesson, ContentError> {
        Self::validate_component(slug)?;
        let dir = self.dir(chapter)?;
        let source = Self::lesson_source(&dir, slug).ok_or_else(|| {
            ContentError::not_found(Path::new(chapter).join(slug)).with_backend(BACKEND)
        })?;
        let doc = self.read_document(&source)?;
        Ok(Lesson {
            meta: doc.front_matter.into_lesson_meta(slug, chapter),
            body: doc.body,
        })
    }

    fn has_introduction(&self, chapter: &str, slug: &str) -> bool {
        self.introduction_path(chapter, slug)
            .is_ok_and(|path| path.is_file())
    }

    fn features(&self, chapter: &str, slug: &str) -> Result<Vec<Feature>, ContentError> {
        let intro = self.introduction_path(chapter, slug)?;
        if !intro.is_file() {
            return Ok(Vec::new());
        }

        let declared = self.read_document(&intro)?.front_matter.features;
        if !declared.is_empty() {
            return Ok(declared.into_iter().map(FeatureSpec::into_feature).collect());
        }

        match intro.parent() {
            Some(dir) => self.discover_features(dir),
            None => Ok(Vec::new()),
        }
    }

    fn feature(&self, chapter: &str, slug: &str, feature: &str) -> Result<Document, ContentError> {
        Self::validate_component(slug)?;
        Self::validate_component(feature)?;
        let dir = self.dir(chapter)?.join(slug);
        self.read_document(&Self::document_path(&dir, feature))
    }

    fn collection(&self, name: &str) -> Result<Vec<CollectionEntry>, ContentError> {
        let dir = self.dir(name)?;

        let mut entries = Vec::new();
        for slug in self.document_stems(&dir)? {
            match self.read_document(&Self::document_path(&dir, &slug)) {
                Ok(doc) => entries.push(CollectionEntry::from_front_matter(
                    &slug,
                    &doc.front_matter,
                )),
                Err(e) if e.kind == ContentErrorKind::InvalidFrontMatter => {
                    tracing::warn!(error = %e, "Skipping collection entry with invalid front matter");
                }
                Err(e) => return Err(e),
            }
        }

        sort_collection(&mut entries);
        Ok(entries)
    }

    fn collection_document(&self, name: &str, slug: &str) -> Result<Document, ContentError> {
        Self::validate_component(slug)?;
        let dir = self.dir(name)?;
        self.read_document(&Self::document_path(&dir, slug))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_fs_store_is_send_sync() {
        assert_send_sync::<FsContentStore>();
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(
            root,
            "chapter1/perceptron.mdx",
            "---\ntitle: Perceptron\nsection: Lectures\ngroup: Algorithms\norder: 1\n---\nBody",
        );
        write(
            root,
            "chapter1/kernels.mdx",
            "---\ntitle: Kernels\nsection: Lectures\norder: 2\n---\n",
        );
        write(
            root,
            "chapter1/boosting/introduction.mdx",
            "---\ntitle: Boosting\nsection: Lectures\norder: 3\n---\nIntro",
        );
        write(root, "chapter1/boosting/proof.mdx", "---\ntitle: The Proof\n---\n## Step");
        write(root, "chapter1/boosting/demo.mdx", "no front matter");
        write(root, "chapter1/broken.mdx", "---\norder: [1\n---\n");
        write(root, "chapter1/notes.txt", "ignored");
        write(
            root,
            "mistake-bounded/halving.mdx",
            "---\ntitle: Halving\norder: 2\n---\nH",
        );
        write(root, "mistake-bounded/winnow.mdx", "---\ntitle: Winnow\norder: 1\n---\nW");
        write(root, "mistake-bounded/extra.mdx", "---\ntitle: Extra\n---\n");
        temp_dir
    }

    #[test]
    fn test_chapters_sorted_and_visible_only() {
        let temp_dir = fixture();
        fs::create_dir(temp_dir.path().join(".git")).unwrap();
        write(temp_dir.path(), "README.md", "readme");

        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        assert_eq!(store.chapters().unwrap(), vec!["chapter1", "mistake-bounded"]);
    }

    #[test]
    fn test_chapters_missing_root() {
        let store = FsContentStore::new(PathBuf::from("/nonexistent/content"));
        let err = store.chapters().unwrap_err();

        assert_eq!(err.kind, ContentErrorKind::NotFound);
    }

    #[test]
    fn test_lessons_include_files_and_directories() {
        let temp_dir = fixture();
        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        let lessons = store.lessons("chapter1").unwrap();
        let slugs: Vec<_> = lessons.iter().map(|l| l.slug.as_str()).collect();

        assert_eq!(slugs, vec!["perceptron", "kernels", "boosting"]);
        assert_eq!(lessons[0].group.as_deref(), Some("Algorithms"));
        assert_eq!(lessons[0].chapter, "chapter1");
    }

    #[test]
    fn test_lessons_missing_chapter_is_not_found() {
        let temp_dir = fixture();
        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        assert!(store.lessons("chapter9").unwrap_err().is_not_found());
    }

    #[test]
    fn test_lesson_reads_body() {
        let temp_dir = fixture();
        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        let lesson = store.lesson("chapter1", "perceptron").unwrap();

        assert_eq!(lesson.meta.title, "Perceptron");
        assert_eq!(lesson.body, "Body");
    }

    #[test]
    fn test_lesson_directory_form() {
        let temp_dir = fixture();
        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        let lesson = store.lesson("chapter1", "boosting").unwrap();

        assert_eq!(lesson.meta.title, "Boosting");
        assert_eq!(lesson.body, "Intro");
        assert!(store.has_introduction("chapter1", "boosting"));
        assert!(!store.has_introduction("chapter1", "perceptron"));
    }

    #[test]
    fn test_lesson_invalid_front_matter() {
        let temp_dir = fixture();
        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        let err = store.lesson("chapter1", "broken").unwrap_err();

        assert_eq!(err.kind, ContentErrorKind::InvalidFrontMatter);
        assert_eq!(err.path, Some(PathBuf::from("chapter1/broken.mdx")));
    }

    #[test]
    fn test_lesson_missing() {
        let temp_dir = fixture();
        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        assert!(store.lesson("chapter1", "nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_path_traversal_rejected() {
        let temp_dir = fixture();
        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        for (chapter, slug) in [("..", "x"), ("chapter1", "../secret"), ("chapter1", ""), ("a/b", "c")] {
            let err = store.lesson(chapter, slug).unwrap_err();
            assert_eq!(err.kind, ContentErrorKind::InvalidPath);
        }
        assert!(!store.has_introduction("chapter1", ".."));
    }

    #[test]
    fn test_features_discovered() {
        let temp_dir = fixture();
        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        let features = store.features("chapter1", "boosting").unwrap();

        assert_eq!(
            features,
            vec![
                Feature::new("Boosting", "introduction"),
                Feature::new("Demo", "demo"),
                Feature::new("The Proof", "proof"),
            ]
        );
    }

    #[test]
    fn test_features_declared() {
        let temp_dir = fixture();
        write(
            temp_dir.path(),
            "chapter1/boosting/introduction.mdx",
            "---\ntitle: Boosting\nfeatures:\n  - Introduction\n  - label: Proof\n    slug: proof\n---\n",
        );
        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        let features = store.features("chapter1", "boosting").unwrap();

        assert_eq!(
            features,
            vec![
                Feature::new("Introduction", "introduction"),
                Feature::new("Proof", "proof"),
            ]
        );
    }

    #[test]
    fn test_features_of_single_document_lesson_are_empty() {
        let temp_dir = fixture();
        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        assert!(store.features("chapter1", "perceptron").unwrap().is_empty());
    }

    #[test]
    fn test_feature_document() {
        let temp_dir = fixture();
        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        let doc = store.feature("chapter1", "boosting", "proof").unwrap();

        assert_eq!(doc.title(), Some("The Proof"));
        assert_eq!(doc.body, "## Step");
        assert!(store.feature("chapter1", "boosting", "nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_collection_sorted_by_order() {
        let temp_dir = fixture();
        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        let entries = store.collection("mistake-bounded").unwrap();
        let slugs: Vec<_> = entries.iter().map(|e| e.slug.as_str()).collect();

        assert_eq!(slugs, vec!["winnow", "halving", "extra"]);
        assert_eq!(entries[2].order, 999);
    }

    #[test]
    fn test_collection_document() {
        let temp_dir = fixture();
        let store = FsContentStore::new(temp_dir.path().to_path_buf());

        let doc = store.collection_document("mistake-bounded", "winnow").unwrap();

        assert_eq!(doc.title(), Some("Winnow"));
        assert_eq!(doc.body, "W");
    }
}
