//! Front-matter parsing for lesson documents.
//!
//! Documents start with a `---` fenced YAML block followed by the body:
//!
//! ```text
//! ---
//! title: Gradient Descent
//! section: Optimization
//! order: 2
//! ---
//! Body source...
//! ```
//!
//! The YAML block is parsed against [`FrontMatter`]. Unknown keys are kept
//! aside and reported with a warning; values of the wrong shape reject the
//! whole document.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::slug::slugify;
use crate::store::{DEFAULT_SECTION, Feature, LessonMeta};

const FENCE: &str = "---";

/// Raw front-matter fields of a document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: Option<String>,
    pub chapter: Option<String>,
    pub section: Option<String>,
    pub group: Option<String>,
    pub order: Option<i64>,
    pub summary: Option<String>,
    pub nav_label: Option<String>,
    pub icon_key: Option<String>,
    /// Older spelling of `iconKey`.
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub disabled: Option<bool>,
    pub exact: Option<bool>,
    #[serde(default)]
    pub features: Vec<FeatureSpec>,
    /// Keys outside the schema.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A feature declaration: either a bare label or a `{label, slug}` map.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeatureSpec {
    Label(String),
    Entry { label: String, slug: Option<String> },
}

impl FeatureSpec {
    /// Resolve the declaration into a feature, deriving the slug from the
    /// label when none is given.
    #[must_use]
    pub fn into_feature(self) -> Feature {
        match self {
            Self::Label(label) => Feature {
                slug: slugify(&label),
                label,
            },
            Self::Entry { label, slug } => Feature {
                slug: slug.unwrap_or_else(|| slugify(&label)),
                label,
            },
        }
    }
}

impl FrontMatter {
    /// Front matter carrying only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Log a warning for every key outside the schema.
    pub fn warn_unknown_keys(&self, source: &str) {
        for key in self.extra.keys() {
            tracing::warn!(source, key = %key, "Unknown front-matter key");
        }
    }

    /// Build lesson metadata, filling defaults from the slug and chapter
    /// directory.
    #[must_use]
    pub fn into_lesson_meta(self, slug: &str, chapter: &str) -> LessonMeta {
        LessonMeta {
            slug: slug.to_owned(),
            title: self.title.unwrap_or_else(|| slug.to_owned()),
            chapter: self.chapter.unwrap_or_else(|| chapter.to_owned()),
            section: self
                .section
                .unwrap_or_else(|| DEFAULT_SECTION.to_owned()),
            group: self.group,
            order: self.order,
            summary: self.summary,
            nav_label: self.nav_label,
            icon_key: self.icon_key.or(self.icon),
            badge: self.badge,
            disabled: self.disabled.unwrap_or(false),
            exact: self.exact.unwrap_or(false),
            features: self
                .features
                .into_iter()
                .map(FeatureSpec::into_feature)
                .collect(),
        }
    }
}

/// Split a document into its YAML block and body.
///
/// Returns `None` for the YAML block when the document has no opening fence
/// or the fence is never closed.
pub fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some(first_end) = raw.find('\n') else {
        return (None, raw);
    };
    if raw[..first_end].trim_end() != FENCE {
        return (None, raw);
    }

    let yaml_start = first_end + 1;
    let mut offset = yaml_start;
    for line in raw[yaml_start..].split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let body = &raw[offset + line.len()..];
            return (Some(&raw[yaml_start..offset]), body);
        }
        offset += line.len();
    }

    (None, raw)
}

/// Parse a document into front matter and body.
///
/// # Errors
///
/// Returns the YAML error when the block is malformed or a value has the
/// wrong shape.
pub fn parse_document(raw: &str) -> Result<(FrontMatter, String), serde_yaml::Error> {
    let (yaml, body) = split_front_matter(raw);
    let front_matter = match yaml.map(str::trim) {
        None | Some("") => FrontMatter::default(),
        Some(yaml) => serde_yaml::from_str(yaml)?,
    };
    Ok((front_matter, body.to_owned()))
}
