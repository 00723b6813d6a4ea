//! Canonical URL paths for lessons, features and overviews.
//!
//! A lesson lives at `/modules/{section}/{group}/{slug}`, collapsed to
//! `/modules/{section}/{slug}` when its group normalizes to the same segment
//! as its section. Overviews follow the same rule with the literal
//! `overview` in place of the slug.

use mlv_content::{LessonMeta, slugify};

/// Prefix of every lesson URL.
pub const MODULES_PREFIX: &str = "/modules";

/// Final segment of an overview URL.
pub const OVERVIEW: &str = "overview";

/// Historical section label and the segment it is published under.
const RENAMED_SECTION: (&str, &str) = ("lectures", "machine-learning");

/// Fallback section for path computation.
const FALLBACK_SECTION: &str = "lectures";

/// Normalize a free-text label into a URL segment.
///
/// Same as [`slugify`], except that `lectures` is published as
/// `machine-learning`.
pub fn to_path_segment(text: &str) -> String {
    let segment = slugify(text);
    if segment == RENAMED_SECTION.0 {
        return RENAMED_SECTION.1.to_owned();
    }
    segment
}

/// Section and group segments of a lesson.
pub fn segments(section: Option<&str>, group: Option<&str>) -> (String, String) {
    let section_seg = to_path_segment(section.unwrap_or(FALLBACK_SECTION));
    let group_seg = to_path_segment(group.or(section).unwrap_or(FALLBACK_SECTION));
    (section_seg, group_seg)
}

fn join(section: &str, group: &str, leaf: &str) -> String {
    if section == group {
        format!("{MODULES_PREFIX}/{section}/{leaf}")
    } else {
        format!("{MODULES_PREFIX}/{section}/{group}/{leaf}")
    }
}

/// Segments of a lesson's metadata.
pub fn meta_segments(meta: &LessonMeta) -> (String, String) {
    segments(Some(&meta.section), meta.group.as_deref())
}

/// Canonical path of a lesson.
pub fn lesson_path(meta: &LessonMeta) -> String {
    let (section, group) = meta_segments(meta);
    join(&section, &group, &meta.slug)
}

/// Canonical path of the overview of a lesson's group.
pub fn overview_path(meta: &LessonMeta) -> String {
    let (section, group) = meta_segments(meta);
    join(&section, &group, OVERVIEW)
}

/// Overview path for already-normalized segments.
pub fn overview_path_for(section: &str, group: &str) -> String {
    join(section, group, OVERVIEW)
}

/// Canonical path of a lesson feature.
pub fn feature_path(meta: &LessonMeta, feature: &str) -> String {
    format!("{}/{feature}", lesson_path(meta))
}
