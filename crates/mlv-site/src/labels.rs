//! Display labels for sections and groups.

use mlv_content::titlecase_from_slug;

const LECTURES: &str = "lectures";
const LECTURES_LABEL: &str = "Machine Learning";

/// Whether a section label names the lectures section.
pub fn is_lectures_section(section: &str) -> bool {
    section.trim().eq_ignore_ascii_case(LECTURES)
}

/// Label shown for a section or group; `Lectures` is shown as
/// `Machine Learning`.
pub fn display_section_label(section: &str) -> &str {
    if is_lectures_section(section) {
        LECTURES_LABEL
    } else {
        section
    }
}

/// Title-case a path segment for page headers.
pub fn group_label(segment: &str) -> String {
    titlecase_from_slug(segment)
}

/// Case- and separator-insensitive key of a section label.
///
/// `Linear Algebra`, `linear_algebra` and `linear-algebra` share a key.
pub fn section_key(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
