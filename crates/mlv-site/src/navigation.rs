//! Navigation tree built from the lesson catalog.
//!
//! Lessons are partitioned into `section → group → lessons`. Each section
//! becomes a [`NavGroup`] headed by its upper-cased display label, each group
//! a [`NavSection`] whose items start with a synthetic `Overview` entry.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use mlv_content::{LessonMeta, by_order_then_title};
use serde::Serialize;

use crate::labels::{display_section_label, section_key};
use crate::paths::{lesson_path, overview_path};

const OVERVIEW_LABEL: &str = "Overview";

/// Sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub label: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub disabled: bool,
    pub exact: bool,
    pub order: i64,
}

/// Items of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSection {
    /// Display label of the group.
    pub section: String,
    pub items: Vec<NavItem>,
}

/// Groups of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavGroup {
    /// Upper-cased display label of the section.
    pub group: String,
    pub sections: Vec<NavSection>,
}

/// Ordering preferences for the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavConfig {
    /// Sections listed first, in this order; matched with [`section_key`].
    pub section_order: Vec<String>,
    /// Groups pinned to the top of a section, keyed by section.
    pub pinned_groups: BTreeMap<String, Vec<String>>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            section_order: ["bootcamps", "optimization", "linear-algebra", "lectures", "extras"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            pinned_groups: BTreeMap::from([(
                "lectures".to_owned(),
                vec!["Algorithms".to_owned()],
            )]),
        }
    }
}

impl NavConfig {
    fn section_rank(&self, section: &str) -> usize {
        let key = section_key(section);
        self.section_order
            .iter()
            .position(|s| section_key(s) == key)
            .unwrap_or(usize::MAX)
    }

    fn group_rank(&self, section: &str, group: &str) -> usize {
        let key = section_key(section);
        let group_key = section_key(group);
        self.pinned_groups
            .iter()
            .find(|(s, _)| section_key(s) == key)
            .and_then(|(_, groups)| groups.iter().position(|g| section_key(g) == group_key))
            .unwrap_or(usize::MAX)
    }
}

fn alphabetical(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn lesson_item(lesson: &LessonMeta) -> NavItem {
    NavItem {
        label: lesson.nav_title().to_owned(),
        href: lesson_path(lesson),
        icon_key: lesson.icon_key.clone(),
        badge: lesson.badge.clone(),
        disabled: lesson.disabled,
        exact: lesson.exact,
        order: lesson.sort_order(),
    }
}

fn overview_item(first: &LessonMeta) -> NavItem {
    NavItem {
        label: OVERVIEW_LABEL.to_owned(),
        href: overview_path(first),
        icon_key: first.icon_key.clone(),
        badge: None,
        disabled: first.disabled,
        exact: true,
        order: first.sort_order().saturating_sub(1),
    }
}

/// Build the navigation tree.
///
/// Never drops a lesson: unknown sections sort alphabetically after the
/// preferred ones.
pub fn build_navigation<'a>(
    lessons: impl IntoIterator<Item = &'a LessonMeta>,
    config: &NavConfig,
) -> Vec<NavGroup> {
    let mut tree: HashMap<&str, HashMap<&str, Vec<&LessonMeta>>> = HashMap::new();
    for lesson in lessons {
        tree.entry(lesson.section.as_str())
            .or_default()
            .entry(lesson.group_or_section())
            .or_default()
            .push(lesson);
    }

    let mut sections: Vec<_> = tree.into_iter().collect();
    sections.sort_by(|(a, _), (b, _)| {
        config
            .section_rank(a)
            .cmp(&config.section_rank(b))
            .then_with(|| alphabetical(a, b))
    });

    sections
        .into_iter()
        .map(|(section, groups)| {
            let mut groups: Vec<_> = groups.into_iter().collect();
            groups.sort_by(|(a, _), (b, _)| {
                config
                    .group_rank(section, a)
                    .cmp(&config.group_rank(section, b))
                    .then_with(|| alphabetical(a, b))
            });

            let sections = groups
                .into_iter()
                .map(|(group, mut lessons)| {
                    lessons.sort_by(|a, b| by_order_then_title(a, b));
                    let mut items = Vec::with_capacity(lessons.len() + 1);
                    if let Some(first) = lessons.first() {
                        items.push(overview_item(first));
                    }
                    items.extend(lessons.into_iter().map(lesson_item));
                    NavSection {
                        section: display_section_label(group).to_owned(),
                        items,
                    }
                })
                .collect();

            NavGroup {
                group: display_section_label(section).to_uppercase(),
                sections,
            }
        })
        .collect()
}

/// Whether a navigation item is active for the current path.
///
/// Exact items match only their own path; others also match sub-paths.
pub fn is_active(pathname: &str, item: &NavItem) -> bool {
    if pathname == item.href {
        return true;
    }
    !item.exact
        && pathname
            .strip_prefix(item.href.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lesson(section: &str, group: Option<&str>, slug: &str, order: Option<i64>) -> LessonMeta {
        let mut meta = LessonMeta::new("c", slug)
            .with_section(section)
            .with_title(slug.to_uppercase());
        meta.group = group.map(str::to_owned);
        meta.order = order;
        meta
    }

    fn headers(nav: &[NavGroup]) -> Vec<&str> {
        nav.iter().map(|g| g.group.as_str()).collect()
    }

    fn group_labels(group: &NavGroup) -> Vec<&str> {
        group.sections.iter().map(|s| s.section.as_str()).collect()
    }

    #[test]
    fn test_section_order_preferred_then_alphabetical() {
        let lessons = vec![
            lesson("Zeta", None, "z", None),
            lesson("Lectures", None, "l", None),
            lesson("Alpha", None, "a", None),
            lesson("Bootcamps", None, "b", None),
        ];

        let nav = build_navigation(&lessons, &NavConfig::default());

        assert_eq!(headers(&nav), vec!["BOOTCAMPS", "MACHINE LEARNING", "ALPHA", "ZETA"]);
    }

    #[test]
    fn test_section_order_is_separator_insensitive() {
        let lessons = vec![
            lesson("Lectures", None, "l", None),
            lesson("Linear Algebra", None, "e", None),
            lesson("Optimization", None, "o", None),
        ];

        let nav = build_navigation(&lessons, &NavConfig::default());

        assert_eq!(
            headers(&nav),
            vec!["OPTIMIZATION", "LINEAR ALGEBRA", "MACHINE LEARNING"]
        );
    }

    #[test]
    fn test_algorithms_pinned_in_lectures() {
        let lessons = vec![
            lesson("Lectures", Some("Boosting"), "b", Some(1)),
            lesson("Lectures", Some("Algorithms"), "p", Some(1)),
            lesson("Lectures", Some("Appendix"), "a", Some(1)),
            lesson("Extras", Some("Algorithms"), "x", Some(1)),
            lesson("Extras", Some("Aardvark"), "y", Some(1)),
        ];

        let nav = build_navigation(&lessons, &NavConfig::default());

        assert_eq!(group_labels(&nav[0]), vec!["Algorithms", "Appendix", "Boosting"]);
        assert_eq!(group_labels(&nav[1]), vec!["Aardvark", "Algorithms"]);
    }

    #[test]
    fn test_items_sorted_with_leading_overview() {
        let lessons = vec![
            lesson("Lectures", Some("Algorithms"), "c", None),
            lesson("Lectures", Some("Algorithms"), "b", Some(2)),
            lesson("Lectures", Some("Algorithms"), "a", Some(2)),
            lesson("Lectures", Some("Algorithms"), "d", Some(1)).with_icon("brain"),
        ];

        let nav = build_navigation(&lessons, &NavConfig::default());
        let items = &nav[0].sections[0].items;
        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();

        assert_eq!(labels, vec!["Overview", "D", "A", "B", "C"]);
        assert_eq!(
            items[0],
            NavItem {
                label: "Overview".to_owned(),
                href: "/modules/machine-learning/algorithms/overview".to_owned(),
                icon_key: Some("brain".to_owned()),
                badge: None,
                disabled: false,
                exact: true,
                order: 0,
            }
        );
        assert_eq!(items[1].href, "/modules/machine-learning/algorithms/d");
        assert_eq!(items[4].order, 9999);
    }

    #[test]
    fn test_every_section_starts_with_exact_overview() {
        let lessons = vec![
            lesson("Bootcamps", None, "n", Some(3)),
            lesson("Extras", Some("Fun"), "f", None),
            lesson("Lectures", None, "i", Some(1)),
        ];

        let nav = build_navigation(&lessons, &NavConfig::default());

        for section in nav.iter().flat_map(|g| &g.sections) {
            assert_eq!(section.items[0].label, "Overview");
            assert!(section.items[0].exact);
        }
        let total: usize = nav
            .iter()
            .flat_map(|g| &g.sections)
            .map(|s| s.items.len() - 1)
            .sum();
        assert_eq!(total, lessons.len());
    }

    #[test]
    fn test_group_label_uses_display_label() {
        let lessons = vec![lesson("Lectures", None, "i", None)];

        let nav = build_navigation(&lessons, &NavConfig::default());

        assert_eq!(nav[0].sections[0].section, "Machine Learning");
        assert_eq!(nav[0].sections[0].items[0].href, "/modules/machine-learning/overview");
    }

    #[test]
    fn test_nav_label_preferred() {
        let mut meta = lesson("Extras", None, "x", None);
        meta.nav_label = Some("Short".to_owned());

        let nav = build_navigation([&meta], &NavConfig::default());

        assert_eq!(nav[0].sections[0].items[1].label, "Short");
    }

    #[test]
    fn test_empty_catalog() {
        assert!(build_navigation(&[], &NavConfig::default()).is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let nav = build_navigation(
            &[lesson("Extras", None, "x", None).with_icon("star")],
            &NavConfig::default(),
        );
        let json = serde_json::to_value(&nav).unwrap();

        assert_eq!(json[0]["group"], "EXTRAS");
        assert_eq!(json[0]["sections"][0]["items"][1]["iconKey"], "star");
        assert!(json[0]["sections"][0]["items"][1].get("badge").is_none());
    }

    #[test]
    fn test_overview_follows_first_lesson() {
        let mut first = lesson("Extras", None, "x", Some(i64::MIN));
        first.disabled = true;
        let lessons = vec![first, lesson("Extras", None, "y", Some(1))];

        let nav = build_navigation(&lessons, &NavConfig::default());
        let items = &nav[0].sections[0].items;

        assert_eq!(items[0].label, "Overview");
        assert_eq!(items[0].order, i64::MIN);
        assert!(items[0].disabled);
        assert_eq!(items[1].href, "/modules/extras/x");
        assert!(!items[2].disabled);
    }

    fn item(href: &str, exact: bool) -> NavItem {
        NavItem {
            label: String::new(),
            href: href.to_owned(),
            icon_key: None,
            badge: None,
            disabled: false,
            exact,
            order: 0,
        }
    }

    #[test]
    fn test_is_active() {
        let lesson = item("/modules/optimization/sets", false);
        assert!(is_active("/modules/optimization/sets", &lesson));
        assert!(is_active("/modules/optimization/sets/introduction", &lesson));
        assert!(!is_active("/modules/optimization/setsx", &lesson));

        let overview = item("/modules/optimization/overview", true);
        assert!(is_active("/modules/optimization/overview", &overview));
        assert!(!is_active("/modules/optimization/overview/x", &overview));
    }
}
