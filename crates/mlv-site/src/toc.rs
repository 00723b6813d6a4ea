//! Table of contents extraction from document bodies.

use std::collections::HashMap;
use std::sync::LazyLock;

use mlv_content::slugify;
use regex::Regex;
use serde::Serialize;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(##|###)\s+(.+)$").unwrap());
static BLOCK_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"title\s*=\s*['"](.+?)['"]"#).unwrap());
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap());
static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[`*_~]").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

const BLOCK_OPEN: &str = "<Block";

/// One entry of a page's table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocItem {
    /// Anchor id, unique within the page.
    pub id: String,
    pub text: String,
    /// Heading level (2 or 3).
    pub level: u8,
}

/// Strip link, emphasis and tag markup from heading text.
pub fn normalize_heading_text(text: &str) -> String {
    let text = LINK_RE.replace_all(text, "$1");
    let text = EMPHASIS_RE.replace_all(&text, "");
    TAG_RE.replace_all(&text, "").trim().to_owned()
}

/// Hands out unique anchor ids: the first `intro`, then `intro-2`, `intro-3`.
#[derive(Debug, Default)]
struct AnchorIds {
    seen: HashMap<String, usize>,
}

impl AnchorIds {
    fn next(&mut self, text: &str) -> Option<String> {
        let base = slugify(text);
        if text.is_empty() || base.is_empty() {
            return None;
        }
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        Some(if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        })
    }
}

/// Extract `##`/`###` headings and `<Block title="...">` titles.
///
/// Block titles are reported as level 2.
pub fn extract_toc(source: &str) -> Vec<TocItem> {
    let mut ids = AnchorIds::default();
    let mut items = Vec::new();
    let mut in_block_tag = false;

    for line in source.split('\n') {
        if !in_block_tag && line.contains(BLOCK_OPEN) {
            in_block_tag = true;
        }

        if in_block_tag {
            if let Some(caps) = BLOCK_TITLE_RE.captures(line) {
                let text = normalize_heading_text(&caps[1]);
                if let Some(id) = ids.next(&text) {
                    items.push(TocItem { id, text, level: 2 });
                }
            }
            if line.contains('>') {
                in_block_tag = false;
            }
        }

        let Some(caps) = HEADING_RE.captures(line) else {
            continue;
        };
        let level = if &caps[1] == "##" { 2 } else { 3 };
        let text = normalize_heading_text(&caps[2]);
        if let Some(id) = ids.next(&text) {
            items.push(TocItem { id, text, level });
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn item(id: &str, text: &str, level: u8) -> TocItem {
        TocItem {
            id: id.to_owned(),
            text: text.to_owned(),
            level,
        }
    }

    #[test]
    fn test_headings() {
        let source = "# Title\n## Setup\ntext\n### The *Update* Rule\n#### Deep\n";

        assert_eq!(
            extract_toc(source),
            vec![item("setup", "Setup", 2), item("the-update-rule", "The Update Rule", 3)]
        );
    }

    #[test]
    fn test_duplicate_ids_are_suffixed() {
        let source = "## Example\n## Example\n### Example\n";
        let ids: Vec<_> = extract_toc(source).into_iter().map(|i| i.id).collect();

        assert_eq!(ids, vec!["example", "example-2", "example-3"]);
    }

    #[test]
    fn test_block_titles() {
        let source = "<Block\n  label=\"A\"\n  title=\"Why [margins](/m) matter\"\n>\nbody\n</Block>\n## After\n";

        assert_eq!(
            extract_toc(source),
            vec![
                item("why-margins-matter", "Why margins matter", 2),
                item("after", "After", 2),
            ]
        );
    }

    #[test]
    fn test_single_line_block() {
        let source = "<Block title='Proof'>x</Block>";
        assert_eq!(extract_toc(source), vec![item("proof", "Proof", 2)]);
    }

    #[test]
    fn test_headings_without_slug_are_skipped() {
        assert!(extract_toc("## ???\n## `*`\n").is_empty());
    }

    #[test]
    fn test_normalize_heading_text() {
        assert_eq!(
            normalize_heading_text(" [Link](http://x) and <Font>tag</Font> `code` "),
            "Link and tag code"
        );
    }
}
