//! Legacy URL redirects.
//!
//! Each row maps an old path pattern to its canonical form. Patterns are
//! `/`-separated segments where `:name` matches exactly one segment and is
//! substituted into the destination. Rows are tried in order; the first
//! match wins.

/// One redirect rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectRule {
    pub source: &'static str,
    pub destination: &'static str,
    pub permanent: bool,
}

const fn rule(source: &'static str, destination: &'static str) -> RedirectRule {
    RedirectRule {
        source,
        destination,
        permanent: true,
    }
}

/// Redirect table. Must follow any change to canonical segment names.
pub const LEGACY_REDIRECTS: &[RedirectRule] = &[
    // Sections renamed from `lectures` to `machine-learning`.
    rule("/modules/lectures", "/modules/machine-learning/overview"),
    rule("/modules/lectures/overview", "/modules/machine-learning/overview"),
    rule("/modules/lectures/lectures/overview", "/modules/machine-learning/overview"),
    rule("/modules/lectures/lectures/:lesson", "/modules/machine-learning/:lesson"),
    rule("/modules/lectures/:lesson", "/modules/machine-learning/:lesson"),
    rule("/modules/lectures/:group/:lesson", "/modules/machine-learning/:group/:lesson"),
    rule(
        "/modules/lectures/:group/:lesson/:feature",
        "/modules/machine-learning/:group/:lesson/:feature",
    ),
    // Duplicated section/group segments.
    rule(
        "/modules/machine-learning/machine-learning/overview",
        "/modules/machine-learning/overview",
    ),
    rule(
        "/modules/machine-learning/machine-learning/:lesson",
        "/modules/machine-learning/:lesson",
    ),
    rule("/modules/bootcamps/bootcamps/overview", "/modules/bootcamps/overview"),
    rule("/modules/bootcamps/bootcamps/:lesson", "/modules/bootcamps/:lesson"),
    rule(
        "/modules/linear-algebra/linear-algebra/overview",
        "/modules/linear-algebra/overview",
    ),
    // Short forms that predate sections.
    rule("/modules/algorithms/overview", "/modules/machine-learning/algorithms/overview"),
    rule("/modules/notation", "/modules/bootcamps/notation"),
    rule("/modules/linear-algebra", "/modules/linear-algebra/overview"),
    rule("/modules/linear-algebra/eigen", "/modules/linear-algebra/overview"),
    rule("/modules/linear-algebra/eigen/:feature", "/modules/linear-algebra/:feature"),
    // The mistake-bounded track used to live at the top level.
    rule(
        "/modules/mistake-bounded",
        "/modules/machine-learning/mistake-bounded/overview",
    ),
    rule(
        "/modules/mistake-bounded/:slug",
        "/modules/machine-learning/mistake-bounded/:slug",
    ),
];

impl RedirectRule {
    /// Destination for `path` if it matches this rule.
    pub fn apply(&self, path: &str) -> Option<String> {
        let pattern: Vec<&str> = split(self.source).collect();
        let segments: Vec<&str> = split(path).collect();
        if pattern.len() != segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (pat, seg) in pattern.iter().zip(&segments) {
            match pat.strip_prefix(':') {
                Some(name) => params.push((name, *seg)),
                None if pat == seg => {}
                None => return None,
            }
        }

        let destination = split(self.destination)
            .map(|part| {
                part.strip_prefix(':')
                    .and_then(|name| params.iter().find(|(n, _)| *n == name))
                    .map_or(part, |&(_, value)| value)
            })
            .collect::<Vec<_>>()
            .join("/");
        Some(format!("/{destination}"))
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// First matching redirect for `path`.
pub fn find_redirect(path: &str) -> Option<(String, bool)> {
    LEGACY_REDIRECTS
        .iter()
        .find_map(|rule| rule.apply(path).map(|to| (to, rule.permanent)))
}
