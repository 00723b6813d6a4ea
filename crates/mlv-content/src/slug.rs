//! Text to URL-segment helpers.

/// Normalize text into a URL segment.
///
/// Lower-cases, trims, drops everything outside `[a-z0-9]`, whitespace and
/// `-`, then turns whitespace runs into `-` and collapses repeated `-`.
/// Idempotent.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    for c in lowered.trim().chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
            continue;
        }
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug
}

/// Convert a slug (kebab-case or `snake_case`) to title case.
///
/// `mistake-bounded` becomes `Mistake Bounded`.
pub fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}
