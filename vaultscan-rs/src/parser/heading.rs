//! Heading scanning and slug generation.

use crate::parser::span::SpanMask;
use crate::types::Heading;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

// ATX heading with an optional trailing block anchor.
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})[ \t]+(.+?)(?:[ \t]+\^[a-zA-Z0-9_-]+)?[ \t]*$").unwrap()
});

/// Scan `content` for headings, skipping fenced code.
pub fn scan_headings(content: &str, mask: &SpanMask) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut slug_counts: HashMap<String, usize> = HashMap::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line_num = line_idx + 1;
        if mask.is_line_fenced(line_num) {
            continue;
        }

        let Some(cap) = HEADING.captures(line) else {
            continue;
        };
        let level = cap[1].len() as u8;
        let text = cap[2].trim().to_string();
        let slug = make_unique_slug(&slugify(&text), &mut slug_counts);

        headings.push(Heading {
            text,
            level,
            line: line_num,
            slug,
        });
    }

    headings
}

/// Parse all headings from content.
pub fn parse_headings(content: &str) -> Vec<Heading> {
    scan_headings(content, &SpanMask::new(content))
}

/// Generate the link slug for a heading text.
///
/// Alphanumerics are lowercased, `-` and `_` are kept, whitespace becomes a
/// single hyphen and everything else is dropped. Hyphens never lead, repeat
/// or trail.
pub fn slugify(text: &str) -> String {
    let normalized: String = text.nfc().collect();

    let mut slug = String::new();
    for c in normalized.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase().filter(|lc| lc.is_alphanumeric()));
        } else if c == '_' {
            slug.push('_');
        } else if (c == '-' || c.is_whitespace()) && !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug.nfc().collect()
}

/// Suffix repeated slugs: `b`, `b-1`, `b-2`, ...
fn make_unique_slug(base_slug: &str, counts: &mut HashMap<String, usize>) -> String {
    let count = counts.entry(base_slug.to_string()).or_insert(0);
    *count += 1;

    if *count == 1 {
        base_slug.to_string()
    } else {
        format!("{}-{}", base_slug, *count - 1)
    }
}

/// Find a heading by its slug.
pub fn find_heading_by_slug<'a>(headings: &'a [Heading], slug: &str) -> Option<&'a Heading> {
    headings.iter().find(|h| h.slug == slug)
}

/// Find a heading by its text (case-insensitive).
pub fn find_heading_by_text<'a>(headings: &'a [Heading], text: &str) -> Option<&'a Heading> {
    let lower_text = text.to_lowercase();
    headings.iter().find(|h| h.text.to_lowercase() == lower_text)
}

/// Headings whose level lies in `min..=max`.
pub fn filter_headings_by_level(headings: &[Heading], min: u8, max: u8) -> Vec<&Heading> {
    headings
        .iter()
        .filter(|h| (min..=max).contains(&h.level))
        .collect()
}

/// A heading with the headings nested under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingNode {
    #[serde(flatten)]
    pub heading: Heading,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HeadingNode>,
}

/// Nest flat headings into an outline: a heading owns every following
/// heading of a deeper level.
pub fn build_heading_tree(headings: &[Heading]) -> Vec<HeadingNode> {
    let mut pos = 0;
    build_level(headings, &mut pos, 0)
}

fn build_level(headings: &[Heading], pos: &mut usize, parent_level: u8) -> Vec<HeadingNode> {
    let mut nodes = Vec::new();

    while let Some(heading) = headings.get(*pos) {
        if heading.level <= parent_level {
            break;
        }
        *pos += 1;
        let children = build_level(headings, pos, heading.level);
        nodes.push(HeadingNode {
            heading: heading.clone(),
            children,
        });
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_heading() {
        let headings = parse_headings("# Heading 1\n\nSome text\n\n## Heading 2");
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text, "Heading 1");
        assert_eq!(headings[0].level, 1);
        assert_eq!(headings[0].line, 1);
        assert_eq!(headings[1].level, 2);
        assert_eq!(headings[1].line, 5);
    }

    #[test]
    fn test_heading_with_block_id() {
        let headings = parse_headings("## Heading ^block-id  ");
        assert_eq!(headings[0].text, "Heading");
        assert_eq!(headings[0].slug, "heading");
    }

    #[test]
    fn test_not_a_heading() {
        assert!(parse_headings("#tag\n####### seven\ntext # no").is_empty());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("C++ Programming"), "c-programming");
        assert_eq!(slugify("  Spaced  "), "spaced");
        assert_eq!(slugify("Under_score"), "under_score");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("-leading"), "leading");
        assert_eq!(slugify("Über Café"), "über-café");
    }

    #[test]
    fn test_slugify_idempotent() {
        for text in ["Hello World", "a -- b", "_x_ y", "Ünïcödé Tëxt!", "--"] {
            let once = slugify(text);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn test_duplicate_headings_unique_slugs() {
        let headings = parse_headings("# Test\n\n## Test\n\n### Test");
        let slugs: Vec<&str> = headings.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, vec!["test", "test-1", "test-2"]);
    }

    #[test]
    fn test_heading_in_code_block_skipped() {
        let headings = parse_headings("# Real Heading\n\n```\n# Not a heading\n```");
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Real Heading");
    }

    #[test]
    fn test_find_helpers() {
        let headings = parse_headings("# First\n## Second\n### Third\n## Second b");
        assert_eq!(find_heading_by_slug(&headings, "second").map(|h| h.line), Some(2));
        assert_eq!(find_heading_by_text(&headings, "THIRD").map(|h| h.line), Some(3));
        assert_eq!(filter_headings_by_level(&headings, 2, 2).len(), 2);
    }

    #[test]
    fn test_build_heading_tree() {
        let headings = parse_headings("# A\n## B\n### C\n## D\n# E");
        let tree = build_heading_tree(&headings);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].heading.text, "A");
        let under_a: Vec<&str> = tree[0].children.iter().map(|n| n.heading.text.as_str()).collect();
        assert_eq!(under_a, vec!["B", "D"]);
        assert_eq!(tree[0].children[0].children[0].heading.text, "C");
        assert!(tree[1].children.is_empty());
    }
}
