//! Tag scanning (`#tag` and nested `#tag/subtag`).

use crate::parser::span::{LineIndex, SpanMask};
use crate::types::Tag;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

// The regex crate has no lookaround, so the boundary before `#` is consumed
// and the character after the run is checked by hand.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w&])#([\p{L}_][\w/-]*)").unwrap());

/// Scan `content` for tags outside masked spans and wikilinks.
pub fn scan_tags(content: &str, mask: &SpanMask) -> Vec<Tag> {
    let index = LineIndex::new(content);
    let mut tags = Vec::new();

    for cap in TAG.captures_iter(content) {
        let Some(name) = cap.get(1) else { continue };
        let start = name.start() - 1;
        let end = name.end();

        if content[end..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '/')
        {
            continue;
        }
        if mask.overlaps(start, end) || is_in_wikilink(content, start) {
            continue;
        }

        tags.push(Tag {
            name: format!("#{}", name.as_str()),
            line: index.line_of(start),
        });
    }

    tags
}

/// Parse all tags from content.
pub fn parse_tags(content: &str) -> Vec<Tag> {
    scan_tags(content, &SpanMask::new(content))
}

/// Whether `pos` sits between an unclosed `[[` and a following `]]`.
fn is_in_wikilink(content: &str, pos: usize) -> bool {
    let before = &content[..pos];
    let Some(open) = before.rfind("[[") else {
        return false;
    };
    if before.rfind("]]").is_some_and(|close| close > open) {
        return false;
    }
    content[pos..].contains("]]")
}

/// Unique tags in order of first occurrence.
pub fn unique_tags(tags: &[Tag]) -> Vec<&Tag> {
    let mut seen = HashSet::new();
    tags.iter().filter(|tag| seen.insert(&tag.name)).collect()
}

/// Group tags by their root segment, e.g. `#tray/work` under `#tray`.
pub fn group_tags_by_root(tags: &[Tag]) -> BTreeMap<String, Vec<&Tag>> {
    let mut groups: BTreeMap<String, Vec<&Tag>> = BTreeMap::new();

    for tag in tags {
        let bare = tag.without_hash();
        let root = bare.split('/').next().unwrap_or(bare);
        groups.entry(format!("#{}", root)).or_default().push(tag);
    }

    groups
}
