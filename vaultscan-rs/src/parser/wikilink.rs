//! Wikilink and embed scanning.

use crate::parser::span::{LineIndex, SpanMask};
use crate::types::Link;
use regex::Regex;
use std::sync::LazyLock;

// (!)?                     embed marker (group 1)
// ([^\]\|#]+)              target (group 2)
// (?:#\^([a-zA-Z0-9_-]+))? block reference (group 3)
// (?:#([^\]\|]+))?         heading reference (group 4)
// (?:\|([^\]]+))?          alias (group 5)
static WIKILINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[\[([^\]\|#]+)(?:#\^([a-zA-Z0-9_-]+))?(?:#([^\]\|]+))?(?:\|([^\]]+))?\]\]")
        .unwrap()
});

const MEDIA_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg", ".bmp", ".mp3", ".wav", ".ogg", ".mp4",
    ".webm", ".pdf",
];

/// Scan `content` for wikilinks and embeds outside the masked spans.
pub fn scan_links(content: &str, mask: &SpanMask) -> Vec<Link> {
    let index = LineIndex::new(content);
    let mut links = Vec::new();

    for cap in WIKILINK.captures_iter(content) {
        let Some(whole) = cap.get(0) else { continue };
        if mask.overlaps(whole.start(), whole.end()) {
            continue;
        }

        let embed = cap.get(1).is_some_and(|m| !m.as_str().is_empty());
        let target = cap.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
        let block_id = cap.get(3).map(|m| m.as_str().to_string());
        // A block reference wins; anything after it is not a heading.
        let heading = match block_id {
            Some(_) => None,
            None => cap.get(4).map(|m| m.as_str().to_string()),
        };
        let alias = cap.get(5).map(|m| m.as_str().trim().to_string());

        links.push(Link {
            target: target.to_string(),
            alias,
            heading,
            block_id,
            embed,
            line: index.line_of(whole.start()),
        });
    }

    links
}

/// Parse all wikilinks (not embeds) from content.
pub fn parse_links(content: &str) -> Vec<Link> {
    parse_all_links(content)
        .into_iter()
        .filter(|link| !link.embed)
        .collect()
}

/// Parse all embeds from content.
pub fn parse_embeds(content: &str) -> Vec<Link> {
    parse_all_links(content)
        .into_iter()
        .filter(|link| link.embed)
        .collect()
}

/// Parse all wikilinks and embeds from content.
pub fn parse_all_links(content: &str) -> Vec<Link> {
    scan_links(content, &SpanMask::new(content))
}

/// Check if a link target looks like an image or other media file.
pub fn is_media_embed(target: &str) -> bool {
    let lower = target.to_lowercase();
    MEDIA_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Render a link back into `[[...]]` syntax.
pub fn format_wikilink(link: &Link) -> String {
    let mut result = String::new();

    if link.embed {
        result.push('!');
    }
    result.push_str("[[");
    result.push_str(&link.target);

    if let Some(ref block_id) = link.block_id {
        result.push_str("#^");
        result.push_str(block_id);
    } else if let Some(ref heading) = link.heading {
        result.push('#');
        result.push_str(heading);
    }

    if let Some(ref alias) = link.alias {
        result.push('|');
        result.push_str(alias);
    }

    result.push_str("]]");
    result
}
