//! Inline property scanning (`[key::value]`).

use crate::parser::span::{LineIndex, SpanMask};
use crate::types::InlineProperty;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

// The value may hold `]]` pairs so that `[up::[[Note]]]` keeps the wikilink.
static INLINE_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([\w-]+)::([^\]]*(?:\]\][^\]]*)*)\]").unwrap());

/// Scan `content` for bracketed inline properties outside masked spans.
pub fn scan_inline_properties(content: &str, mask: &SpanMask) -> Vec<InlineProperty> {
    let index = LineIndex::new(content);

    INLINE_PROPERTY
        .captures_iter(content)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            if mask.overlaps(whole.start(), whole.end()) {
                return None;
            }
            Some(InlineProperty {
                key: cap[1].to_string(),
                value: cap[2].trim().to_string(),
                line: index.line_of(whole.start()),
            })
        })
        .collect()
}

/// Parse all inline properties from content.
pub fn parse_inline_properties(content: &str) -> Vec<InlineProperty> {
    scan_inline_properties(content, &SpanMask::new(content))
}

/// Group inline properties by key.
pub fn collect_inline_properties(props: &[InlineProperty]) -> BTreeMap<String, Vec<&InlineProperty>> {
    let mut map: BTreeMap<String, Vec<&InlineProperty>> = BTreeMap::new();
    for prop in props {
        map.entry(prop.key.clone()).or_default().push(prop);
    }
    map
}
