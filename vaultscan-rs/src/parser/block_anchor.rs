//! Block anchor scanning (`^block-id` at the end of a line).

use crate::parser::span::SpanMask;
use crate::types::{BlockAnchor, BlockType};
use regex::Regex;
use std::sync::LazyLock;

static BLOCK_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\^([a-zA-Z0-9_-]+)\s*$").unwrap());

/// Scan `content` for block anchors, skipping fenced code.
pub fn scan_block_anchors(content: &str, mask: &SpanMask) -> Vec<BlockAnchor> {
    let mut anchors = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line_num = line_idx + 1;
        if mask.is_line_fenced(line_num) {
            continue;
        }

        let Some(cap) = BLOCK_ANCHOR.captures(line) else {
            continue;
        };
        let Some(whole) = cap.get(0) else { continue };

        anchors.push(BlockAnchor {
            id: cap[1].to_string(),
            line: line_num,
            block_type: classify_block(&line[..whole.start()]),
        });
    }

    anchors
}

/// Parse all block anchors from content.
pub fn parse_block_anchors(content: &str) -> Vec<BlockAnchor> {
    scan_block_anchors(content, &SpanMask::new(content))
}

/// Classify a line by its leading syntax.
pub fn classify_block(line: &str) -> BlockType {
    let trimmed = line.trim();

    if trimmed.starts_with('#') {
        return BlockType::Heading;
    }
    if trimmed.starts_with("- ") || trimmed.starts_with("* ") || trimmed.starts_with("+ ") {
        return BlockType::ListItem;
    }

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && trimmed[digits..].starts_with(". ") {
        return BlockType::ListItem;
    }

    if trimmed.starts_with('>') {
        return BlockType::Blockquote;
    }
    if trimmed.len() > 1 && trimmed.starts_with('|') && trimmed.ends_with('|') {
        return BlockType::Table;
    }
    if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
        return BlockType::CodeBlock;
    }

    BlockType::Paragraph
}

/// Find the line carrying `block_id`: `(line number, line text)`.
pub fn find_block_by_id<'a>(content: &'a str, block_id: &str) -> Option<(usize, &'a str)> {
    let anchor = parse_block_anchors(content)
        .into_iter()
        .find(|anchor| anchor.id == block_id)?;
    let line = content.lines().nth(anchor.line - 1)?;
    Some((anchor.line, line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(content: &str) -> BlockAnchor {
        let anchors = parse_block_anchors(content);
        assert_eq!(anchors.len(), 1, "expected one anchor in {:?}", content);
        anchors.into_iter().next().unwrap()
    }

    #[test]
    fn test_paragraph_anchor() {
        let anchor = single("Some paragraph text ^abc123");
        assert_eq!(anchor.id, "abc123");
        assert_eq!(anchor.line, 1);
        assert_eq!(anchor.block_type, BlockType::Paragraph);
    }

    #[test]
    fn test_block_types() {
        assert_eq!(single("- List item ^list-id").block_type, BlockType::ListItem);
        assert_eq!(single("12. Numbered ^n").block_type, BlockType::ListItem);
        assert_eq!(single("# Heading ^head-id").block_type, BlockType::Heading);
        assert_eq!(single("> Quote text ^quote-id").block_type, BlockType::Blockquote);
        assert_eq!(single("| a | b | ^row").block_type, BlockType::Table);
    }

    #[test]
    fn test_anchor_must_end_line() {
        assert!(parse_block_anchors("Some ^id text continues").is_empty());
        assert!(parse_block_anchors("^id").is_empty());
        assert_eq!(single("trailing space ^ok   ").id, "ok");
    }

    #[test]
    fn test_anchor_in_fence_skipped() {
        let anchors = parse_block_anchors("```\ncode ^inside\n```\ntext ^outside");
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].id, "outside");
        assert_eq!(anchors[0].line, 4);
    }

    #[test]
    fn test_classify_code_fence() {
        assert_eq!(classify_block("```rust"), BlockType::CodeBlock);
        assert_eq!(classify_block("plain"), BlockType::Paragraph);
    }

    #[test]
    fn test_find_block_by_id() {
        let content = "first\nsecond ^target\nthird";
        assert_eq!(find_block_by_id(content, "target"), Some((2, "second ^target")));
        assert_eq!(find_block_by_id(content, "missing"), None);
    }
}
