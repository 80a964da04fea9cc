//! Code span masking.
//!
//! Fenced code blocks and inline code spans are computed once per document
//! into a [`SpanMask`]; every scanner consults the mask before accepting a
//! match, so `[[links]]`, `#tags` and friends inside code are ignored.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// A region of the document that scanners must ignore.
///
/// Offsets are UTF-8 byte offsets into the scanned text, always on char
/// boundaries, so they slice the `&str` directly and line up with `regex`
/// match positions. Callers wanting character offsets convert with
/// `text[..start].chars().count()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedRange {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Line on which the range starts (1-indexed).
    pub start_line: usize,
    /// Line on which the range ends (1-indexed).
    pub end_line: usize,
    /// Fenced block (```` ``` ```` / `~~~`) rather than inline code.
    pub is_fenced: bool,
}

impl ExcludedRange {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

// ``code with `ticks` inside``
static INLINE_CODE_DOUBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"``(?:[^`]|`[^`])*``").unwrap());

static INLINE_CODE_SINGLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`\n]+`").unwrap());

/// Byte offsets of line starts, for offset -> line lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(content.match_indices('\n').map(|(idx, _)| idx + 1));
        Self { starts }
    }

    /// 1-indexed line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

/// The excluded ranges of one document, sorted by start offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanMask {
    ranges: Vec<ExcludedRange>,
}

impl SpanMask {
    /// Scan `content` for code fences and inline code.
    pub fn new(content: &str) -> Self {
        Self {
            ranges: find_excluded_ranges(content),
        }
    }

    pub fn ranges(&self) -> &[ExcludedRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Whether a single byte offset is masked.
    pub fn contains(&self, offset: usize) -> bool {
        self.ranges
            .iter()
            .any(|r| offset >= r.start && offset < r.end)
    }

    /// Whether any part of `start..end` is masked.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.ranges.iter().any(|r| r.overlaps(start, end))
    }

    /// The part of this mask covering `content[start..end]`, rebased so
    /// offsets and lines are relative to the slice.
    ///
    /// `content` must be the text this mask was computed from. A fence that
    /// only partly falls inside the slice stays masked.
    pub fn slice(&self, content: &str, start: usize, end: usize) -> SpanMask {
        let base_line = 1 + content[..start].matches('\n').count();
        let last_line = content[start..end].matches('\n').count() + 1;

        let ranges = self
            .ranges
            .iter()
            .filter(|r| r.overlaps(start, end))
            .map(|r| ExcludedRange {
                start: r.start.max(start) - start,
                end: r.end.min(end) - start,
                start_line: r.start_line.max(base_line) - base_line + 1,
                end_line: (r.end_line.max(base_line) - base_line + 1).min(last_line),
                is_fenced: r.is_fenced,
            })
            .collect();

        SpanMask { ranges }
    }

    /// Whether a whole line sits inside a fenced block (fence lines included).
    pub fn is_line_fenced(&self, line: usize) -> bool {
        self.ranges
            .iter()
            .any(|r| r.is_fenced && line >= r.start_line && line <= r.end_line)
    }
}

/// Find all fenced code blocks and inline code spans in `content`.
pub fn find_excluded_ranges(content: &str) -> Vec<ExcludedRange> {
    let index = LineIndex::new(content);
    let mut ranges = find_fenced_ranges(content);

    push_inline_ranges(&INLINE_CODE_DOUBLE, content, &index, &mut ranges);
    push_inline_ranges(&INLINE_CODE_SINGLE, content, &index, &mut ranges);

    ranges.sort_by_key(|r| r.start);
    ranges
}

/// Add every match of `re` that doesn't overlap an existing range.
///
/// A rejected candidate only skips its opening backtick, so a real span that
/// starts inside the rejected text is still found.
fn push_inline_ranges(
    re: &Regex,
    content: &str,
    index: &LineIndex,
    ranges: &mut Vec<ExcludedRange>,
) {
    let mut pos = 0;
    while let Some(m) = re.find_at(content, pos) {
        if ranges.iter().any(|r| r.overlaps(m.start(), m.end())) {
            pos = m.start() + 1;
            continue;
        }
        ranges.push(inline_range(index, m.start(), m.end()));
        pos = m.end();
    }
}

fn inline_range(index: &LineIndex, start: usize, end: usize) -> ExcludedRange {
    ExcludedRange {
        start,
        end,
        start_line: index.line_of(start),
        end_line: index.line_of(end.saturating_sub(1)),
        is_fenced: false,
    }
}

/// Fenced blocks, matched opener to closer line by line.
///
/// An opener without a closer is left unmasked and scanning resumes on the
/// following line.
fn find_fenced_ranges(content: &str) -> Vec<ExcludedRange> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for line in content.split('\n') {
        lines.push((offset, line));
        offset += line.len() + 1;
    }

    let mut ranges = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        let (start, line) = lines[idx];
        let Some((fence_char, fence_len)) = fence_opener(line) else {
            idx += 1;
            continue;
        };

        let closer = lines[idx + 1..]
            .iter()
            .position(|(_, candidate)| is_fence_closer(candidate, fence_char, fence_len));

        match closer {
            Some(rel) => {
                let close_idx = idx + 1 + rel;
                let (close_start, close_line) = lines[close_idx];
                ranges.push(ExcludedRange {
                    start,
                    end: close_start + close_line.len(),
                    start_line: idx + 1,
                    end_line: close_idx + 1,
                    is_fenced: true,
                });
                idx = close_idx + 1;
            }
            None => idx += 1,
        }
    }

    ranges
}

/// Fence character and run length when `line` opens a fence at column 0.
fn fence_opener(line: &str) -> Option<(char, usize)> {
    let first = line.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let run = line.chars().take_while(|&c| c == first).count();
    (run >= 3).then_some((first, run))
}

fn is_fence_closer(line: &str, fence_char: char, fence_len: usize) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.chars().all(|c| c == fence_char)
        && trimmed.chars().count() >= fence_len
}
