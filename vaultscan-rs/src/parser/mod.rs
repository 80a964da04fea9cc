//! Scanners for vault markdown syntax.

pub mod block_anchor;
pub mod frontmatter;
pub mod heading;
pub mod inline_property;
pub mod span;
pub mod tag;
pub mod task;
pub mod wikilink;

pub use block_anchor::{classify_block, find_block_by_id, parse_block_anchors, scan_block_anchors};
pub use frontmatter::{
    extract_frontmatter, parse_frontmatter, parse_frontmatter_with_path, split_frontmatter,
    strip_frontmatter, Frontmatter, FrontmatterSplit, FrontmatterValue,
};
pub use heading::{
    build_heading_tree, filter_headings_by_level, find_heading_by_slug, find_heading_by_text,
    parse_headings, scan_headings, slugify, HeadingNode,
};
pub use inline_property::{
    collect_inline_properties, parse_inline_properties, scan_inline_properties,
};
pub use span::{find_excluded_ranges, ExcludedRange, LineIndex, SpanMask};
pub use tag::{group_tags_by_root, parse_tags, scan_tags, unique_tags};
pub use task::{
    extract_metadata, format_task, format_task_tree, parse_relative_date, parse_task_trees,
    parse_tasks, scan_tasks, FormatTaskParams, TaskScan,
};
pub use wikilink::{
    format_wikilink, is_media_embed, parse_all_links, parse_embeds, parse_links, scan_links,
};
