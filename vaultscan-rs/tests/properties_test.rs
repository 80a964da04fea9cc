//! Library-level behaviour checks across scanners, tasks and search.

use pretty_assertions::assert_eq;
use std::path::Path;
use vaultscan::parser::{
    extract_metadata, format_task_tree, parse_all_links, parse_block_anchors, parse_headings,
    parse_inline_properties, parse_tags, parse_task_trees, parse_tasks, slugify, Frontmatter,
    FrontmatterValue, SpanMask,
};
use vaultscan::{BlockType, CompiledQuery, EmojiFieldDef, EmojiValueType, TaskConfig};

const MASKED: &str = "\
Intro #real [[Real]] [k::v]

```
#fenced [[Fenced]] [fk::fv]
# Fenced heading
- [ ] fenced task
text ^fenced
```

Inline `#code [[Code]] [ck::cv]` and ``#double `x` [[Double]]``.
~~~~
~~~
#still-fenced
~~~~
# Real heading ^anchor
";

mod masking {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nothing_found_inside_code() {
        let mask = SpanMask::new(MASKED);
        assert!(mask.ranges().windows(2).all(|w| w[0].start <= w[1].start));

        let tags: Vec<String> = parse_tags(MASKED).into_iter().map(|t| t.name).collect();
        assert_eq!(tags, vec!["#real"]);

        let links: Vec<String> = parse_all_links(MASKED).into_iter().map(|l| l.target).collect();
        assert_eq!(links, vec!["Real"]);

        let props: Vec<String> = parse_inline_properties(MASKED).into_iter().map(|p| p.key).collect();
        assert_eq!(props, vec!["k"]);

        let headings: Vec<String> = parse_headings(MASKED).into_iter().map(|h| h.text).collect();
        assert_eq!(headings, vec!["Real heading"]);

        let anchors: Vec<String> = parse_block_anchors(MASKED).into_iter().map(|b| b.id).collect();
        assert_eq!(anchors, vec!["anchor"]);

        assert!(parse_tasks(MASKED, &TaskConfig::empty()).is_empty());
    }

    #[test]
    fn unterminated_fence_is_not_masked() {
        let content = "```\n#visible [[Visible]]";
        assert_eq!(parse_tags(content).len(), 1);
        assert_eq!(parse_all_links(content).len(), 1);
    }
}

mod slugs {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slugify_is_idempotent() {
        for text in [
            "Hello World",
            "  Leading and trailing  ",
            "Déjà vu -- again!",
            "snake_case-and-kebab",
            "Ünïcödé 中文 heading",
            "---",
            "Q&A: what? why!",
        ] {
            let once = slugify(text);
            assert_eq!(slugify(&once), once, "slug of {:?}", text);
        }
    }

    #[test]
    fn duplicate_slugs_are_numbered() {
        let content = (0..5).map(|_| "## Same Title").collect::<Vec<_>>().join("\n");
        let slugs: Vec<String> = parse_headings(&content).into_iter().map(|h| h.slug).collect();
        assert_eq!(
            slugs,
            vec!["same-title", "same-title-1", "same-title-2", "same-title-3", "same-title-4"]
        );
    }
}

mod tags {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(content: &str) -> Vec<String> {
        parse_tags(content).into_iter().map(|t| t.name).collect()
    }

    #[test]
    fn tag_edge_cases() {
        assert!(names("Issue #123 is fixed.").is_empty());
        assert_eq!(names("#tray/autonomy/urgent"), vec!["#tray/autonomy/urgent"]);
        assert!(names("`#fake-tag`").is_empty());
        assert!(names("Spaces&#nbsp; here").is_empty());
        assert!(names("[[Note#heading]]").is_empty());
    }
}

mod tasks {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn metadata_extraction() {
        let config = TaskConfig {
            fields: vec![
                EmojiFieldDef::new("⏳", "scheduled", EmojiValueType::Date, 1),
                EmojiFieldDef::new("📅", "due", EmojiValueType::Date, 2),
            ],
        };
        let tasks = parse_tasks("- [ ] T ⏳ 2026-02-05 📅 2026-02-10", &config);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "T");
        assert_eq!(tasks[0].metadata.get("scheduled").map(String::as_str), Some("2026-02-05"));
        assert_eq!(tasks[0].metadata.get("due").map(String::as_str), Some("2026-02-10"));
    }

    #[test]
    fn empty_config_keeps_text() {
        let (description, metadata) = extract_metadata("Pay #bills 📅 2024-01-01", &TaskConfig::empty());
        assert_eq!(description, "Pay #bills 📅 2024-01-01");
        assert!(metadata.is_empty());
    }

    #[test]
    fn hierarchy_round_trip() {
        let canonical = "\
- [ ] Plan trip
    - [x] Book flights
        - confirmation in inbox
    - [ ] Book hotel ^hotel
        - [ ] Compare prices
- [/] Pack
    - socks
1. [ ] Numbered root";

        let trees = parse_task_trees(canonical, &TaskConfig::empty());
        assert_eq!(trees.len(), 3);
        assert_eq!(format_task_tree(&trees, "    "), canonical);
    }

    #[test]
    fn orphan_text_items_are_dropped() {
        let trees = parse_task_trees("- plain item\n    - [ ] nested task", &TaskConfig::empty());
        assert_eq!(trees.len(), 1);
        assert!(trees[0].is_task());
        assert_eq!(trees[0].line(), 2);
    }
}

mod blocks {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn anchors_only_at_line_end() {
        let anchors = parse_block_anchors("- List item ^list-id");
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].block_type, BlockType::ListItem);
        assert!(parse_block_anchors("Some ^id text continues").is_empty());
    }
}

mod search {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matches(query: &str, content: &str, frontmatter: &Frontmatter) -> usize {
        CompiledQuery::parse(query)
            .unwrap()
            .evaluate(Path::new("note.md"), content, frontmatter)
            .len()
    }

    fn count(value: &str) -> Frontmatter {
        Frontmatter::from([("count".to_string(), FrontmatterValue::Scalar(value.to_string()))])
    }

    #[test]
    fn bare_words_are_anded() {
        let empty = Frontmatter::new();
        assert_eq!(matches("foo bar", "foo and bar", &empty), 2);
        assert_eq!(matches("foo bar", "only foo", &empty), 0);
    }

    #[test]
    fn tag_alternatives() {
        let empty = Frontmatter::new();
        assert_eq!(matches("tag:(a OR b)", "x #b", &empty), 1);
        assert_eq!(matches("tag:(a OR b)", "x #c", &empty), 0);
    }

    #[test]
    fn numeric_property_comparison() {
        assert_eq!(matches("property:count>=5", "", &count("5")), 1);
        assert_eq!(matches("property:count>=5", "", &count("12")), 1);
        assert_eq!(matches("property:count>=5", "", &count("4.5")), 0);
    }

    #[test]
    fn negated_tag() {
        let empty = Frontmatter::new();
        assert_eq!(matches("-tag:archived", "fresh note", &empty), 1);
        assert_eq!(matches("-tag:archived", "old #archived", &empty), 0);
    }
}
