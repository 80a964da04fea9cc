//! Query evaluation against a single document.
//!
//! A [`SearchQuery`] is compiled once into a [`CompiledQuery`] so regex
//! patterns are built up front; evaluation itself cannot fail.

use crate::error::QueryError;
use crate::parser::{
    scan_headings, scan_inline_properties, scan_tags, split_frontmatter, Frontmatter, SpanMask,
};
use crate::search::parser::parse_query;
use crate::search::types::*;
use regex::{Regex, RegexBuilder};
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::path::Path;

// ============================================================================
// Compilation
// ============================================================================

/// A query with its string matchers compiled.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    root: Node,
}

#[derive(Debug, Clone)]
enum Node {
    Path(Matcher),
    Filename(Matcher),
    Tag(String),
    Content(Matcher),
    Section(Box<Node>),
    Line(Box<Node>),
    Property {
        key: String,
        op: PropertyOp,
        value: Option<String>,
    },
    And(Vec<Node>),
    Or(Vec<Node>),
    Not(Box<Node>),
}

#[derive(Debug, Clone)]
enum Matcher {
    Contains { value: String, case_sensitive: bool },
    Exact { value: String, case_sensitive: bool },
    Regex(Regex),
    /// A regex that failed to build; matches nothing.
    Never,
}

impl Matcher {
    fn compile(matcher: &StringMatcher, case_sensitive: bool) -> Self {
        let fold = |value: &str| {
            if case_sensitive {
                value.to_string()
            } else {
                value.to_lowercase()
            }
        };

        match matcher {
            StringMatcher::Contains { value } => Matcher::Contains {
                value: fold(value),
                case_sensitive,
            },
            StringMatcher::Exact { value } => Matcher::Exact {
                value: fold(value),
                case_sensitive,
            },
            StringMatcher::Regex { pattern } => match RegexBuilder::new(pattern)
                .case_insensitive(!case_sensitive)
                .build()
            {
                Ok(re) => Matcher::Regex(re),
                Err(e) => {
                    tracing::debug!(pattern = %pattern, error = %e, "invalid regex never matches");
                    Matcher::Never
                }
            },
        }
    }

    fn is_match(&self, haystack: &str) -> bool {
        match self {
            Matcher::Contains { value, case_sensitive: true } => haystack.contains(value.as_str()),
            Matcher::Contains { value, case_sensitive: false } => {
                haystack.to_lowercase().contains(value.as_str())
            }
            Matcher::Exact { value, case_sensitive: true } => haystack == value,
            Matcher::Exact { value, case_sensitive: false } => haystack.to_lowercase() == *value,
            Matcher::Regex(re) => re.is_match(haystack),
            Matcher::Never => false,
        }
    }
}

fn compile_node(query: &SearchQuery) -> Node {
    let compile_all = |children: &[SearchQuery]| -> Vec<Node> { children.iter().map(compile_node).collect() };

    match query {
        SearchQuery::And { children } => Node::And(compile_all(children)),
        SearchQuery::Or { children } => Node::Or(compile_all(children)),
        SearchQuery::Not { child } => Node::Not(Box::new(compile_node(child))),
        SearchQuery::Field(predicate) => match predicate {
            FieldPredicate::Path { matcher } => Node::Path(Matcher::compile(matcher, true)),
            FieldPredicate::Filename { matcher } => Node::Filename(Matcher::compile(matcher, true)),
            FieldPredicate::Content { matcher } => Node::Content(Matcher::compile(matcher, false)),
            FieldPredicate::Tag { value } => Node::Tag(normalize_tag(value)),
            FieldPredicate::Section { query } => Node::Section(Box::new(compile_node(query))),
            FieldPredicate::Line { query } => Node::Line(Box::new(compile_node(query))),
            FieldPredicate::Property { key, op, value } => Node::Property {
                key: key.clone(),
                op: *op,
                value: value.clone(),
            },
        },
    }
}

impl CompiledQuery {
    /// Compile a parsed query.
    ///
    /// A regex literal that does not build compiles to a matcher that
    /// never matches, so compilation itself cannot fail.
    pub fn new(query: &SearchQuery) -> Self {
        Self {
            root: compile_node(query),
        }
    }

    /// Parse and compile a query string.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        Ok(Self::new(&parse_query(input)?))
    }

    /// Evaluate against one document.
    ///
    /// `content` is the full file text; frontmatter lines are never searched
    /// as content. Returns an empty vec when the document does not match.
    pub fn evaluate(&self, path: &Path, content: &str, frontmatter: &Frontmatter) -> Vec<SearchMatch> {
        let split = split_frontmatter(content);
        let scope = Scope::new(path, split.content, split.content_start_line, Some(frontmatter));
        eval(&self.root, &scope)
    }

    /// Evaluate and wrap the matches into a result, if there are any.
    pub fn search(&self, path: &Path, content: &str, frontmatter: &Frontmatter) -> Option<SearchResult> {
        let matches = self.evaluate(path, content, frontmatter);
        (!matches.is_empty()).then(|| SearchResult {
            path: path.to_path_buf(),
            matches,
        })
    }
}

/// Evaluate a query against one document without keeping the compiled form.
pub fn evaluate_document(
    query: &SearchQuery,
    path: &Path,
    content: &str,
    frontmatter: &Frontmatter,
) -> Vec<SearchMatch> {
    CompiledQuery::new(query).evaluate(path, content, frontmatter)
}

// ============================================================================
// Scopes
// ============================================================================

/// The text a (sub-)query runs against.
///
/// The top-level scope is the document body. Sections and lines are
/// narrower scopes that keep absolute line numbers but carry no frontmatter.
struct Scope<'a> {
    path: &'a Path,
    body: &'a str,
    /// Absolute line number of the first line of `body`.
    first_line: usize,
    frontmatter: Option<&'a Frontmatter>,
    mask: OnceCell<SpanMask>,
}

impl<'a> Scope<'a> {
    fn new(path: &'a Path, body: &'a str, first_line: usize, frontmatter: Option<&'a Frontmatter>) -> Self {
        Self {
            path,
            body,
            first_line,
            frontmatter,
            mask: OnceCell::new(),
        }
    }

    /// A sub-scope over `body[start..end]` that keeps this scope's code
    /// masking, so a line inside a fence is still masked on its own.
    fn narrow(&self, start: usize, end: usize, first_line: usize) -> Scope<'a> {
        let mask = self.mask().slice(self.body, start, end);
        Scope {
            path: self.path,
            body: &self.body[start..end],
            first_line,
            frontmatter: None,
            mask: OnceCell::from(mask),
        }
    }

    fn mask(&self) -> &SpanMask {
        self.mask.get_or_init(|| SpanMask::new(self.body))
    }

    /// Convert a 1-indexed line within `body` to an absolute line.
    fn absolute(&self, line: usize) -> usize {
        self.first_line + line - 1
    }
}

// ============================================================================
// Evaluation
// ============================================================================

fn eval(node: &Node, scope: &Scope) -> Vec<SearchMatch> {
    match node {
        Node::And(children) => {
            let mut all = Vec::new();
            for child in children {
                let matches = eval(child, scope);
                if matches.is_empty() {
                    return Vec::new();
                }
                all.extend(matches);
            }
            all
        }
        Node::Or(children) => children
            .iter()
            .map(|child| eval(child, scope))
            .find(|matches| !matches.is_empty())
            .unwrap_or_default(),
        Node::Not(child) => {
            if eval(child, scope).is_empty() {
                vec![SearchMatch::new("not", None, None)]
            } else {
                Vec::new()
            }
        }
        Node::Path(matcher) => {
            let path = scope.path.to_string_lossy();
            single_if(matcher.is_match(&path), || {
                SearchMatch::new("path", None, Some(path.to_string()))
            })
        }
        Node::Filename(matcher) => {
            let name = scope
                .path
                .file_stem()
                .map(|s| s.to_string_lossy())
                .unwrap_or_default();
            single_if(matcher.is_match(&name), || {
                SearchMatch::new("filename", None, Some(name.to_string()))
            })
        }
        Node::Content(matcher) => eval_content(matcher, scope),
        Node::Tag(value) => eval_tag(value, scope),
        Node::Section(sub) => eval_section(sub, scope),
        Node::Line(sub) => eval_line(sub, scope),
        Node::Property { key, op, value } => eval_property(key, *op, value.as_deref(), scope),
    }
}

fn single_if(matched: bool, make: impl FnOnce() -> SearchMatch) -> Vec<SearchMatch> {
    if matched { vec![make()] } else { Vec::new() }
}

fn eval_content(matcher: &Matcher, scope: &Scope) -> Vec<SearchMatch> {
    scope
        .body
        .lines()
        .enumerate()
        .filter(|(_, line)| matcher.is_match(line))
        .map(|(idx, line)| {
            SearchMatch::new("content", Some(scope.first_line + idx), Some(line.to_string()))
        })
        .collect()
}

fn normalize_tag(value: &str) -> String {
    value.trim_start_matches('#').to_lowercase()
}

fn eval_tag(value: &str, scope: &Scope) -> Vec<SearchMatch> {
    if let Some(tag) = scan_tags(scope.body, scope.mask())
        .into_iter()
        .find(|tag| normalize_tag(&tag.name) == value)
    {
        return vec![SearchMatch::new("tag", Some(scope.absolute(tag.line)), Some(tag.name))];
    }

    scope
        .frontmatter
        .and_then(|fm| fm.get("tags"))
        .and_then(|tags| tags.items().find(|item| normalize_tag(item) == value))
        .map(|item| vec![SearchMatch::new("tag", Some(1), Some(item.to_string()))])
        .unwrap_or_default()
}

/// Byte span of every line in `body`, without the line terminator.
fn line_spans(body: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for raw in body.split_inclusive('\n') {
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let line = line.strip_suffix('\r').unwrap_or(line);
        spans.push((offset, offset + line.len()));
        offset += raw.len();
    }
    spans
}

/// Line ranges (0-indexed, end exclusive) of the body's sections.
///
/// Text before the first heading forms its own section.
fn section_ranges(scope: &Scope, line_count: usize) -> Vec<(usize, usize)> {
    let starts: Vec<usize> = scan_headings(scope.body, scope.mask())
        .iter()
        .map(|h| h.line - 1)
        .collect();

    let mut ranges = Vec::new();
    let first = starts.first().copied().unwrap_or(line_count);
    if first > 0 {
        ranges.push((0, first));
    }
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(line_count);
        ranges.push((start, end));
    }
    ranges
}

fn eval_section(sub: &Node, scope: &Scope) -> Vec<SearchMatch> {
    let spans = line_spans(scope.body);

    for (start, end) in section_ranges(scope, spans.len()) {
        if start >= end {
            continue;
        }
        let section = scope.narrow(spans[start].0, spans[end - 1].1, scope.first_line + start);
        let matches = eval(sub, &section);
        if !matches.is_empty() {
            return prefix_fields(matches, "section");
        }
    }

    Vec::new()
}

fn eval_line(sub: &Node, scope: &Scope) -> Vec<SearchMatch> {
    for (idx, (start, end)) in line_spans(scope.body).into_iter().enumerate() {
        let line_number = scope.first_line + idx;
        let matches = eval(sub, &scope.narrow(start, end, line_number));
        if !matches.is_empty() {
            return prefix_fields(matches, "line")
                .into_iter()
                .map(|m| SearchMatch {
                    line: Some(line_number),
                    ..m
                })
                .collect();
        }
    }

    Vec::new()
}

fn prefix_fields(matches: Vec<SearchMatch>, prefix: &str) -> Vec<SearchMatch> {
    matches
        .into_iter()
        .map(|m| SearchMatch {
            field: format!("{}:{}", prefix, m.field),
            ..m
        })
        .collect()
}

fn eval_property(key: &str, op: PropertyOp, expected: Option<&str>, scope: &Scope) -> Vec<SearchMatch> {
    let mut found: Vec<(String, usize)> = Vec::new();

    if let Some(value) = scope.frontmatter.and_then(|fm| fm.get(key)) {
        found.extend(value.items().map(|item| (item.to_string(), 1)));
    }
    found.extend(
        scan_inline_properties(scope.body, scope.mask())
            .into_iter()
            .filter(|prop| prop.key == key)
            .map(|prop| (prop.value, scope.absolute(prop.line))),
    );

    let field = format!("property:{}", key);
    let hit = match (op, expected) {
        (PropertyOp::Exists, _) | (_, None) => found.into_iter().next(),
        (op, Some(expected)) => found
            .into_iter()
            .find(|(actual, _)| compare_values(actual, expected, op)),
    };

    hit.map(|(value, line)| vec![SearchMatch::new(field, Some(line), Some(value))])
        .unwrap_or_default()
}

/// Compare a property value against the query value.
///
/// Numbers compare numerically; anything else compares as lowercase text,
/// which also orders ISO dates correctly.
fn compare_values(actual: &str, expected: &str, op: PropertyOp) -> bool {
    let ordering = match (actual.trim().parse::<f64>(), expected.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) => a.partial_cmp(&b),
        _ => Some(actual.to_lowercase().cmp(&expected.to_lowercase())),
    };

    let Some(ordering) = ordering else {
        return op == PropertyOp::NotEq;
    };

    match op {
        PropertyOp::Exists => true,
        PropertyOp::Eq => ordering == Ordering::Equal,
        PropertyOp::NotEq => ordering != Ordering::Equal,
        PropertyOp::Lt => ordering == Ordering::Less,
        PropertyOp::Gt => ordering == Ordering::Greater,
        PropertyOp::Lte => ordering != Ordering::Greater,
        PropertyOp::Gte => ordering != Ordering::Less,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_frontmatter;
    use pretty_assertions::assert_eq;

    fn run_at(path: &str, content: &str, query: &str) -> Vec<SearchMatch> {
        let frontmatter = parse_frontmatter(content).unwrap();
        CompiledQuery::parse(query)
            .unwrap()
            .evaluate(Path::new(path), content, &frontmatter)
    }

    fn run(content: &str, query: &str) -> Vec<SearchMatch> {
        run_at("test/note.md", content, query)
    }

    fn lines(matches: &[SearchMatch]) -> Vec<Option<usize>> {
        matches.iter().map(|m| m.line).collect()
    }

    // -- Path and filename --

    #[test]
    fn test_path_contains() {
        let matches = run_at("daily/2024-01-15.md", "content", "path:daily/");
        assert_eq!(
            matches,
            vec![SearchMatch::new("path", None, Some("daily/2024-01-15.md".to_string()))]
        );
        assert!(run_at("projects/note.md", "content", "path:daily/").is_empty());
    }

    #[test]
    fn test_path_is_case_sensitive() {
        assert!(run_at("Daily/note.md", "content", "path:daily").is_empty());
    }

    #[test]
    fn test_filename() {
        let matches = run_at("folder/Meeting Notes.md", "content", "filename:Meeting");
        assert_eq!(matches[0].text.as_deref(), Some("Meeting Notes"));
        assert!(run_at("folder/Meeting Notes.md", "content", "filename:folder").is_empty());
        assert_eq!(run_at("a/2024-01-15.md", "x", "filename:/^\\d{4}-/").len(), 1);
    }

    // -- Tags --

    #[test]
    fn test_tag_inline() {
        let matches = run("Some text #project more text", "tag:project");
        assert_eq!(
            matches,
            vec![SearchMatch::new("tag", Some(1), Some("#project".to_string()))]
        );
    }

    #[test]
    fn test_tag_hash_and_case() {
        assert_eq!(run("Some text #Project more", "tag:#project").len(), 1);
        assert_eq!(run("Some text #project more", "tag:PROJECT").len(), 1);
    }

    #[test]
    fn test_tag_frontmatter() {
        let list = run("---\ntags:\n  - project\n  - draft\n---\nBody text", "tag:draft");
        assert_eq!(list, vec![SearchMatch::new("tag", Some(1), Some("draft".to_string()))]);
        assert_eq!(run("---\ntags: project\n---\nBody", "tag:project").len(), 1);
    }

    #[test]
    fn test_tag_line_after_frontmatter() {
        let matches = run("---\ntitle: x\n---\n\nText #idea", "tag:idea");
        assert_eq!(lines(&matches), vec![Some(5)]);
    }

    #[test]
    fn test_tag_ignored_in_code_and_prefixes() {
        assert!(run("Use `#project` here", "tag:project").is_empty());
        assert!(run("Text #projects", "tag:project").is_empty());
    }

    #[test]
    fn test_tag_group() {
        assert_eq!(run("x #b", "tag:(a OR b)").len(), 1);
        assert!(run("x #c", "tag:(a OR b)").is_empty());
    }

    // -- Content --

    #[test]
    fn test_content_contains_per_line() {
        let matches = run("First line\nSecond line with Meeting\nThird line", "meeting");
        assert_eq!(
            matches,
            vec![SearchMatch::new(
                "content",
                Some(2),
                Some("Second line with Meeting".to_string())
            )]
        );
    }

    #[test]
    fn test_content_bare_words_and() {
        let matches = run("foo here\nbar there\nnothing", "foo bar");
        assert_eq!(lines(&matches), vec![Some(1), Some(2)]);
        assert!(run("foo only", "foo bar").is_empty());
    }

    #[test]
    fn test_content_exact_and_regex() {
        assert_eq!(run("First\nExact Match Line\nThird", "\"exact match line\"").len(), 1);
        assert!(run("an exact match line here", "\"exact match line\"").is_empty());
        assert_eq!(run("error123 happened\nERROR456 also", "/error\\d+/").len(), 2);
    }

    #[test]
    fn test_content_skips_frontmatter() {
        let content = "---\ntitle: keyword\n---\nBody with keyword";
        let matches = run(content, "keyword");
        assert_eq!(lines(&matches), vec![Some(4)]);
    }

    // -- Section --

    #[test]
    fn test_section_match() {
        let content = "# Introduction\nGeneral text\n# Error Handling\nFix error123 here\nMore error info";
        let matches = run(content, "section:(handling fix)");
        assert_eq!(lines(&matches), vec![Some(3), Some(4)]);
        assert!(matches.iter().all(|m| m.field == "section:content"));
    }

    #[test]
    fn test_section_requires_same_section() {
        let content = "# One\nalpha\n# Two\nbeta";
        assert!(run(content, "section:(alpha beta)").is_empty());
        assert_eq!(run(content, "alpha beta").len(), 2);
    }

    #[test]
    fn test_section_preamble_and_no_headings() {
        assert_eq!(run("Just a note\nwith keywords", "section:keywords").len(), 1);
        let matches = run("---\na: 1\n---\nintro\n## Later\ntext", "section:intro");
        assert_eq!(lines(&matches), vec![Some(4)]);
    }

    #[test]
    fn test_section_tag_line_is_absolute() {
        let matches = run("# A\nx\n# B\ny #found", "section:(tag:found)");
        assert_eq!(
            matches,
            vec![SearchMatch::new("section:tag", Some(4), Some("#found".to_string()))]
        );
    }

    // -- Line --

    #[test]
    fn test_line_co_occurrence() {
        let content = "TODO: fix bug\nDone: fix other thing\nTODO deadline: tomorrow";
        let matches = run(content, "line:(TODO deadline)");
        assert_eq!(lines(&matches), vec![Some(3), Some(3)]);
        assert_eq!(matches[0].field, "line:content");
        assert!(run("TODO: fix bug\ndeadline: tomorrow", "line:(TODO deadline)").is_empty());
    }

    #[test]
    fn test_line_with_negation() {
        let matches = run("alpha beta\nalpha gamma", "line:(alpha -beta)");
        assert_eq!(lines(&matches), vec![Some(2), Some(2)]);
        assert_eq!(matches[1].field, "line:not");
    }

    #[test]
    fn test_line_keeps_code_masking() {
        let content = "intro\n```\n# comment #todo [k::v]\n```\n";
        assert!(run(content, "tag:todo").is_empty());
        assert!(run(content, "line:(tag:todo)").is_empty());
        assert!(run(content, "line:(property:k)").is_empty());
        assert!(run(content, "section:(tag:todo)").is_empty());

        // a double-backtick span across two lines stays masked per line
        assert!(run("a ``x\n#todo`` b", "line:(tag:todo)").is_empty());

        let matches = run("```\n#todo\n```\nreal #todo", "line:(tag:todo)");
        assert_eq!(
            matches,
            vec![SearchMatch::new("line:tag", Some(4), Some("#todo".to_string()))]
        );
    }

    // -- Property --

    #[test]
    fn test_property_exists() {
        let matches = run("---\nstatus: active\n---\nBody", "property:status");
        assert_eq!(
            matches,
            vec![SearchMatch::new("property:status", Some(1), Some("active".to_string()))]
        );
        assert!(run("---\ntitle: Test\n---\nBody", "property:status").is_empty());
    }

    #[test]
    fn test_property_eq_case_insensitive() {
        assert_eq!(run("---\nstatus: Active\n---\nBody", "property:status=active").len(), 1);
        assert!(run("---\nstatus: draft\n---\nBody", "property:status=active").is_empty());
    }

    #[test]
    fn test_property_numeric() {
        assert_eq!(run("---\ncount: 7\n---\n", "property:count>=5").len(), 1);
        assert_eq!(run("---\ncount: 5\n---\n", "property:count>=5").len(), 1);
        assert!(run("---\ncount: 4\n---\n", "property:count>=5").is_empty());
        // 10 > 9 numerically, though not lexicographically
        assert_eq!(run("---\ncount: 10\n---\n", "property:count>9").len(), 1);
        assert_eq!(run("---\ncount: 5.0\n---\n", "property:count=5").len(), 1);
    }

    #[test]
    fn test_property_dates_and_not_eq() {
        assert_eq!(run("---\ndue: 2024-02-15\n---\n", "property:due<2024-03-01").len(), 1);
        assert_eq!(run("---\nstatus: done\n---\n", "property:status!=active").len(), 1);
    }

    #[test]
    fn test_property_inline() {
        let content = "---\nother: 1\n---\nBody with [status::active] inline";
        let matches = run(content, "property:status=active");
        assert_eq!(
            matches,
            vec![SearchMatch::new("property:status", Some(4), Some("active".to_string()))]
        );
    }

    #[test]
    fn test_property_frontmatter_first() {
        let content = "---\nstatus: draft\n---\n[status::active]";
        assert_eq!(lines(&run(content, "property:status")), vec![Some(1)]);
        assert_eq!(lines(&run(content, "property:status=active")), vec![Some(4)]);
    }

    #[test]
    fn test_property_list_items() {
        let content = "---\naliases:\n  - First\n  - Second\n---\n";
        assert_eq!(run(content, "property:aliases=second").len(), 1);
    }

    // -- Boolean logic --

    #[test]
    fn test_and_or() {
        assert_eq!(run("Some #project text with meeting notes", "tag:project meeting").len(), 2);
        assert!(run("Some #project text", "tag:project meeting").is_empty());
        let matches = run("Some #project text", "tag:project OR tag:log");
        assert_eq!(matches[0].field, "tag");
    }

    #[test]
    fn test_or_returns_first_matching_branch_only() {
        let matches = run("alpha\nbeta", "alpha OR beta");
        assert_eq!(lines(&matches), vec![Some(1)]);
    }

    #[test]
    fn test_not() {
        assert_eq!(
            run("No tags here", "-tag:archived"),
            vec![SearchMatch::new("not", None, None)]
        );
        assert!(run("Has #archived tag", "-tag:archived").is_empty());
    }

    // -- Compilation --

    #[test]
    fn test_invalid_regex_never_matches() {
        let compiled = CompiledQuery::parse("/[unclosed/").unwrap();
        let fm = Frontmatter::new();
        assert!(compiled.evaluate(Path::new("a.md"), "[unclosed", &fm).is_empty());

        let query = parse_query("/(/").unwrap();
        let matches = evaluate_document(&query, Path::new("a.md"), "(", &fm);
        assert!(matches.is_empty());

        // the rest of the query still evaluates
        assert_eq!(run("(", "-/(/").len(), 1);
        assert_eq!(run("( here", "path:/(/ OR here").len(), 1);
    }

    #[test]
    fn test_search_result() {
        let compiled = CompiledQuery::parse("hello").unwrap();
        let fm = Frontmatter::new();
        let result = compiled.search(Path::new("a.md"), "hello", &fm).unwrap();
        assert_eq!(result.path, Path::new("a.md"));
        assert_eq!(result.matches.len(), 1);
        assert!(compiled.search(Path::new("a.md"), "bye", &fm).is_none());
    }

    // -- Compare values --

    #[test]
    fn test_compare_values() {
        assert!(compare_values("10", "5", PropertyOp::Gt));
        assert!(!compare_values("3", "5", PropertyOp::Gt));
        assert!(compare_values("5", "5", PropertyOp::Eq));
        assert!(compare_values("2024-01-15", "2024-03-01", PropertyOp::Lt));
        assert!(compare_values("Active", "active", PropertyOp::Eq));
        assert!(compare_values("b", "a", PropertyOp::Gte));
    }

    #[test]
    fn test_compare_nan() {
        assert!(!compare_values("NaN", "5", PropertyOp::Eq));
        assert!(!compare_values("NaN", "5", PropertyOp::Lt));
        assert!(compare_values("NaN", "5", PropertyOp::NotEq));
    }
}
