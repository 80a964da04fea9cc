//! YAML frontmatter splitting and parsing.

use crate::error::{Result, VaultError};
use serde::Serialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// A frontmatter value as seen by queries.
///
/// Nested mappings have no representation and are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    Scalar(String),
    List(Vec<String>),
}

impl FrontmatterValue {
    /// The scalar items of this value: one for a scalar, each element for a list.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        let items: &[String] = match self {
            FrontmatterValue::Scalar(value) => std::slice::from_ref(value),
            FrontmatterValue::List(values) => values,
        };
        items.iter().map(String::as_str)
    }
}

/// Parsed frontmatter, keyed by property name.
pub type Frontmatter = BTreeMap<String, FrontmatterValue>;

/// A document split at its frontmatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterSplit<'a> {
    /// The raw YAML between the delimiters.
    pub yaml: Option<&'a str>,
    /// Everything after the closing delimiter line.
    pub content: &'a str,
    /// Line number where `content` starts (1-indexed).
    pub content_start_line: usize,
}

/// Split content into frontmatter and body.
///
/// Frontmatter opens with a `---` first line and closes at the next `---`
/// line. Without a closing line the whole input is body.
pub fn split_frontmatter(content: &str) -> FrontmatterSplit<'_> {
    let no_frontmatter = FrontmatterSplit {
        yaml: None,
        content,
        content_start_line: 1,
    };

    let mut lines = content.split_inclusive('\n');
    match lines.next() {
        Some(first) if is_delimiter(first) => {}
        _ => return no_frontmatter,
    }

    let yaml_start = content.find('\n').map(|idx| idx + 1).unwrap_or(content.len());
    let mut offset = yaml_start;
    for (idx, line) in lines.enumerate() {
        if is_delimiter(line) {
            return FrontmatterSplit {
                yaml: Some(content[yaml_start..offset].trim_end_matches(['\n', '\r'])),
                content: &content[offset + line.len()..],
                // opening line + `idx` yaml lines + closing line, then the body
                content_start_line: idx + 3,
            };
        }
        offset += line.len();
    }

    no_frontmatter
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']).trim_end() == "---"
}

/// Extract frontmatter as a raw YAML string.
pub fn extract_frontmatter(content: &str) -> Option<&str> {
    split_frontmatter(content).yaml
}

/// Parse the frontmatter of `content`; absent frontmatter is an empty map.
pub fn parse_frontmatter(content: &str) -> Result<Frontmatter> {
    parse_frontmatter_with_path(content, Path::new("<unknown>"))
}

/// Parse frontmatter with path context for error messages.
pub fn parse_frontmatter_with_path(content: &str, path: &Path) -> Result<Frontmatter> {
    let Some(yaml) = extract_frontmatter(content).filter(|yaml| !yaml.trim().is_empty()) else {
        return Ok(Frontmatter::new());
    };

    let invalid = |message: String| VaultError::InvalidFrontmatter {
        path: path.to_path_buf(),
        message,
    };

    let value: Value = serde_yaml::from_str(yaml).map_err(|e| invalid(e.to_string()))?;
    match value {
        Value::Null => Ok(Frontmatter::new()),
        Value::Mapping(mapping) => Ok(mapping
            .into_iter()
            .filter_map(|(key, value)| Some((scalar_to_string(&key)?, convert_value(value)?)))
            .collect()),
        _ => Err(invalid("frontmatter is not a mapping".to_string())),
    }
}

fn convert_value(value: Value) -> Option<FrontmatterValue> {
    match value {
        Value::Sequence(items) => Some(FrontmatterValue::List(
            items.iter().filter_map(scalar_to_string).collect(),
        )),
        Value::Mapping(_) => None,
        Value::Tagged(tagged) => convert_value(tagged.value),
        scalar => scalar_to_string(&scalar).map(FrontmatterValue::Scalar),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Remove frontmatter from content.
pub fn strip_frontmatter(content: &str) -> &str {
    split_frontmatter(content).content
}
