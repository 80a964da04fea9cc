//! Query strings to [`SearchQuery`] trees.
//!
//! Tokens are produced in one pass; a word glued to `:` becomes a typed
//! [`Field`] prefix only for the seven known field names. The parser then
//! dispatches on that field:
//!
//! ```text
//! query    := or ;  or := and ("OR" and)* ;  and := unary+
//! unary    := "-" atom | atom
//! atom     := "(" query ")" | FIELD field | literal        literal -> content
//! path: filename: content:   literal
//! tag:                       name | "(" name ("OR" name)* ")"
//! section: line:             "(" query ")" | literal
//! property:                  name [op name]                op in = != < <= > >=
//! name     := word | "quoted"
//! literal  := "quoted" (exact) | /regex/ | word (contains)
//! ```

use crate::error::QueryError;
use crate::search::types::*;
use std::fmt;

// ============================================================================
// Tokens
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// A plain word.
    Word(String),
    /// A double-quoted string literal, escapes resolved.
    QuotedString(String),
    /// A regex literal: /pattern/
    RegexLiteral(String),
    /// A known field name that was followed by a colon.
    FieldPrefix(Field),
    OpenParen,
    CloseParen,
    /// The literal keyword "OR".
    Or,
    /// Negation prefix (a `-` glued to the next token).
    Not,
    /// Comparison operator for property values.
    ComparisonOp(PropertyOp),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Path,
    Filename,
    Tag,
    Content,
    Section,
    Line,
    Property,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "path" => Field::Path,
            "filename" => Field::Filename,
            "tag" => Field::Tag,
            "content" => Field::Content,
            "section" => Field::Section,
            "line" => Field::Line,
            "property" => Field::Property,
            _ => return None,
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "word '{}'", w),
            Token::QuotedString(s) => write!(f, "string \"{}\"", s),
            Token::RegexLiteral(p) => write!(f, "regex /{}/", p),
            Token::FieldPrefix(field) => write!(f, "field {:?}", field),
            Token::OpenParen => f.write_str("'('"),
            Token::CloseParen => f.write_str("')'"),
            Token::Or => f.write_str("OR"),
            Token::Not => f.write_str("'-'"),
            Token::ComparisonOp(op) => write!(f, "operator {:?}", op),
        }
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

fn tokenize(input: &str) -> Result<Vec<Token>, QueryError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        match ch {
            '(' => {
                tokens.push(Token::OpenParen);
                i += 1;
                continue;
            }
            ')' => {
                tokens.push(Token::CloseParen);
                i += 1;
                continue;
            }
            '-' if next.is_some_and(|c| !c.is_whitespace()) => {
                tokens.push(Token::Not);
                i += 1;
                continue;
            }
            '-' => {
                i += 1;
                continue;
            }
            '"' => {
                let start = i;
                let (value, end) = read_delimited(&chars, i + 1, '"', false)
                    .ok_or(QueryError::UnterminatedQuote(start))?;
                tokens.push(Token::QuotedString(value));
                i = end;
                continue;
            }
            '/' => {
                let start = i;
                let (pattern, end) = read_delimited(&chars, i + 1, '/', true)
                    .ok_or(QueryError::UnterminatedRegex(start))?;
                tokens.push(Token::RegexLiteral(pattern));
                i = end;
                continue;
            }
            _ => {}
        }

        let two_char_op = match (ch, next) {
            ('!', Some('=')) => Some(PropertyOp::NotEq),
            ('<', Some('=')) => Some(PropertyOp::Lte),
            ('>', Some('=')) => Some(PropertyOp::Gte),
            _ => None,
        };
        if let Some(op) = two_char_op {
            tokens.push(Token::ComparisonOp(op));
            i += 2;
            continue;
        }
        if let Some(op) = PropertyOp::from_symbol(&ch.to_string()) {
            tokens.push(Token::ComparisonOp(op));
            i += 1;
            continue;
        }

        if is_word_char(ch) {
            let start = i;
            while i < len && is_word_char(chars[i]) {
                i += 1;
            }
            let mut word: String = chars[start..i].iter().collect();

            if word == "OR" {
                tokens.push(Token::Or);
                continue;
            }

            if chars.get(i) == Some(&':') {
                if let Some(field) = Field::from_name(&word.to_lowercase()) {
                    tokens.push(Token::FieldPrefix(field));
                    i += 1;
                    continue;
                }
                // Not a field: the colon and what follows stay in the word.
                word.push(':');
                i += 1;
                while i < len && (is_word_char(chars[i]) || chars[i] == ':') {
                    word.push(chars[i]);
                    i += 1;
                }
            }

            tokens.push(Token::Word(word));
            continue;
        }

        // Anything else separates tokens.
        i += 1;
    }

    Ok(tokens)
}

/// Read up to the closing `delimiter`, honouring backslash escapes.
///
/// Returns the text and the index just past the delimiter. With
/// `keep_escapes` only an escaped delimiter loses its backslash, so regex
/// escapes such as `\d` survive.
fn read_delimited(chars: &[char], mut i: usize, delimiter: char, keep_escapes: bool) -> Option<(String, usize)> {
    let mut text = String::new();

    while i < chars.len() {
        let ch = chars[i];
        if ch == delimiter {
            return Some((text, i + 1));
        }
        if ch == '\\' && i + 1 < chars.len() {
            let escaped = chars[i + 1];
            if keep_escapes && escaped != delimiter {
                text.push('\\');
            }
            text.push(escaped);
            i += 2;
            continue;
        }
        text.push(ch);
        i += 1;
    }

    None
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-' || ch == '.' || ch == '/'
}

// ============================================================================
// Parser
// ============================================================================

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn unexpected(&self, tok: &Token) -> QueryError {
        QueryError::UnexpectedToken {
            found: tok.to_string(),
            position: self.pos.saturating_sub(1),
        }
    }

    fn expect_close_paren(&mut self) -> Result<(), QueryError> {
        match self.advance() {
            Some(Token::CloseParen) => Ok(()),
            Some(tok) => Err(QueryError::Expected {
                expected: "')'",
                found: tok.to_string(),
            }),
            None => Err(QueryError::UnbalancedParen),
        }
    }

    /// or_expr = and_expr ("OR" and_expr)*
    fn parse_or_expr(&mut self) -> Result<SearchQuery, QueryError> {
        let mut children = vec![self.parse_and_expr()?];

        while self.peek() == Some(&Token::Or) {
            self.advance();
            children.push(self.parse_and_expr()?);
        }

        Ok(collapse(children, |children| SearchQuery::Or { children }))
    }

    /// and_expr = unary_expr+
    fn parse_and_expr(&mut self) -> Result<SearchQuery, QueryError> {
        let mut children = vec![self.parse_unary_expr()?];

        while let Some(tok) = self.peek() {
            match tok {
                Token::Or | Token::CloseParen => break,
                _ => children.push(self.parse_unary_expr()?),
            }
        }

        Ok(collapse(children, |children| SearchQuery::And { children }))
    }

    /// unary_expr = "-" atom | atom
    fn parse_unary_expr(&mut self) -> Result<SearchQuery, QueryError> {
        if self.peek() == Some(&Token::Not) {
            self.advance();
            Ok(SearchQuery::not(self.parse_atom()?))
        } else {
            self.parse_atom()
        }
    }

    /// atom = field_expr | "(" query ")" | bare_text
    fn parse_atom(&mut self) -> Result<SearchQuery, QueryError> {
        match self.advance() {
            Some(Token::FieldPrefix(field)) => self.parse_field_expr(field),
            Some(Token::OpenParen) => {
                let query = self.parse_or_expr()?;
                self.expect_close_paren()?;
                Ok(query)
            }
            Some(tok @ (Token::Word(_) | Token::QuotedString(_) | Token::RegexLiteral(_))) => {
                let matcher = string_matcher(tok)?;
                Ok(SearchQuery::field(FieldPredicate::Content { matcher }))
            }
            Some(tok) => Err(self.unexpected(&tok)),
            None => Err(QueryError::UnexpectedEnd {
                expected: "a search term",
            }),
        }
    }

    /// field_expr = FIELD_PREFIX value_expr
    fn parse_field_expr(&mut self, field: Field) -> Result<SearchQuery, QueryError> {
        let predicate = match field {
            Field::Property => return self.parse_property_expr(),
            Field::Tag => return self.parse_tag_expr(),
            Field::Section => FieldPredicate::Section {
                query: Box::new(self.parse_scoped_query()?),
            },
            Field::Line => FieldPredicate::Line {
                query: Box::new(self.parse_scoped_query()?),
            },
            Field::Path => FieldPredicate::Path {
                matcher: self.parse_string_matcher()?,
            },
            Field::Filename => FieldPredicate::Filename {
                matcher: self.parse_string_matcher()?,
            },
            Field::Content => FieldPredicate::Content {
                matcher: self.parse_string_matcher()?,
            },
        };
        Ok(SearchQuery::field(predicate))
    }

    /// property:key, property:key=value, property:key<value, ...
    fn parse_property_expr(&mut self) -> Result<SearchQuery, QueryError> {
        let key = self.parse_literal("property key")?;

        let (op, value) = match self.peek() {
            Some(&Token::ComparisonOp(op)) => {
                self.advance();
                (op, Some(self.parse_literal("property value")?))
            }
            _ => (PropertyOp::Exists, None),
        };

        Ok(SearchQuery::field(FieldPredicate::Property { key, op, value }))
    }

    /// tag:value or tag:(value1 OR value2)
    fn parse_tag_expr(&mut self) -> Result<SearchQuery, QueryError> {
        if self.peek() != Some(&Token::OpenParen) {
            let value = self.parse_literal("tag value")?;
            return Ok(SearchQuery::field(FieldPredicate::Tag { value }));
        }

        self.advance();
        let mut children = vec![SearchQuery::field(FieldPredicate::Tag {
            value: self.parse_literal("tag value")?,
        })];
        while self.peek() == Some(&Token::Or) {
            self.advance();
            children.push(SearchQuery::field(FieldPredicate::Tag {
                value: self.parse_literal("tag value")?,
            }));
        }
        self.expect_close_paren()?;

        Ok(collapse(children, |children| SearchQuery::Or { children }))
    }

    /// section:(...) / line:(...), or a single matcher applied to content.
    fn parse_scoped_query(&mut self) -> Result<SearchQuery, QueryError> {
        if self.peek() == Some(&Token::OpenParen) {
            self.advance();
            let sub_query = self.parse_or_expr()?;
            self.expect_close_paren()?;
            Ok(sub_query)
        } else {
            let matcher = self.parse_string_matcher()?;
            Ok(SearchQuery::field(FieldPredicate::Content { matcher }))
        }
    }

    /// A bare word or quoted string.
    fn parse_literal(&mut self, expected: &'static str) -> Result<String, QueryError> {
        match self.advance() {
            Some(Token::Word(w)) => Ok(w),
            Some(Token::QuotedString(s)) => Ok(s),
            Some(tok) => Err(QueryError::Expected {
                expected,
                found: tok.to_string(),
            }),
            None => Err(QueryError::UnexpectedEnd { expected }),
        }
    }

    fn parse_string_matcher(&mut self) -> Result<StringMatcher, QueryError> {
        match self.advance() {
            Some(tok) => string_matcher(tok),
            None => Err(QueryError::UnexpectedEnd {
                expected: "a string, quoted string or regex",
            }),
        }
    }
}

/// Quoted string → exact, regex literal → regex, word → contains.
fn string_matcher(tok: Token) -> Result<StringMatcher, QueryError> {
    match tok {
        Token::QuotedString(value) => Ok(StringMatcher::Exact { value }),
        Token::RegexLiteral(pattern) => Ok(StringMatcher::Regex { pattern }),
        Token::Word(value) => Ok(StringMatcher::Contains { value }),
        tok => Err(QueryError::Expected {
            expected: "a string, quoted string or regex",
            found: tok.to_string(),
        }),
    }
}

fn collapse(mut children: Vec<SearchQuery>, wrap: fn(Vec<SearchQuery>) -> SearchQuery) -> SearchQuery {
    if children.len() == 1 {
        children.remove(0)
    } else {
        wrap(children)
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Parse a search query string into a `SearchQuery` AST.
pub fn parse_query(input: &str) -> Result<SearchQuery, QueryError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(QueryError::Empty);
    }

    let mut parser = Parser::new(tokens);
    let query = parser.parse_or_expr()?;

    if let Some(tok) = parser.advance() {
        return Err(parser.unexpected(&tok));
    }

    Ok(query)
}

// ============================================================================
// Tests
// ============================================================================
