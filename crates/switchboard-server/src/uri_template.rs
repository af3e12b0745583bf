//! URI Template System for Dynamic Resources
//!
//! RFC 6570 subset used to register parametric resources. Supported
//! operators: simple `{var}`, reserved `{+var}`, fragment `{#var}`,
//! label `{.var}`, path `{/var}`, query `{?a,b}` and continuation `{&a}`,
//! each with optional explode (`*`).
//!
//! A template compiles once into an anchored regex; matching captures
//! variables positionally, splits joined lists and percent-decodes the
//! items, so `t.match_uri(&t.expand(&vars)?)` recovers `vars`.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Longest accepted template pattern or candidate URI
pub const MAX_TEMPLATE_LENGTH: usize = 1_000_000;
/// Longest accepted variable name or value
pub const MAX_VARIABLE_LENGTH: usize = 1_000_000;
/// Most `{...}` expressions a single template may contain
pub const MAX_TEMPLATE_EXPRESSIONS: usize = 10_000;
/// Longest regex a template may compile into
pub const MAX_REGEX_LENGTH: usize = 1_000_000;

lazy_static::lazy_static! {
    static ref TEMPLATE_EXPRESSION: Regex = Regex::new(r"\{[^}\s]+\}").expect("static regex");
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UriTemplateError {
    #[error("{what} exceeds maximum length of {max} characters (got {len})")]
    TooLong {
        what: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Template contains too many expressions (max {0})")]
    TooManyExpressions(usize),

    #[error("Unclosed template expression starting at offset {0}")]
    UnclosedExpression(usize),

    #[error("Empty template expression at offset {0}")]
    EmptyExpression(usize),

    #[error("Failed to compile template: {0}")]
    InvalidPattern(String),
}

/// The value bound to a template variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableValue {
    Single(String),
    List(Vec<String>),
}

impl VariableValue {
    /// The scalar value, or the first element of a list
    pub fn first(&self) -> Option<&str> {
        match self {
            VariableValue::Single(s) => Some(s),
            VariableValue::List(items) => items.first().map(String::as_str),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            VariableValue::Single(s) => Value::String(s.clone()),
            VariableValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }

    fn items(&self) -> Vec<&str> {
        match self {
            VariableValue::Single(s) => vec![s.as_str()],
            VariableValue::List(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for VariableValue {
    fn from(s: &str) -> Self {
        VariableValue::Single(s.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(s: String) -> Self {
        VariableValue::Single(s)
    }
}

impl From<Vec<String>> for VariableValue {
    fn from(items: Vec<String>) -> Self {
        VariableValue::List(items)
    }
}

impl From<Vec<&str>> for VariableValue {
    fn from(items: Vec<&str>) -> Self {
        VariableValue::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Variable assignment used for expansion and produced by matching
pub type Variables = HashMap<String, VariableValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Simple,
    Reserved,
    Fragment,
    Label,
    Path,
    Query,
    QueryContinuation,
}

impl Operator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Reserved),
            '#' => Some(Operator::Fragment),
            '.' => Some(Operator::Label),
            '/' => Some(Operator::Path),
            '?' => Some(Operator::Query),
            '&' => Some(Operator::QueryContinuation),
            _ => None,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Operator::Simple | Operator::Reserved => "",
            Operator::Fragment => "#",
            Operator::Label => ".",
            Operator::Path => "/",
            Operator::Query => "?",
            Operator::QueryContinuation => "&",
        }
    }

    /// Joins both multiple variables and list items
    fn separator(self) -> &'static str {
        match self {
            Operator::Label => ".",
            Operator::Path => "/",
            Operator::Query | Operator::QueryContinuation => "&",
            Operator::Simple | Operator::Reserved | Operator::Fragment => ",",
        }
    }

    fn is_query(self) -> bool {
        matches!(self, Operator::Query | Operator::QueryContinuation)
    }

    fn allows_reserved(self) -> bool {
        matches!(self, Operator::Reserved | Operator::Fragment)
    }
}

#[derive(Debug, Clone)]
struct Expression {
    operator: Operator,
    names: Vec<String>,
    exploded: bool,
}

#[derive(Debug, Clone)]
enum Part {
    Literal(String),
    Expression(Expression),
}

/// How a captured value turns back into a [`VariableValue`]
#[derive(Debug, Clone, Copy)]
enum Split {
    Never,
    /// Always a list, even with one item
    Always(&'static str),
    /// A list only when the separator occurs; item values never contain it
    /// unencoded
    WhenJoined(&'static str),
}

/// One positional capture group of the compiled regex
#[derive(Debug, Clone)]
struct Capture {
    name: String,
    split: Split,
}

/// A parsed, compiled URI template
#[derive(Debug, Clone)]
pub struct UriTemplate {
    pattern: String,
    parts: Vec<Part>,
    regex: Regex,
    captures: Vec<Capture>,
}

impl UriTemplate {
    /// True iff `pattern` contains at least one non-empty `{...}` expression
    pub fn is_template(pattern: &str) -> bool {
        TEMPLATE_EXPRESSION.is_match(pattern)
    }

    /// Parse and compile a template pattern
    pub fn parse(pattern: &str) -> Result<Self, UriTemplateError> {
        check_length("Template", pattern, MAX_TEMPLATE_LENGTH)?;
        let parts = parse_parts(pattern)?;
        let (regex, captures) = compile(&parts)?;
        Ok(Self {
            pattern: pattern.to_string(),
            parts,
            regex,
            captures,
        })
    }

    /// The original pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Variable names in order of appearance
    pub fn variable_names(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Expression(expr) => Some(expr.names.iter().map(String::as_str)),
                Part::Literal(_) => None,
            })
            .flatten()
            .collect()
    }

    /// Expand the template; absent variables are omitted along with their prefix
    pub fn expand(&self, variables: &Variables) -> Result<String, UriTemplateError> {
        let mut result = String::new();
        let mut has_query = false;

        for part in &self.parts {
            match part {
                Part::Literal(text) => result.push_str(text),
                Part::Expression(expr) => {
                    let expanded = expand_expression(expr, variables)?;
                    if expanded.is_empty() {
                        continue;
                    }
                    if expr.operator.is_query() && has_query {
                        result.push_str(&expanded.replacen('?', "&", 1));
                    } else {
                        result.push_str(&expanded);
                    }
                    if expr.operator.is_query() {
                        has_query = true;
                    }
                }
            }
        }

        Ok(result)
    }

    /// Match a concrete URI; `Ok(None)` when it does not fit the template.
    ///
    /// Query variables must appear in the order the template declares them.
    pub fn match_uri(&self, uri: &str) -> Result<Option<Variables>, UriTemplateError> {
        check_length("URI", uri, MAX_TEMPLATE_LENGTH)?;

        let Some(caps) = self.regex.captures(uri) else {
            return Ok(None);
        };

        let mut variables = Variables::new();
        for (index, capture) in self.captures.iter().enumerate() {
            let Some(raw) = caps.get(index + 1) else {
                continue;
            };
            let raw = raw.as_str();
            let value = match capture.split {
                Split::Always(sep) => {
                    VariableValue::List(raw.split(sep).map(percent_decode).collect())
                }
                Split::WhenJoined(sep) if raw.contains(sep) => {
                    VariableValue::List(raw.split(sep).map(percent_decode).collect())
                }
                _ => VariableValue::Single(percent_decode(raw)),
            };
            variables.insert(capture.name.clone(), value);
        }

        Ok(Some(variables))
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn check_length(what: &'static str, value: &str, max: usize) -> Result<(), UriTemplateError> {
    if value.len() > max {
        return Err(UriTemplateError::TooLong {
            what,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

fn parse_parts(pattern: &str) -> Result<Vec<Part>, UriTemplateError> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut expression_count = 0;
    let mut rest = pattern;
    let mut offset = 0;

    while let Some(start) = rest.find('{') {
        literal.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find('}')
            .ok_or(UriTemplateError::UnclosedExpression(offset + start))?;

        expression_count += 1;
        if expression_count > MAX_TEMPLATE_EXPRESSIONS {
            return Err(UriTemplateError::TooManyExpressions(MAX_TEMPLATE_EXPRESSIONS));
        }

        if !literal.is_empty() {
            parts.push(Part::Literal(std::mem::take(&mut literal)));
        }

        let body = &after[..end];
        let operator = body
            .chars()
            .next()
            .and_then(Operator::from_char)
            .unwrap_or(Operator::Simple);
        let names_src = if operator == Operator::Simple {
            body
        } else {
            &body[1..]
        };
        let names: Vec<String> = names_src
            .split(',')
            .map(|name| name.replace('*', "").trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        if names.is_empty() {
            return Err(UriTemplateError::EmptyExpression(offset + start));
        }
        for name in &names {
            check_length("Variable name", name, MAX_VARIABLE_LENGTH)?;
        }

        parts.push(Part::Expression(Expression {
            operator,
            names,
            exploded: body.contains('*'),
        }));

        let consumed = start + 1 + end + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        parts.push(Part::Literal(literal));
    }
    Ok(parts)
}

fn compile(parts: &[Part]) -> Result<(Regex, Vec<Capture>), UriTemplateError> {
    let mut pattern = String::from("^");
    let mut captures = Vec::new();
    let mut has_query = false;

    for part in parts {
        match part {
            Part::Literal(text) => pattern.push_str(&regex::escape(text)),
            Part::Expression(expr) if expr.operator.is_query() => {
                for (index, name) in expr.names.iter().enumerate() {
                    let lead = if index == 0 && !has_query {
                        expr.operator.prefix()
                    } else {
                        "&"
                    };
                    pattern.push_str(&regex::escape(lead));
                    pattern.push_str(&regex::escape(name));
                    pattern.push_str("=([^&]+)");
                    captures.push(Capture {
                        name: name.clone(),
                        split: Split::WhenJoined(","),
                    });
                }
                has_query = true;
            }
            Part::Expression(expr) => {
                let single = expr.names.len() == 1;
                let sep = expr.operator.separator();
                let group = value_group(expr.operator, expr.exploded, single);

                pattern.push_str(&regex::escape(expr.operator.prefix()));
                for (index, name) in expr.names.iter().enumerate() {
                    if index > 0 {
                        pattern.push_str(&regex::escape(sep));
                    }
                    pattern.push_str(group);
                    captures.push(Capture {
                        name: name.clone(),
                        split: split_for(expr.operator, expr.exploded, single),
                    });
                }
            }
        }
    }

    pattern.push('$');
    if pattern.len() > MAX_REGEX_LENGTH {
        return Err(UriTemplateError::TooLong {
            what: "Generated regex",
            len: pattern.len(),
            max: MAX_REGEX_LENGTH,
        });
    }

    let regex =
        Regex::new(&pattern).map_err(|e| UriTemplateError::InvalidPattern(e.to_string()))?;
    Ok((regex, captures))
}

fn value_group(operator: Operator, exploded: bool, single: bool) -> &'static str {
    match (operator, exploded, single) {
        (Operator::Reserved | Operator::Fragment, _, true) => "(.+)",
        (Operator::Reserved | Operator::Fragment, _, false) => "([^,]+)",
        (Operator::Simple, _, true) => "([^/]+)",
        (Operator::Path, _, true) => "([^/,]+(?:/[^/,]+)*)",
        (Operator::Label, _, false) => "([^/,.]+)",
        _ => "([^/,]+)",
    }
}

/// Lone simple and path variables accept joined lists exploded or not
fn split_for(operator: Operator, exploded: bool, single: bool) -> Split {
    let sep = operator.separator();
    match (operator, exploded, single) {
        (_, true, true) => Split::Always(sep),
        (Operator::Simple | Operator::Path, false, true) => Split::WhenJoined(sep),
        _ => Split::Never,
    }
}

fn expand_expression(expr: &Expression, variables: &Variables) -> Result<String, UriTemplateError> {
    let operator = expr.operator;

    if operator.is_query() {
        let mut pairs = Vec::new();
        for name in &expr.names {
            if let Some(value) = variables.get(name) {
                pairs.push(format!("{}={}", name, encode_items(operator, value, ",")?));
            }
        }
        if pairs.is_empty() {
            return Ok(String::new());
        }
        return Ok(format!("{}{}", operator.prefix(), pairs.join("&")));
    }

    let sep = operator.separator();
    let mut values = Vec::new();
    for name in &expr.names {
        if let Some(value) = variables.get(name) {
            values.push(encode_items(operator, value, sep)?);
        }
    }
    if values.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("{}{}", operator.prefix(), values.join(sep)))
}

fn encode_items(
    operator: Operator,
    value: &VariableValue,
    join: &str,
) -> Result<String, UriTemplateError> {
    let mut encoded = Vec::new();
    for item in value.items() {
        check_length("Variable value", item, MAX_VARIABLE_LENGTH)?;
        encoded.push(if operator.allows_reserved() {
            encode_reserved(item)
        } else {
            urlencoding::encode(item).into_owned()
        });
    }
    Ok(encoded.join(join))
}

/// Percent-encode everything outside the unreserved and reserved sets
fn encode_reserved(value: &str) -> String {
    const RESERVED: &str = ":/?#[]@!$&'()*+,;=";
    let mut out = String::with_capacity(value.len());
    let mut buf = [0u8; 4];
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || "-._~".contains(c) || RESERVED.contains(c) {
            out.push(c);
        } else {
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    out
}

fn percent_decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
