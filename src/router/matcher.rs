//! Regex path matching for dispatch without a host listener.
//!
//! Patterns use `:name` for a single segment and `*` for any remainder:
//!
//! | Pattern | Regex | Captures |
//! |---|---|---|
//! | `/users/:id` | `^/users/([^/]+)$` | `id` |
//! | `/api/*` | `^/api/(.*)$` | `*` |
//! | `/:org/files/*` | `^/([^/]+)/files/(.*)$` | `org`, `*` |
//!
//! Literal text is regex-escaped, so `.` or `+` in a pattern match themselves.

use std::collections::HashMap;

use regex::Regex;

/// Capture name recorded for `*` segments.
pub const WILDCARD_PARAM: &str = "*";

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
    param_names: Vec<String>,
}

fn is_param_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Translate a route pattern into an anchored regex source and its ordered
/// capture names.
pub(crate) fn path_to_regex(path: &str) -> (String, Vec<String>) {
    let mut pattern = String::with_capacity(path.len() + 8);
    pattern.push('^');
    let mut param_names = Vec::new();
    let mut literal = String::new();

    let mut chars = path.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ':' if chars.peek().copied().is_some_and(is_param_char) => {
                pattern.push_str(&regex::escape(&literal));
                literal.clear();
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if !is_param_char(next) {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                pattern.push_str("([^/]+)");
                param_names.push(name);
            }
            '*' => {
                pattern.push_str(&regex::escape(&literal));
                literal.clear();
                pattern.push_str("(.*)");
                param_names.push(WILDCARD_PARAM.to_string());
            }
            other => literal.push(other),
        }
    }
    pattern.push_str(&regex::escape(&literal));
    pattern.push('$');

    (pattern, param_names)
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

impl PathPattern {
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        let (pattern, param_names) = path_to_regex(source);
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(&pattern)?,
            param_names,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match a request path and return its percent-decoded parameters.
    ///
    /// A name captured twice keeps the later segment.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<HashMap<String, String>> {
        let captures = self.regex.captures(path)?;
        let mut params = HashMap::with_capacity(self.param_names.len());
        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(value) = captures.get(i + 1) {
                params.insert(name.clone(), decode(value.as_str()));
            }
        }
        Some(params)
    }
}
