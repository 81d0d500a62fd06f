//! Cookie collaborator.
//!
//! Handlers and middleware read inbound cookies and queue outbound ones through
//! [`CookieJar`]. The jar owns `Set-Cookie` serialization; the response builder
//! only copies the lines returned by [`CookieJar::set_cookie_headers`].

use std::collections::HashMap;

use http::HeaderMap;

/// Attributes attached to an outbound cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: Option<String>,
    pub domain: Option<String>,
    pub max_age: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: Option<SameSite>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingCookie {
    name: String,
    value: String,
    options: CookieOptions,
}

/// Request-scoped cookie store: inbound values plus queued writes.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    inbound: HashMap<String, String>,
    pending: Vec<PendingCookie>,
}

/// Parse a `Cookie` request header into name/value pairs.
#[must_use]
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            if name.is_empty() {
                return None;
            }
            let value = parts.next().unwrap_or("").trim();
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

fn strip_control(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | ';'))
        .collect()
}

impl CookieJar {
    /// Build a jar from every `Cookie` header of the request.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut inbound = HashMap::new();
        for value in headers.get_all(http::header::COOKIE) {
            if let Ok(text) = value.to_str() {
                inbound.extend(parse_cookie_header(text));
            }
        }
        Self {
            inbound,
            pending: Vec::new(),
        }
    }

    /// Current value of a cookie, taking writes made during this request into account.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        if let Some(last) = self.pending.iter().rev().find(|c| c.name == name) {
            if last.options.max_age == Some(0) {
                return None;
            }
            return Some(last.value.as_str());
        }
        self.inbound.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: &str, options: CookieOptions) {
        self.pending.retain(|c| c.name != name);
        self.pending.push(PendingCookie {
            name: name.to_string(),
            value: value.to_string(),
            options,
        });
    }

    /// Expire a cookie on the client.
    pub fn delete(&mut self, name: &str, options: CookieOptions) {
        let options = CookieOptions {
            max_age: Some(0),
            ..options
        };
        self.set(name, "", options);
    }

    /// One serialized `Set-Cookie` value per queued write.
    #[must_use]
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.pending
            .iter()
            .map(|cookie| {
                let mut line = format!(
                    "{}={}",
                    strip_control(&cookie.name),
                    strip_control(&cookie.value)
                );
                let opts = &cookie.options;
                if let Some(path) = &opts.path {
                    line.push_str("; Path=");
                    line.push_str(&strip_control(path));
                }
                if let Some(domain) = &opts.domain {
                    line.push_str("; Domain=");
                    line.push_str(&strip_control(domain));
                }
                if let Some(max_age) = opts.max_age {
                    line.push_str(&format!("; Max-Age={max_age}"));
                }
                if opts.http_only {
                    line.push_str("; HttpOnly");
                }
                if opts.secure {
                    line.push_str("; Secure");
                }
                if let Some(same_site) = opts.same_site {
                    line.push_str("; SameSite=");
                    line.push_str(same_site.as_str());
                }
                line
            })
            .collect()
    }
}
