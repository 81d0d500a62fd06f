use std::collections::HashMap;

use anyhow::Context;
use base64::Engine;
use http::header::{
    HeaderName, HeaderValue, CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION, SET_COOKIE,
};
use http::{HeaderMap, Response, StatusCode};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::cookies::CookieJar;
use crate::reply::Reply;

/// Image formats recognised by [`Content::Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Svg,
    Gif,
    Webp,
}

impl ImageKind {
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Svg => "image/svg+xml",
            ImageKind::Gif => "image/gif",
            ImageKind::Webp => "image/webp",
        }
    }
}

/// How the pipeline result is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Content {
    /// Strings as text, objects and arrays as JSON, everything else as text.
    #[default]
    Auto,
    Json,
    Text,
    Html,
    Xml,
    /// String results are base64 decoded; bytes pass through.
    Image(ImageKind),
    /// Served as an attachment under the given filename.
    Csv { filename: String },
}

/// Mutable response configuration shared by every step of the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSetter {
    pub status: u16,
    pub content: Content,
    pub headers: HashMap<String, String>,
    pub redirect: Option<String>,
    /// Duration such as `30s`, `5m`, `1h`, `7d`.
    pub cache: Option<String>,
}

impl Default for ResponseSetter {
    fn default() -> Self {
        Self {
            status: 200,
            content: Content::Auto,
            headers: HashMap::new(),
            redirect: None,
            cache: None,
        }
    }
}

impl ResponseSetter {
    /// Add or replace an explicit response header.
    ///
    /// Names are stored lowercased, so `X-A` and `x-a` are the same header and
    /// the later call wins.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let mut name = name.into();
        name.make_ascii_lowercase();
        self.headers.insert(name, value.into());
        self
    }

    pub fn redirect_to(&mut self, url: impl Into<String>) -> &mut Self {
        self.redirect = Some(url.into());
        self
    }
}

static CACHE_DURATION: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^(\d+)([smhd])$").expect("valid cache duration pattern")
});

/// Seconds for a `<integer><unit>` duration; unparsable input maps to 0.
#[must_use]
pub fn max_age_seconds(duration: &str) -> u64 {
    let Some(caps) = CACHE_DURATION.captures(duration) else {
        return 0;
    };
    let amount: u64 = caps[1].parse().unwrap_or(0);
    let multiplier = match &caps[2] {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        _ => 0,
    };
    amount.saturating_mul(multiplier)
}

/// `Cache-Control` value for a duration string.
#[must_use]
pub fn cache_control(duration: &str) -> String {
    format!("public, max-age={}", max_age_seconds(duration))
}

/// Make a filename safe for a quoted `Content-Disposition` parameter:
/// CR and LF are removed, backslashes and double quotes are escaped.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let mut out = String::with_capacity(filename.len());
    for c in filename.chars() {
        match c {
            '\r' | '\n' => {}
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

fn decode_image(result: &Reply) -> Vec<u8> {
    match result {
        Reply::Json(serde_json::Value::String(encoded)) => {
            match base64::engine::general_purpose::STANDARD.decode(encoded.trim()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(error = %e, "Image result is not valid base64, sending raw text");
                    encoded.as_bytes().to_vec()
                }
            }
        }
        other => other.to_text_bytes(),
    }
}

/// Resolve the content type and body for a result.
fn resolve_content(
    content: &Content,
    result: &Reply,
) -> anyhow::Result<(String, Option<String>, Vec<u8>)> {
    let resolved = match content {
        Content::Json => ("application/json".to_string(), None, result.to_json_bytes()?),
        Content::Text => ("text/plain".to_string(), None, result.to_text_bytes()),
        Content::Html => ("text/html".to_string(), None, result.to_text_bytes()),
        Content::Xml => ("application/xml".to_string(), None, result.to_text_bytes()),
        Content::Image(kind) => (kind.mime().to_string(), None, decode_image(result)),
        Content::Csv { filename } => (
            "text/csv".to_string(),
            Some(format!(
                "attachment; filename=\"{}\"",
                sanitize_filename(filename)
            )),
            result.to_text_bytes(),
        ),
        Content::Auto => match result {
            Reply::Json(value @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) => (
                "application/json".to_string(),
                None,
                serde_json::to_vec(value)?,
            ),
            Reply::Bytes(bytes) => ("application/octet-stream".to_string(), None, bytes.clone()),
            other => ("text/plain".to_string(), None, other.to_text_bytes()),
        },
    };
    Ok(resolved)
}

fn explicit_headers(set: &ResponseSetter) -> anyhow::Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(set.headers.len() + 3);
    // `headers` is public, so case variants can still arrive by direct insert.
    // Sorted order makes the lowercase spelling win consistently.
    let mut entries: Vec<(&String, &String)> = set.headers.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    for (name, value) in entries {
        let name = HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("invalid response header name {name:?}"))?;
        let value = HeaderValue::from_str(value)
            .with_context(|| format!("invalid value for response header {name}"))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn append_cookies(headers: &mut HeaderMap, cookies: &CookieJar) -> anyhow::Result<()> {
    for line in cookies.set_cookie_headers() {
        let value = HeaderValue::from_str(&line).context("invalid Set-Cookie value")?;
        headers.append(SET_COOKIE, value);
    }
    Ok(())
}

fn finish(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Response<Vec<u8>> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Turn the pipeline result and the final response configuration into an HTTP response.
///
/// Header precedence: explicit headers from `set.headers` are applied first,
/// then the derived `Content-Type`, `Content-Disposition` and `Cache-Control`
/// overwrite any explicit header with the same name. `Set-Cookie` lines from
/// the jar are appended last.
pub fn build_response(
    result: &Reply,
    set: &ResponseSetter,
    cookies: &CookieJar,
) -> anyhow::Result<Response<Vec<u8>>> {
    let mut headers = explicit_headers(set)?;

    if let Some(location) = &set.redirect {
        let status = if (300..400).contains(&set.status) {
            set.status
        } else {
            302
        };
        let status = StatusCode::from_u16(status).context("invalid redirect status")?;
        headers.insert(
            LOCATION,
            HeaderValue::from_str(location).context("invalid redirect location")?,
        );
        append_cookies(&mut headers, cookies)?;
        debug!(status = status.as_u16(), location = %location, "Redirect response built");
        return Ok(finish(status, headers, Vec::new()));
    }

    let status = StatusCode::from_u16(set.status)
        .with_context(|| format!("invalid response status {}", set.status))?;

    let (content_type, disposition, mut body) = resolve_content(&set.content, result)?;
    if result.is_nullish() {
        body.clear();
    }

    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(&content_type).context("invalid content type")?,
    );
    if let Some(disposition) = disposition {
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition).context("invalid content disposition")?,
        );
    }
    if let Some(cache) = &set.cache {
        headers.insert(
            CACHE_CONTROL,
            HeaderValue::from_str(&cache_control(cache)).context("invalid cache control")?,
        );
    }
    append_cookies(&mut headers, cookies)?;

    debug!(
        status = status.as_u16(),
        content_type = %content_type,
        body_size_bytes = body.len(),
        "Response built"
    );
    Ok(finish(status, headers, body))
}
