use super::error::ResolveError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

/// Deepest nesting level examined by the fallbacks. Top-level fields sit at depth 1.
pub const MAX_SEARCH_DEPTH: usize = 5;

static EMBEDDED_MEDIA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s",]+\.(?:mp4|mov|avi|webm|m3u8)"#).unwrap()
});

static MEDIA_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://\S+\.(?:mp4|mov|avi|webm|m3u8)").unwrap());

/// One way of pulling a media URL out of a provider document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A string at a fixed field path.
    Field(&'static [&'static str]),
    /// First media URL embedded in any key or string value, in document order.
    TextScan,
    /// First string value anywhere in the tree that is itself a media URL.
    DeepSearch,
}

/// Tried in order; the first strategy to produce a URL wins.
pub const STRATEGIES: &[Strategy] = &[
    Strategy::Field(&["video"]),
    Strategy::Field(&["data", "play"]),
    Strategy::Field(&["downloadUrl"]),
    Strategy::Field(&["url"]),
    Strategy::Field(&["result", "video"]),
    Strategy::Field(&["play"]),
    Strategy::Field(&["videoUrl"]),
    Strategy::TextScan,
    Strategy::DeepSearch,
];

impl Strategy {
    pub fn apply(&self, doc: &Value) -> Option<String> {
        match self {
            Self::Field(path) => {
                let value = path.iter().try_fold(doc, |node, key| node.get(key))?;
                value
                    .as_str()
                    .filter(|s| is_absolute_url(s))
                    .map(str::to_string)
            }
            Self::TextScan => text_scan(doc, 0).map(str::to_string),
            Self::DeepSearch => deep_search(doc, 0).map(str::to_string),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Field(path) => path.join("."),
            Self::TextScan => "text-scan".to_string(),
            Self::DeepSearch => "deep-search".to_string(),
        }
    }
}

/// Runs the full cascade over a provider document.
pub fn extract_media_url(doc: &Value) -> Result<String, ResolveError> {
    for strategy in STRATEGIES {
        if let Some(url) = strategy.apply(doc) {
            debug!(strategy = %strategy.label(), url = %url, "Media URL extracted");
            return Ok(url);
        }
    }

    debug!("No strategy produced a media URL");
    Err(ResolveError::NoMediaUrlFound)
}

/// The JS-style "falsy" documents a provider sends when it has nothing to say.
pub fn is_empty_document(doc: &Value) -> bool {
    match doc {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn is_absolute_url(candidate: &str) -> bool {
    !candidate.is_empty()
        && !candidate.contains(char::is_whitespace)
        && Url::parse(candidate)
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
}

fn is_media_url(candidate: &str) -> bool {
    MEDIA_URL.is_match(candidate) && is_absolute_url(candidate)
}

fn embedded_media_url(text: &str) -> Option<&str> {
    EMBEDDED_MEDIA_URL
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|candidate| is_absolute_url(candidate))
}

/// Scans raw keys and string values, never their escaped JSON form. `node` is a container
/// at `depth`; its keys and children sit at `depth + 1`.
fn text_scan(node: &Value, depth: usize) -> Option<&str> {
    if depth >= MAX_SEARCH_DEPTH {
        return None;
    }

    let entries: Box<dyn Iterator<Item = (Option<&str>, &Value)> + '_> = match node {
        Value::Object(map) => Box::new(map.iter().map(|(k, v)| (Some(k.as_str()), v))),
        Value::Array(items) => Box::new(items.iter().map(|v| (None, v))),
        _ => return None,
    };

    for (key, child) in entries {
        if let Some(found) = key.and_then(embedded_media_url) {
            return Some(found);
        }
        let found = match child {
            Value::String(s) => embedded_media_url(s),
            Value::Object(_) | Value::Array(_) => text_scan(child, depth + 1),
            _ => None,
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

/// `node` is a container at `depth`; its direct children sit at `depth + 1`.
fn deep_search(node: &Value, depth: usize) -> Option<&str> {
    if depth >= MAX_SEARCH_DEPTH {
        return None;
    }

    let children: Box<dyn Iterator<Item = &Value> + '_> = match node {
        Value::Object(map) => Box::new(map.values()),
        Value::Array(items) => Box::new(items.iter()),
        _ => return None,
    };

    for child in children {
        match child {
            Value::String(s) if is_media_url(s) => return Some(s.as_str()),
            Value::Object(_) | Value::Array(_) => {
                if let Some(found) = deep_search(child, depth + 1) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}
