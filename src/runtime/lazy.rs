//! Lazy bindings - per-key fetches with a persisted cache
//!
//! A lazy binding's URL template carries `{head.rest}` placeholders. Each use
//! expands the template against the current scope; the first placeholder's
//! text is the cache key (the whole URL when there are no placeholders).
//!
//! Per run, a key is fetched at most once: hits come from `cache`, failed keys
//! are remembered in `attempted` and stay absent.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};
use tracing::warn;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^}]+)\}").expect("valid placeholder regex"));

/// `{head.rest}` inside a URL template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub head: String,
    pub rest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Placeholder(Placeholder),
}

/// Parsed URL template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    raw: String,
    parts: Vec<Part>,
}

impl UrlTemplate {
    pub fn parse(raw: &str) -> Self {
        let mut parts = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER_RE.captures_iter(raw) {
            let (Some(whole), Some(expr)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                parts.push(Part::Literal(raw[last..whole.start()].to_string()));
            }
            let expr = expr.as_str().trim();
            let placeholder = match expr.split_once('.') {
                Some((head, rest)) => Placeholder {
                    head: head.to_string(),
                    rest: Some(rest.to_string()),
                },
                None => Placeholder {
                    head: expr.to_string(),
                    rest: None,
                },
            };
            parts.push(Part::Placeholder(placeholder));
            last = whole.end();
        }
        if last < raw.len() {
            parts.push(Part::Literal(raw[last..].to_string()));
        }

        Self {
            raw: raw.to_string(),
            parts,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.parts.iter().filter_map(|p| match p {
            Part::Placeholder(ph) => Some(ph),
            Part::Literal(_) => None,
        })
    }

    /// Substitute placeholders via `resolve`, returning `(url, cache_key)`
    ///
    /// `None` when any placeholder resolves to nothing.
    pub fn expand<F>(&self, mut resolve: F) -> Option<(String, String)>
    where
        F: FnMut(&Placeholder) -> Option<String>,
    {
        let mut url = String::with_capacity(self.raw.len() + 32);
        let mut key = None;

        for part in &self.parts {
            match part {
                Part::Literal(text) => url.push_str(text),
                Part::Placeholder(ph) => {
                    let text = resolve(ph)?;
                    url.push_str(&text);
                    key.get_or_insert(text);
                }
            }
        }

        let key = key.unwrap_or_else(|| url.clone());
        Some((url, key))
    }
}

/// Runtime state of one `!name = target << template` binding
#[derive(Debug, Clone)]
pub struct LazyBinding {
    pub name: String,
    pub target: String,
    pub template: UrlTemplate,
    /// Resolved key → decoded value; persisted under `target`
    pub cache: Map<String, Value>,
    /// Keys fetched (or tried) during this run
    pub attempted: FxHashSet<String>,
}

impl LazyBinding {
    pub fn new(name: impl Into<String>, target: impl Into<String>, template: &str) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            template: UrlTemplate::parse(template),
            cache: Map::new(),
            attempted: FxHashSet::default(),
        }
    }

    /// Seed the cache from previously persisted bytes
    ///
    /// Bytes that are not a JSON object are discarded with a warning.
    pub fn with_persisted(mut self, bytes: Option<&[u8]>) -> Self {
        let Some(bytes) = bytes else {
            return self;
        };
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => self.cache = map,
            Ok(_) => warn!(binding = %self.name, target = %self.target, "lazy cache is not an object, starting empty"),
            Err(e) => warn!(binding = %self.name, target = %self.target, error = %e, "lazy cache is malformed, starting empty"),
        }
        self
    }

    /// Bytes to persist under `target`
    pub fn to_persisted(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lookup(ph: &Placeholder) -> Option<String> {
        match (ph.head.as_str(), ph.rest.as_deref()) {
            ("repo", Some("name")) => Some("sitegen".into()),
            ("repo", Some("owner.login")) => Some("someone".into()),
            ("page", None) => Some("2".into()),
            _ => None,
        }
    }

    #[test]
    fn parses_placeholders_and_literals() {
        let t = UrlTemplate::parse("https://api.github.com/repos/{repo.owner.login}/{repo.name}/languages");
        let phs: Vec<_> = t.placeholders().collect();
        assert_eq!(phs.len(), 2);
        assert_eq!(phs[0].head, "repo");
        assert_eq!(phs[0].rest.as_deref(), Some("owner.login"));
        assert_eq!(t.as_str(), "https://api.github.com/repos/{repo.owner.login}/{repo.name}/languages");
    }

    #[test]
    fn first_placeholder_is_the_key() {
        let t = UrlTemplate::parse("https://x/{repo.owner.login}/{repo.name}");
        let (url, key) = t.expand(lookup).unwrap();
        assert_eq!(url, "https://x/someone/sitegen");
        assert_eq!(key, "someone");
    }

    #[test]
    fn url_is_the_key_without_placeholders() {
        let t = UrlTemplate::parse("https://x/static.json");
        let (url, key) = t.expand(lookup).unwrap();
        assert_eq!(url, "https://x/static.json");
        assert_eq!(key, url);
    }

    #[test]
    fn bare_placeholder_resolves_head_only() {
        let t = UrlTemplate::parse("https://x/?page={page}");
        assert_eq!(t.expand(lookup).unwrap().0, "https://x/?page=2");
    }

    #[test]
    fn absent_placeholder_aborts_expansion() {
        let t = UrlTemplate::parse("https://x/{repo.missing}");
        assert!(t.expand(lookup).is_none());
    }

    #[test]
    fn persisted_cache_round_trip() {
        let mut binding = LazyBinding::new("langs", "langs.json", "https://x/{repo.name}");
        binding.cache.insert("sitegen".into(), json!({"Rust": 100}));
        let bytes = binding.to_persisted().unwrap();

        let reloaded = LazyBinding::new("langs", "langs.json", "https://x/{repo.name}")
            .with_persisted(Some(&bytes));
        assert_eq!(reloaded.cache.get("sitegen"), Some(&json!({"Rust": 100})));
        assert!(reloaded.attempted.is_empty());
    }

    #[test]
    fn malformed_persisted_cache_starts_empty() {
        let b = LazyBinding::new("l", "l.json", "https://x").with_persisted(Some(b"[1, 2]"));
        assert!(b.cache.is_empty());
        let b = LazyBinding::new("l", "l.json", "https://x").with_persisted(Some(b"{oops"));
        assert!(b.cache.is_empty());
    }
}
