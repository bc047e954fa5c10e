//! Error types with fix suggestions
//!
//! Error code ranges:
//! - SG-010-019: Document syntax errors
//! - SG-020-029: Fetch errors
//! - SG-030-039: Data decode / missing data errors
//! - SG-040-049: Config and posts errors
//! - SG-090-099: IO errors

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

pub type Result<T> = std::result::Result<T, SiteError>;

#[derive(Error, Debug)]
pub enum SiteError {
    // ─────────────────────────────────────────────────────────────
    // Syntax (SG-010 to SG-019)
    // ─────────────────────────────────────────────────────────────
    #[error("SG-010: Syntax error on line {line}: {details}\n    | {text}")]
    Syntax {
        line: usize,
        text: String,
        details: String,
    },

    // ─────────────────────────────────────────────────────────────
    // Fetch (SG-020 to SG-029)
    // ─────────────────────────────────────────────────────────────
    #[error("SG-020: Binding '{name}' could not be fetched and has no cached copy at '{target}': {source}")]
    Fetch {
        name: String,
        target: String,
        #[source]
        source: FetchError,
    },

    #[error("SG-021: Fetcher setup failed: {0}")]
    FetcherSetup(#[from] FetchError),

    // ─────────────────────────────────────────────────────────────
    // Data (SG-030 to SG-039)
    // ─────────────────────────────────────────────────────────────
    #[error("SG-030: Binding '{name}' holds malformed JSON in '{target}': {source}")]
    Decode {
        name: String,
        target: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("SG-031: Manual binding '{name}' has no data at '{target}'")]
    MissingData { name: String, target: String },

    #[error("SG-032: Binding name '{name}' is already taken")]
    DuplicateBinding { name: String },

    #[error("SG-033: JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Config / posts (SG-040 to SG-049)
    // ─────────────────────────────────────────────────────────────
    #[error("SG-040: Config parse error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("SG-041: Invalid posts pattern '{pattern}': {details}")]
    Posts { pattern: String, details: String },

    #[error("SG-042: Layout '{path}' has no <!--CONTENT--> marker")]
    LayoutMarker { path: String },

    // ─────────────────────────────────────────────────────────────
    // IO (SG-090)
    // ─────────────────────────────────────────────────────────────
    #[error("SG-090: IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SiteError {
    /// Build a syntax error for a 1-based source line
    pub fn syntax(line: usize, text: &str, details: impl Into<String>) -> Self {
        SiteError::Syntax {
            line,
            text: text.to_string(),
            details: details.into(),
        }
    }

    /// Line number for syntax errors
    pub fn line(&self) -> Option<usize> {
        match self {
            SiteError::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl FixSuggestion for SiteError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            SiteError::Syntax { .. } => {
                Some("Bodies nest by two spaces; loops read `[for item in source: field^]`")
            }
            SiteError::Fetch { .. } => {
                Some("Check the URL and network, or place a cached copy in the data directory")
            }
            SiteError::FetcherSetup(_) => Some("Check that the data directory and its .etag.json are readable"),
            SiteError::Decode { .. } => Some("Ensure the source returns valid JSON (try parsing with jq)"),
            SiteError::MissingData { .. } => {
                Some("Create the file in the data directory or give the binding a `<< url`")
            }
            SiteError::DuplicateBinding { .. } => Some("Use unique names for bindings"),
            SiteError::Json(_) => None,
            SiteError::Config(_) => Some("Check YAML syntax: indentation and quoting"),
            SiteError::Posts { .. } => Some("Use a glob such as posts/*.md"),
            SiteError::LayoutMarker { .. } => Some("Add <!--CONTENT--> where the body belongs"),
            SiteError::Io(_) => Some("Check file path and permissions"),
        }
    }
}

/// Failure reported by a fetch capability
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL '{url}': {details}")]
    InvalidUrl { url: String, details: String },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP client could not be built: {0}")]
    Client(#[source] reqwest::Error),

    #[error("no stored copy for '{target}' after 304 from {url}")]
    NotModifiedWithoutCopy { url: String, target: String },

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
