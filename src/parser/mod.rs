//! Grammar Parser - `.hi` source text → `Document`
//!
//! Two passes over the source:
//! - header: binding lines are pulled out wherever they appear
//! - body: the remaining lines form an indentation-structured node tree
//!
//! Binding forms:
//! ```text
//! things = things.json                              # manual (cache store only)
//! repos  = repos.json << https://api.example/repos  # eager
//! !langs = langs.json << https://api.example/{repo.name}/languages  # lazy
//! ```

mod body;
mod sort_spec;

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::ast::{Binding, BindingSource, Document};
use crate::error::{Result, SiteError};

pub use sort_spec::parse_sort;

static BIND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(!?)([A-Za-z0-9_]+)\s*=\s*(.+)$").expect("valid binding regex"));

static FETCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^<\s]+)\s*<<\s*(.+)$").expect("valid fetch regex"));

/// A body line with its 1-based line number
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    pub no: usize,
    pub text: &'a str,
}

/// Parse a source document into bindings and body nodes
pub fn parse(source: &str) -> Result<Document> {
    let mut bindings = Vec::new();
    let mut names = FxHashSet::default();
    let mut body_lines = Vec::new();

    for (idx, text) in source.lines().enumerate() {
        let no = idx + 1;
        let trimmed = text.trim();

        if trimmed.starts_with('#') {
            continue;
        }
        if trimmed.is_empty() {
            body_lines.push(Line { no, text });
            continue;
        }

        match parse_binding(text, no) {
            Some(binding) => {
                if !names.insert(binding.name.clone()) {
                    return Err(SiteError::syntax(
                        no,
                        text,
                        format!("duplicate binding '{}'", binding.name),
                    ));
                }
                bindings.push(binding);
            }
            None => body_lines.push(Line { no, text }),
        }
    }

    let nodes = body::parse_body(&body_lines)?;
    debug!(bindings = bindings.len(), nodes = nodes.len(), "parsed document");

    Ok(Document { bindings, nodes })
}

/// Match a header line; `None` defers the line to the body grammar
fn parse_binding(text: &str, line: usize) -> Option<Binding> {
    let caps = BIND_RE.captures(text)?;
    let lazy = &caps[1] == "!";
    let name = caps[2].to_string();
    let rest = &caps[3];

    let (target, source) = match FETCH_RE.captures(rest) {
        Some(fetch) => {
            let target = fetch[1].trim().to_string();
            let url = fetch[2].trim().to_string();
            let source = if lazy {
                BindingSource::Lazy { url_template: url }
            } else {
                BindingSource::Eager { url }
            };
            (target, source)
        }
        None => (rest.trim().to_string(), BindingSource::Manual),
    };

    Some(Binding {
        name,
        target,
        source,
        line,
    })
}
