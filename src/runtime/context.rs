//! Evaluation context - three namespaces and the tree walk
//!
//! A path's head resolves from the loop scope, then eager bindings, then lazy
//! bindings (which may fetch). The rest of the path walks the result.

use rustc_hash::FxHashMap;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use super::lazy::LazyBinding;
use super::output::Block;
use super::scope::Scope;
use crate::ast::{BindingSource, Document, Loop, Node};
use crate::error::{Result, SiteError};
use crate::fetch::Fetcher;
use crate::jsonpath;
use crate::markdown::TextTransform;
use crate::sort;
use crate::store::CacheStore;

/// Per-render state: eager values, lazy caches and the fetch capability
pub struct EvalContext<'f> {
    eager: FxHashMap<String, Value>,
    lazy: Vec<LazyBinding>,
    fetcher: &'f mut dyn Fetcher,
}

impl<'f> EvalContext<'f> {
    /// Resolve every binding of `doc`
    ///
    /// Eager bindings fetch now and fall back to the stored copy on failure.
    /// Lazy bindings load their persisted cache. Manual bindings must exist
    /// in `store`.
    pub fn new(doc: &Document, store: &dyn CacheStore, fetcher: &'f mut dyn Fetcher) -> Result<Self> {
        let mut ctx = Self {
            eager: FxHashMap::default(),
            lazy: Vec::new(),
            fetcher,
        };

        for binding in &doc.bindings {
            match &binding.source {
                BindingSource::Eager { url } => {
                    let bytes = match ctx.fetcher.fetch(&binding.target, url) {
                        Ok(bytes) => bytes,
                        Err(source) => match store.load(&binding.target)? {
                            Some(bytes) => {
                                warn!(binding = %binding.name, error = %source, "fetch failed, using stored copy");
                                bytes
                            }
                            None => {
                                return Err(SiteError::Fetch {
                                    name: binding.name.clone(),
                                    target: binding.target.clone(),
                                    source,
                                })
                            }
                        },
                    };
                    let value = decode(&binding.name, &binding.target, &bytes)?;
                    ctx.insert_eager(&binding.name, value)?;
                }
                BindingSource::Lazy { url_template } => {
                    ctx.check_unique(&binding.name)?;
                    let persisted = store.load(&binding.target)?;
                    let lazy = LazyBinding::new(&binding.name, &binding.target, url_template)
                        .with_persisted(persisted.as_deref());
                    debug!(binding = %binding.name, cached = lazy.cache.len(), "lazy binding registered");
                    ctx.lazy.push(lazy);
                }
                BindingSource::Manual => {
                    let bytes = store.load(&binding.target)?.ok_or_else(|| SiteError::MissingData {
                        name: binding.name.clone(),
                        target: binding.target.clone(),
                    })?;
                    let value = decode(&binding.name, &binding.target, &bytes)?;
                    ctx.insert_eager(&binding.name, value)?;
                }
            }
        }

        Ok(ctx)
    }

    /// Add a value to the eager namespace (used for built-in sources such as posts)
    pub fn insert_eager(&mut self, name: &str, value: Value) -> Result<()> {
        self.check_unique(name)?;
        self.eager.insert(name.to_string(), value);
        Ok(())
    }

    fn check_unique(&self, name: &str) -> Result<()> {
        if self.eager.contains_key(name) || self.lazy.iter().any(|b| b.name == name) {
            return Err(SiteError::DuplicateBinding { name: name.to_string() });
        }
        Ok(())
    }

    pub fn eager(&self, name: &str) -> Option<&Value> {
        self.eager.get(name)
    }

    pub fn lazy_binding(&self, name: &str) -> Option<&LazyBinding> {
        self.lazy.iter().find(|b| b.name == name)
    }

    /// Resolve a dotted path; `None` means absent
    pub fn resolve_path(&mut self, path: &str, scope: &Scope<'_>) -> Option<Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        if let Some(value) = scope.get(head).or_else(|| self.eager.get(head)) {
            return descend(value, rest);
        }

        let index = self.lazy.iter().position(|b| b.name == head)?;
        let value = self.resolve_lazy(index, scope)?;
        descend(&value, rest)
    }

    /// Cached or freshly fetched value of a lazy binding for the current scope
    fn resolve_lazy(&mut self, index: usize, scope: &Scope<'_>) -> Option<Value> {
        let Self { eager, lazy, fetcher } = self;
        let binding = &mut lazy[index];

        let (url, key) = binding.template.expand(|ph| {
            let head = scope.get(&ph.head).or_else(|| eager.get(&ph.head))?;
            let value = match &ph.rest {
                Some(rest) => jsonpath::lookup(head, rest)?,
                None => head,
            };
            (!value.is_null()).then(|| jsonpath::stringify(value))
        })?;

        if let Some(hit) = binding.cache.get(&key) {
            return Some(hit.clone());
        }
        if !binding.attempted.insert(key.clone()) {
            return None;
        }

        let bytes = match fetcher.fetch_uncached(&url) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(binding = %binding.name, %key, error = %e, "lazy fetch failed");
                return None;
            }
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => {
                debug!(binding = %binding.name, %key, "lazy value fetched");
                binding.cache.insert(key, value.clone());
                Some(value)
            }
            Err(e) => {
                warn!(binding = %binding.name, %key, error = %e, "lazy response is not JSON");
                None
            }
        }
    }

    /// Walk `nodes` from the top-level scope
    #[instrument(skip_all, fields(nodes = nodes.len()))]
    pub fn evaluate(&mut self, nodes: &[Node], transform: &dyn TextTransform) -> Vec<Block> {
        self.eval_nodes(nodes, &Scope::root(), transform)
    }

    fn eval_nodes(&mut self, nodes: &[Node], scope: &Scope<'_>, transform: &dyn TextTransform) -> Vec<Block> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            let block = match node {
                Node::Section { id, text } => Block::Section {
                    id: id.clone(),
                    html: transform.transform(text),
                },
                Node::Field { path } => Block::Field {
                    path: path.clone(),
                    value: self.resolve_path(path, scope),
                },
                Node::Loop(l) => self.eval_loop(l, scope, transform),
            };
            out.push(block);
        }
        out
    }

    fn eval_loop(&mut self, l: &Loop, scope: &Scope<'_>, transform: &dyn TextTransform) -> Block {
        let frames: Vec<Vec<(String, Value)>> = match self.resolve_path(&l.source, scope) {
            Some(Value::Array(items)) => sort::sorted(items, &l.sort)
                .into_iter()
                .map(|item| match l.vars.first() {
                    Some(var) => vec![(var.clone(), item)],
                    None => Vec::new(),
                })
                .collect(),
            Some(Value::Object(map)) => {
                let entries = map
                    .into_iter()
                    .map(|(key, value)| json!({ "key": key, "value": value }))
                    .collect();
                sort::sorted(entries, &l.sort)
                    .into_iter()
                    .map(|mut entry| {
                        let key = entry["key"].take();
                        let value = entry["value"].take();
                        match l.vars.as_slice() {
                            [k, v] => vec![(k.clone(), key), (v.clone(), value)],
                            [v, ..] => vec![(v.clone(), value)],
                            [] => Vec::new(),
                        }
                    })
                    .collect()
            }
            other => {
                debug!(source = %l.source, found = other.is_some(), "loop source is not iterable");
                Vec::new()
            }
        };

        let iterations = frames
            .into_iter()
            .map(|vars| {
                let child = scope.child(vars);
                self.eval_nodes(&l.body, &child, transform)
            })
            .collect();

        Block::Loop {
            source: l.source.clone(),
            iterations,
        }
    }

    /// Write every lazy cache under its target
    pub fn persist(&self, store: &mut dyn CacheStore) -> Result<()> {
        for binding in &self.lazy {
            store.save(&binding.target, &binding.to_persisted()?)?;
            debug!(binding = %binding.name, entries = binding.cache.len(), "lazy cache persisted");
        }
        Ok(())
    }
}

fn decode(name: &str, target: &str, bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|source| SiteError::Decode {
        name: name.to_string(),
        target: target.to_string(),
        source,
    })
}

fn descend(value: &Value, rest: Option<&str>) -> Option<Value> {
    match rest {
        Some(rest) => jsonpath::resolve(value, rest),
        None => (!value.is_null()).then(|| value.clone()),
    }
}
