//! sitegen - static page renderer for `.hi` documents

pub mod ast;
pub mod config;
pub mod error;
pub mod fetch;
pub mod html;
pub mod jsonpath;
pub mod markdown;
pub mod parser;
pub mod posts;
pub mod runner;
pub mod runtime;
pub mod sort;
pub mod store;

pub use ast::{Binding, BindingSource, Document, Loop, Node, SortKey};
pub use config::{PostsConfig, RenderOptions};
pub use error::{FetchError, FixSuggestion, Result, SiteError};
pub use fetch::{Fetcher, HttpFetcher, MockFetcher};
pub use markdown::{MarkdownTransform, TextTransform};
pub use parser::parse;
pub use runner::{RenderReport, Runner};
pub use runtime::{Block, EvalContext, Scope};
pub use store::{CacheStore, DataDirStore, MemoryStore};
