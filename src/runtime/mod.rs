//! Runtime Module - document evaluation
//!
//! Contains the evaluation components:
//! - `context`: EvalContext, the three-namespace resolver and tree walker
//! - `scope`: immutable loop-variable frames
//! - `lazy`: lazy bindings, URL templates and their per-key cache
//! - `output`: Block, the resolved tree handed to presentation
//!
//! This module represents the "how" - evaluation of a parsed document.
//! For static structure, see the `ast` module.

mod context;
mod lazy;
mod output;
mod scope;

// Re-export public types
pub use context::EvalContext;
pub use lazy::{LazyBinding, Placeholder, UrlTemplate};
pub use output::Block;
pub use scope::Scope;
