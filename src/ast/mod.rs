//! AST Module - parsed `.hi` documents
//!
//! Contains the immutable result of parsing a source document:
//! - `binding`: Binding, BindingSource (header lines)
//! - `node`: Node, Loop, SortKey (body tree)
//!
//! `Document` implements `Display` as the canonical printer; printing and
//! re-parsing yields an equal document.

mod binding;
mod node;

use std::fmt;

pub use binding::{Binding, BindingSource};
pub use node::{Loop, Node, SortKey, INDENT};

/// A parsed source document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub bindings: Vec<Binding>,
    pub nodes: Vec<Node>,
}

impl Document {
    /// Look up a binding by name
    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.name == name)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for binding in &self.bindings {
            writeln!(f, "{binding}")?;
        }
        if !self.bindings.is_empty() && !self.nodes.is_empty() {
            writeln!(f)?;
        }
        for node in &self.nodes {
            node.write_indented(f, 0)?;
        }
        Ok(())
    }
}
