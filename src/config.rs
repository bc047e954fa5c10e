//! Render options, loadable from `sitegen.yaml`
//!
//! ```yaml
//! input: index.hi
//! out: public/index.html
//! data_dir: data
//! layout: templates/layout.html
//! posts:
//!   name: posts
//!   pattern: posts/*.md
//! ```
//!
//! Every key is optional. CLI flags override file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// Default config file name
pub const CONFIG_FILE: &str = "sitegen.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// Source `.hi` document
    pub input: PathBuf,
    /// Rendered HTML page
    pub out: PathBuf,
    /// Cache store root (fetched bodies, lazy caches, ETags)
    pub data_dir: PathBuf,
    /// HTML layout with `<!--CONTENT-->`
    pub layout: PathBuf,
    pub posts: Option<PostsConfig>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from("index.hi"),
            out: PathBuf::from("public/index.html"),
            data_dir: PathBuf::from("data"),
            layout: PathBuf::from("templates/layout.html"),
            posts: None,
        }
    }
}

/// Markdown posts exposed as a list binding
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostsConfig {
    #[serde(default = "default_posts_name")]
    pub name: String,
    pub pattern: String,
}

fn default_posts_name() -> String {
    "posts".to_string()
}

impl RenderOptions {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }
}
