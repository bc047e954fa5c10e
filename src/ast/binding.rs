use std::fmt;

/// Where a binding's data comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingSource {
    /// `name = target`: loaded from the cache store, never fetched
    Manual,
    /// `name = target << url`: fetched once before evaluation
    Eager { url: String },
    /// `!name = target << template`: fetched per resolved key, memoized
    Lazy { url_template: String },
}

/// A named data source declared in the document header
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    /// Cache store key for fetched or loaded content
    pub target: String,
    pub source: BindingSource,
    /// 1-based source line (not part of equality)
    pub line: usize,
}

impl Binding {
    pub fn url(&self) -> Option<&str> {
        match &self.source {
            BindingSource::Manual => None,
            BindingSource::Eager { url } => Some(url),
            BindingSource::Lazy { url_template } => Some(url_template),
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.source, BindingSource::Lazy { .. })
    }

    pub fn is_manual(&self) -> bool {
        matches!(self.source, BindingSource::Manual)
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.target == other.target && self.source == other.source
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            BindingSource::Manual => write!(f, "{} = {}", self.name, self.target),
            BindingSource::Eager { url } => write!(f, "{} = {} << {}", self.name, self.target, url),
            BindingSource::Lazy { url_template } => {
                write!(f, "!{} = {} << {}", self.name, self.target, url_template)
            }
        }
    }
}
