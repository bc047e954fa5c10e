use std::fmt;

/// Indentation unit for nested bodies
pub const INDENT: usize = 2;

/// A path plus direction used to order loop items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub path: String,
    pub ascending: bool,
}

impl SortKey {
    pub fn asc(path: impl Into<String>) -> Self {
        Self { path: path.into(), ascending: true }
    }

    pub fn desc(path: impl Into<String>) -> Self {
        Self { path: path.into(), ascending: false }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ascending {
            write!(f, "{}^", self.path)
        } else {
            f.write_str(&self.path)
        }
    }
}

/// `[for v1[, v2] in source[: sort]]` with its indented body
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub vars: Vec<String>,
    pub source: String,
    pub sort: Vec<SortKey>,
    pub body: Vec<Node>,
}

/// A parsed body construct
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `{id: markdown text}`
    Section { id: String, text: String },
    /// Bare dotted path
    Field { path: String },
    Loop(Loop),
}

impl Node {
    pub(crate) fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = " ".repeat(depth * INDENT);
        match self {
            Node::Section { id, text } => writeln!(f, "{pad}{{{id}: {text}}}"),
            Node::Field { path } => writeln!(f, "{pad}{path}"),
            Node::Loop(l) => {
                write!(f, "{pad}[for {} in {}", l.vars.join(", "), l.source)?;
                if !l.sort.is_empty() {
                    let keys: Vec<String> = l.sort.iter().map(ToString::to_string).collect();
                    write!(f, ": {}", keys.join(", "))?;
                }
                writeln!(f, "]")?;
                for child in &l.body {
                    child.write_indented(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}
