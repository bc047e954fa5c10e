use serde_json::Value;

/// Loop-variable frame
///
/// Frames are immutable and chained to their parent; entering a loop body
/// creates a child frame, leaving the parent untouched for the next item.
#[derive(Debug, Default)]
pub struct Scope<'p> {
    parent: Option<&'p Scope<'p>>,
    vars: Vec<(String, Value)>,
}

impl Scope<'static> {
    /// Empty top-level scope
    pub fn root() -> Self {
        Self::default()
    }
}

impl<'p> Scope<'p> {
    /// Child frame whose variables shadow this frame's
    pub fn child(&'p self, vars: Vec<(String, Value)>) -> Scope<'p> {
        Scope {
            parent: Some(self),
            vars,
        }
    }

    /// Builder for root or child frames
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.vars.push((name.into(), value));
        self
    }

    /// Innermost binding of `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .or_else(|| self.parent.and_then(|p| p.get(name)))
    }

    pub fn depth(&self) -> usize {
        self.parent.map_or(0, |p| p.depth() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn child_shadows_parent_only_inside() {
        let root = Scope::root().with("repo", json!("outer"));
        {
            let child = root.child(vec![("repo".into(), json!("inner"))]);
            assert_eq!(child.get("repo"), Some(&json!("inner")));
            assert_eq!(child.depth(), 1);
        }
        assert_eq!(root.get("repo"), Some(&json!("outer")));
    }

    #[test]
    fn lookups_fall_through_to_ancestors() {
        let root = Scope::root().with("site", json!({"name": "x"}));
        let a = root.child(vec![("repo".into(), json!(1))]);
        let b = a.child(vec![("lang".into(), json!("rust"))]);
        assert_eq!(b.get("site"), Some(&json!({"name": "x"})));
        assert_eq!(b.get("repo"), Some(&json!(1)));
        assert_eq!(b.get("missing"), None);
    }
}
