//! Output Blocks - the resolved document
//!
//! Evaluation turns the node tree into blocks: every field carries its
//! resolved value, every section its transformed HTML and every loop one
//! block list per iteration, in rendering order.

use serde::Serialize;
use serde_json::Value;

use crate::jsonpath;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section {
        id: String,
        html: String,
    },
    Field {
        path: String,
        /// `None` when the path was absent
        value: Option<Value>,
    },
    Loop {
        source: String,
        iterations: Vec<Vec<Block>>,
    },
}

impl Block {
    /// Display text of a field block (empty when absent)
    pub fn text(&self) -> Option<String> {
        match self {
            Block::Field { value, .. } => Some(value.as_ref().map(jsonpath::stringify).unwrap_or_default()),
            _ => None,
        }
    }

    /// Field texts in document order, descending into loops
    pub fn field_texts(blocks: &[Block]) -> Vec<String> {
        let mut out = Vec::new();
        collect_texts(blocks, &mut out);
        out
    }
}

fn collect_texts(blocks: &[Block], out: &mut Vec<String>) {
    for block in blocks {
        match block {
            Block::Loop { iterations, .. } => {
                for body in iterations {
                    collect_texts(body, out);
                }
            }
            other => out.extend(other.text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_texts_flatten_loops_in_order() {
        let blocks = vec![
            Block::Field { path: "a".into(), value: Some(json!("first")) },
            Block::Loop {
                source: "xs".into(),
                iterations: vec![
                    vec![Block::Field { path: "x".into(), value: Some(json!(1)) }],
                    vec![Block::Field { path: "x".into(), value: None }],
                ],
            },
            Block::Section { id: "s".into(), html: "<p>s</p>".into() },
        ];
        assert_eq!(Block::field_texts(&blocks), vec!["first", "1", ""]);
    }

    #[test]
    fn blocks_serialize_with_type_tag() {
        let block = Block::Field { path: "a.b".into(), value: None };
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"type": "field", "path": "a.b", "value": null})
        );
    }
}
