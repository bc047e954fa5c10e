//! Body grammar: sections, fields and nested loops
//!
//! Indentation is significant with a two-space unit. A block ends at the
//! first line indented less than its level; a line indented more than its
//! level that no loop header opened is rejected.

use crate::ast::{Loop, Node, INDENT};
use crate::error::{Result, SiteError};

use super::sort_spec::parse_sort;
use super::Line;

pub(crate) fn parse_body(lines: &[Line<'_>]) -> Result<Vec<Node>> {
    let mut parser = BodyParser { lines, pos: 0 };
    let nodes = parser.parse_block(0)?;

    // parse_block(0) only stops early on a dedent below zero, which cannot happen
    debug_assert_eq!(parser.pos, lines.len());
    Ok(nodes)
}

struct BodyParser<'l, 'a> {
    lines: &'l [Line<'a>],
    pos: usize,
}

impl<'l, 'a> BodyParser<'l, 'a> {
    fn parse_block(&mut self, indent: usize) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();

        while let Some(line) = self.lines.get(self.pos).copied() {
            let trimmed = line.text.trim();
            if trimmed.is_empty() {
                self.pos += 1;
                continue;
            }

            let current = count_indent(line.text);
            if current < indent {
                break;
            }
            if current > indent {
                return Err(SiteError::syntax(
                    line.no,
                    line.text,
                    format!("unexpected indent: expected {indent} spaces, found {current}"),
                ));
            }

            self.pos += 1;
            if trimmed.starts_with('{') && trimmed.ends_with('}') {
                nodes.push(parse_section(line, trimmed)?);
            } else if trimmed.starts_with("[for ") {
                let mut l = parse_loop_header(line, trimmed)?;
                l.body = self.parse_block(indent + INDENT)?;
                nodes.push(Node::Loop(l));
            } else {
                nodes.push(Node::Field {
                    path: trimmed.to_string(),
                });
            }
        }

        Ok(nodes)
    }
}

fn parse_section(line: Line<'_>, trimmed: &str) -> Result<Node> {
    let inner = &trimmed[1..trimmed.len() - 1];
    let (id, text) = inner
        .split_once(':')
        .ok_or_else(|| SiteError::syntax(line.no, line.text, "invalid section: expected {id: text}"))?;

    Ok(Node::Section {
        id: id.trim().to_string(),
        text: text.trim().to_string(),
    })
}

/// `[for v1[, v2] in source[: sort]]`; the body is filled in by the caller
fn parse_loop_header(line: Line<'_>, trimmed: &str) -> Result<Loop> {
    let end = trimmed
        .find(']')
        .ok_or_else(|| SiteError::syntax(line.no, line.text, "missing ] in loop header"))?;

    let inner = trimmed[1..end].trim();
    let clause = inner
        .strip_prefix("for ")
        .ok_or_else(|| SiteError::syntax(line.no, line.text, "invalid loop header"))?;

    let (left, sort_spec) = match clause.split_once(':') {
        Some((left, spec)) => (left, spec),
        None => (clause, ""),
    };

    let parts: Vec<&str> = left.split(" in ").collect();
    let [vars, source] = parts.as_slice() else {
        return Err(SiteError::syntax(
            line.no,
            line.text,
            "invalid loop header: expected exactly one ` in `",
        ));
    };

    let vars: Vec<String> = vars.split(',').map(|v| v.trim().to_string()).collect();
    if vars.len() > 2 {
        return Err(SiteError::syntax(
            line.no,
            line.text,
            "invalid loop header: at most two loop variables",
        ));
    }
    if vars.iter().any(String::is_empty) {
        return Err(SiteError::syntax(
            line.no,
            line.text,
            "invalid loop header: empty loop variable",
        ));
    }

    let source = source.trim();
    if source.is_empty() {
        return Err(SiteError::syntax(
            line.no,
            line.text,
            "invalid loop header: missing source path",
        ));
    }

    Ok(Loop {
        vars,
        source: source.to_string(),
        sort: parse_sort(sort_spec),
        body: Vec::new(),
    })
}

fn count_indent(text: &str) -> usize {
    text.chars().take_while(|c| *c == ' ').count()
}

#[cfg(test)]
mod tests {
    use crate::ast::{Node, SortKey};
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn body(src: &str) -> Vec<Node> {
        parse(src).unwrap().nodes
    }

    fn loop_at(nodes: &[Node], idx: usize) -> &crate::ast::Loop {
        match &nodes[idx] {
            Node::Loop(l) => l,
            other => panic!("expected loop, got {other:?}"),
        }
    }

    #[test]
    fn nested_loops() {
        let nodes = body(
            "[for repo in repos]\n  repo.name\n  [for k, v in repo.languages: value]\n    k\n    v\n  repo.url\ntrailer\n",
        );
        assert_eq!(nodes.len(), 2);
        let outer = loop_at(&nodes, 0);
        assert_eq!(outer.body.len(), 3);
        let inner = loop_at(&outer.body, 1);
        assert_eq!(inner.vars, vec!["k", "v"]);
        assert_eq!(inner.source, "repo.languages");
        assert_eq!(inner.sort, vec![SortKey::desc("value")]);
        assert_eq!(inner.body.len(), 2);
        assert_eq!(outer.body[2], Node::Field { path: "repo.url".into() });
        assert_eq!(nodes[1], Node::Field { path: "trailer".into() });
    }

    #[test]
    fn blank_lines_inside_loop_body_are_separators() {
        let nodes = body("[for x in xs]\n  x.a\n\n  x.b\n");
        assert_eq!(loop_at(&nodes, 0).body.len(), 2);
    }

    #[test]
    fn empty_sort_spec_means_source_order() {
        let nodes = body("[for x in xs: ]\n  x\n");
        assert!(loop_at(&nodes, 0).sort.is_empty());
    }

    #[test]
    fn loop_without_body() {
        let nodes = body("[for x in xs]\nafter\n");
        assert!(loop_at(&nodes, 0).body.is_empty());
        assert_eq!(nodes[1], Node::Field { path: "after".into() });
    }

    #[test]
    fn missing_bracket_is_fatal() {
        let err = parse("intro\n[for x in xs\n  x\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("missing ]"));
    }

    #[test]
    fn for_clause_needs_exactly_one_in() {
        assert!(parse("[for x xs]\n").is_err());
        let err = parse("[for x in xs in ys]\n").unwrap_err();
        assert!(err.to_string().contains("exactly one ` in `"));
    }

    #[test]
    fn too_many_loop_variables() {
        assert!(parse("[for a, b, c in xs]\n").is_err());
        assert!(parse("[for a, in xs]\n").is_err());
    }

    #[test]
    fn deeper_indent_without_loop_is_fatal() {
        let err = parse("title\n  orphan.field\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("unexpected indent"));
    }

    #[test]
    fn over_indented_loop_body_is_fatal() {
        let err = parse("[for x in xs]\n  x.a\n    x.b\n").unwrap_err();
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn odd_dedent_is_fatal() {
        // one space ends the loop body, then is too deep for the top level
        let err = parse("[for x in xs]\n  x.a\n x.b\n").unwrap_err();
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn section_without_colon_is_fatal() {
        let err = parse("{hero}\n").unwrap_err();
        assert!(err.to_string().contains("invalid section"));
    }
}
