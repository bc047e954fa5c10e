//! HTML rendering of evaluated blocks and layout filling

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::error::{Result, SiteError};
use crate::jsonpath;
use crate::runtime::Block;

/// Layout marker replaced by the rendered body
pub const CONTENT_MARKER: &str = "<!--CONTENT-->";

/// Layout marker replaced by the render date
pub const LAST_UPDATED_MARKER: &str = "<!--LAST_UPDATED-->";

/// Render blocks into a body fragment
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::with_capacity(blocks.len() * 64);
    write_blocks(blocks, &mut out);
    out
}

fn write_blocks(blocks: &[Block], out: &mut String) {
    for block in blocks {
        match block {
            Block::Section { id, html } => {
                let _ = write!(
                    out,
                    "<section class=\"section\" id=\"{}\">\n  <div class=\"container\">\n    <h2 class=\"subtitle has-text-weight-semibold\">{}</h2>\n  </div>\n</section>",
                    escape(id),
                    unwrap_paragraph(html)
                );
            }
            Block::Field { value, .. } => {
                let text = value.as_ref().map(jsonpath::stringify).unwrap_or_default();
                let _ = write!(out, "<p>{}</p>", escape(&text));
            }
            Block::Loop { iterations, .. } => {
                out.push_str("<section class=\"section\">");
                for body in iterations {
                    out.push_str("<div class=\"box\">");
                    write_blocks(body, out);
                    out.push_str("</div>");
                }
                out.push_str("</section>");
            }
        }
    }
}

/// Drop the single `<p>…</p>` wrapper a one-line Markdown section produces
fn unwrap_paragraph(html: &str) -> &str {
    let html = html.strip_suffix("</p>\n").unwrap_or(html);
    html.strip_prefix("<p>").unwrap_or(html)
}

/// Escape text for HTML element and attribute content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Fill `layout` with `body` and the formatted `date`
///
/// `path` only names the layout in the error.
pub fn apply_layout(layout: &str, body: &str, date: NaiveDate, path: &str) -> Result<String> {
    if !layout.contains(CONTENT_MARKER) {
        return Err(SiteError::LayoutMarker { path: path.to_string() });
    }
    let page = layout.replacen(CONTENT_MARKER, body, 1);
    Ok(page.replacen(LAST_UPDATED_MARKER, &format_date(date), 1))
}

/// "January 2, 2006"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fields_are_escaped_paragraphs() {
        let blocks = vec![
            Block::Field { path: "a".into(), value: Some(json!("<b> & \"q\"")) },
            Block::Field { path: "b".into(), value: None },
            Block::Field { path: "c".into(), value: Some(json!(3)) },
        ];
        assert_eq!(
            render_blocks(&blocks),
            "<p>&lt;b&gt; &amp; &quot;q&quot;</p><p></p><p>3</p>"
        );
    }

    #[test]
    fn section_strips_single_paragraph() {
        let blocks = vec![Block::Section { id: "about".into(), html: "<p>Hi <em>there</em></p>\n".into() }];
        let html = render_blocks(&blocks);
        assert!(html.starts_with("<section class=\"section\" id=\"about\">"));
        assert!(html.contains("<h2 class=\"subtitle has-text-weight-semibold\">Hi <em>there</em></h2>"));
    }

    #[test]
    fn loops_render_one_box_per_iteration() {
        let blocks = vec![Block::Loop {
            source: "xs".into(),
            iterations: vec![
                vec![Block::Field { path: "x".into(), value: Some(json!("a")) }],
                vec![Block::Field { path: "x".into(), value: Some(json!("b")) }],
            ],
        }];
        assert_eq!(
            render_blocks(&blocks),
            "<section class=\"section\"><div class=\"box\"><p>a</p></div><div class=\"box\"><p>b</p></div></section>"
        );
    }

    #[test]
    fn layout_fills_content_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let page = apply_layout(
            "<main><!--CONTENT--></main><footer><!--LAST_UPDATED--></footer>",
            "<p>x</p>",
            date,
            "layout.html",
        )
        .unwrap();
        assert_eq!(page, "<main><p>x</p></main><footer>March 5, 2024</footer>");
    }

    #[test]
    fn layout_without_content_marker_fails() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = apply_layout("<html></html>", "", date, "t/layout.html").unwrap_err();
        assert!(matches!(err, SiteError::LayoutMarker { ref path } if path == "t/layout.html"));
    }
}
