//! Text-transform capability: Markdown to HTML
//!
//! Sections hand their text to a [`TextTransform`] once each. The production
//! transform is CommonMark via `pulldown-cmark`; closures work too.

use pulldown_cmark::{html, Event, Options, Parser};

/// Markdown text → HTML fragment
pub trait TextTransform {
    fn transform(&self, markdown: &str) -> String;
}

impl<F> TextTransform for F
where
    F: Fn(&str) -> String,
{
    fn transform(&self, markdown: &str) -> String {
        self(markdown)
    }
}

/// CommonMark renderer with tables and strikethrough
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownTransform;

impl MarkdownTransform {
    fn options() -> Options {
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
    }
}

impl TextTransform for MarkdownTransform {
    fn transform(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Self::options());
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

/// Plain text of a Markdown fragment (formatting dropped, text kept)
pub fn strip_markdown(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            _ => {}
        }
    }
    out.trim().to_string()
}
