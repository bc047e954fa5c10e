//! Posts source - dated Markdown files as a list binding
//!
//! Files are named `YYYY-MM-DD<anything>.md`. Each becomes:
//!
//! ```json
//! {"title": "...", "preview": "...", "date": "2024-03-05", "url": "/posts/2024-03-05/"}
//! ```

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Result, SiteError};
use crate::markdown::strip_markdown;

/// Preview length limit in bytes, before the ellipsis
pub const PREVIEW_LIMIT: usize = 240;

const DATE_LEN: usize = "YYYY-MM-DD".len();

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub title: String,
    pub preview: String,
    pub date: String,
    pub url: String,
}

impl Post {
    /// Build a post from its file name and Markdown content
    ///
    /// `None` when the file name does not start with a `YYYY-MM-DD` date.
    pub fn from_markdown(file_name: &str, content: &str) -> Option<Self> {
        let date = file_name.get(..DATE_LEN)?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        let date = date.to_string();

        let mut title = None;
        let mut preview = None;
        for line in content.lines() {
            if title.is_none() {
                if let Some(heading) = line.strip_prefix("# ") {
                    title = Some(heading.trim().to_string());
                    continue;
                }
            }
            let text = line.trim();
            if preview.is_none() && !text.is_empty() && !text.starts_with('#') {
                preview = Some(strip_markdown(text));
            }
            if title.is_some() && preview.is_some() {
                break;
            }
        }

        let title = title.unwrap_or_else(|| {
            Path::new(file_name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file_name.to_string())
        });

        Some(Self {
            title,
            preview: truncate(preview.unwrap_or_default(), PREVIEW_LIMIT),
            url: format!("/posts/{date}/"),
            date,
        })
    }
}

fn truncate(mut text: String, limit: usize) -> String {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
    text.push('…');
    text
}

/// Load every `.md` file matching `pattern`, in path order
pub fn load_posts(pattern: &str) -> Result<Vec<Post>> {
    let entries = glob::glob(pattern).map_err(|e| SiteError::Posts {
        pattern: pattern.to_string(),
        details: e.to_string(),
    })?;

    let mut posts = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SiteError::Posts {
            pattern: pattern.to_string(),
            details: e.to_string(),
        })?;
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let content = std::fs::read_to_string(&path)?;
        match Post::from_markdown(file_name, &content) {
            Some(post) => posts.push(post),
            None => warn!(path = %path.display(), "post file name has no YYYY-MM-DD prefix, skipping"),
        }
    }

    debug!(pattern, count = posts.len(), "posts loaded");
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn title_and_preview_from_content() {
        let post = Post::from_markdown(
            "2024-03-05-hello.md",
            "# Hello world\n\n## Sub\n\nFirst *real* line.\nSecond line.\n",
        )
        .unwrap();
        assert_eq!(
            post,
            Post {
                title: "Hello world".into(),
                preview: "First real line.".into(),
                date: "2024-03-05".into(),
                url: "/posts/2024-03-05/".into(),
            }
        );
    }

    #[test]
    fn title_falls_back_to_file_stem() {
        let post = Post::from_markdown("2024-01-01-notes.md", "just text\n").unwrap();
        assert_eq!(post.title, "2024-01-01-notes");
        assert_eq!(post.preview, "just text");
    }

    #[test]
    fn file_names_without_a_date_are_rejected() {
        assert!(Post::from_markdown("x.md", "# t").is_none());
        assert!(Post::from_markdown("notes-file.md", "# t").is_none());
        assert!(Post::from_markdown("2024-13-01-bad-month.md", "# t").is_none());
        assert!(Post::from_markdown("2024-02-29-leap.md", "# t").is_some());
    }

    #[test]
    fn long_previews_are_cut_on_char_boundary() {
        let long = "é".repeat(200);
        let post = Post::from_markdown("2024-01-01.md", &long).unwrap();
        assert!(post.preview.ends_with('…'));
        assert_eq!(post.preview.len(), PREVIEW_LIMIT + '…'.len_utf8());
    }

    #[test]
    fn loads_markdown_files_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("2024-02-01-b.md"), "# B\nbee\n").unwrap();
        fs::write(dir.path().join("2024-01-01-a.md"), "# A\nay\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("a.md"), "# short name").unwrap();
        fs::write(dir.path().join("notes-file.md"), "# undated").unwrap();

        let pattern = format!("{}/*", dir.path().display());
        let posts = load_posts(&pattern).unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn invalid_pattern_is_a_posts_error() {
        let err = load_posts("posts/[").unwrap_err();
        assert!(matches!(err, SiteError::Posts { .. }));
    }
}
