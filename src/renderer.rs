//! Row rendering
//!
//! Formats one classified post as a numbered listing row. Row numbers are
//! 1-based. The link comes from the raw text, since normalization strips URLs.

use serde::{Deserialize, Serialize};

use crate::normalizer::first_url;
use crate::types::ClassifiedPost;

/// Output format for rendered rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowFormat {
    #[default]
    Markdown,
    Html,
}

/// Renderer for listing rows
pub struct RowRenderer;

impl RowRenderer {
    /// Render a record at a 0-based position as a Markdown row
    pub fn render_row(record: &ClassifiedPost, row_index: usize) -> String {
        Self::render_row_as(record, row_index, RowFormat::Markdown)
    }

    /// Render a record at a 0-based position in the given format
    pub fn render_row_as(record: &ClassifiedPost, row_index: usize, format: RowFormat) -> String {
        let row_number = row_index + 1;
        let snippet = record.snippet();
        let url = first_url(&record.text);

        match format {
            RowFormat::Markdown => match url {
                Some(url) => format!("{row_number}. {snippet} [link]({url})"),
                None => format!("{row_number}. {snippet}"),
            },
            RowFormat::Html => {
                let snippet = escape_html(snippet);
                match url {
                    Some(url) => format!(
                        "<li value=\"{row_number}\">{snippet} <a href=\"{}\">link</a></li>",
                        escape_html(url)
                    ),
                    None => format!("<li value=\"{row_number}\">{snippet}</li>"),
                }
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
