//! Article models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The outlet an article came from.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArticleSource {
    /// Display name of the outlet
    pub name: String,
}

/// A news article handed to the pipeline.
///
/// Field names follow the upstream news feed JSON (`urlToImage`,
/// `publishedAt`). The article is immutable for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Article title
    pub title: String,

    /// Author or authors, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Source outlet
    pub source: ArticleSource,

    /// Short description or lede
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Full body text
    pub content: String,

    /// Lead image URL, if the feed provided one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_to_image: Option<String>,

    /// Publication timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Filesystem-safe slug derived from the title, used as the project
    /// directory name. Whitespace runs become `_`; characters that are
    /// hostile in paths are dropped.
    pub fn slug(&self) -> String {
        sanitize_title(&self.title)
    }

    /// Short topic summary used as the image search query: the
    /// description when present, otherwise the title.
    pub fn topic_summary(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.title)
    }
}

/// Sanitize an article title into a directory name.
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_was_sep = true;
    for c in title.chars() {
        if c.is_whitespace() {
            if !last_was_sep {
                out.push('_');
                last_was_sep = true;
            }
        } else if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
            out.push(c);
            last_was_sep = false;
        }
        // everything else (slashes, quotes, control chars) is dropped
    }
    while out.ends_with('_') || out.ends_with('.') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("untitled");
    }
    out
}
