//! Leaf-text visitors for the document formats yarnify understands.
//!
//! A visitor walks a document, hands every piece of leaf content to a
//! callback and splices the callback's result back into an otherwise
//! untouched copy of the source. Visitors know nothing about npm or yarn;
//! [`translate_source`] wires them to the translator.

pub mod html;
pub mod markdown;
pub mod plain;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub use html::HtmlOptions;
pub use markdown::MarkdownOptions;

use crate::translate::translate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Text,
    Markdown,
    Html,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown source format: {0} (expected text, markdown or html)")]
pub struct UnknownFormat(pub String);

impl SourceFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Run `f` over every leaf of `text` interpreted as this format.
    pub fn rewrite<F>(self, text: &str, options: &RewriteOptions, f: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        match self {
            Self::Text => plain::rewrite(text, f),
            Self::Markdown => markdown::rewrite(text, &options.markdown, &options.html, f),
            Self::Html => html::rewrite(text, &options.html, f),
        }
    }
}

impl FromStr for SourceFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" | "plain" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "html" | "htm" => Ok(Self::Html),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Per-format switches for which leaves are offered to the callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteOptions {
    pub markdown: MarkdownOptions,
    pub html: HtmlOptions,
}

/// Translate every npm install invocation found in the leaves of `text`.
pub fn translate_source(text: &str, format: SourceFormat, options: &RewriteOptions) -> String {
    format.rewrite(text, options, translate)
}
