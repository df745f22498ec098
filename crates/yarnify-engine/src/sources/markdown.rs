//! Markdown leaves, located through pulldown-cmark source offsets.
//!
//! Leaves are rewritten as raw source slices, so everything between them
//! (markup, fences, front matter) is copied through byte for byte. Raw HTML
//! is handed to the HTML visitor, which finds the text nodes inside it.

use super::html::{self, HtmlOptions};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Paragraphs, headings, list items and other running text
    pub prose: bool,
    /// Contents of `` `inline code` `` spans
    pub inline_code: bool,
    /// Contents of fenced and indented code blocks
    pub code_blocks: bool,
    /// Text nodes and read-only inputs inside raw HTML
    pub html: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            prose: true,
            inline_code: true,
            code_blocks: true,
            html: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafKind {
    Prose,
    InlineCode,
    CodeBlock,
    Html,
}

#[derive(Debug)]
struct Leaf {
    kind: LeafKind,
    range: Range<usize>,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// Collect leaf ranges in source order. Adjacent text events of the same
/// kind are merged, since pulldown-cmark splits text around characters that
/// might have started markup.
fn collect_leaves(text: &str) -> Vec<Leaf> {
    let mut leaves: Vec<Leaf> = Vec::new();
    let mut in_code_block = false;
    let mut in_metadata = false;

    for (event, range) in Parser::new_ext(text, parser_options()).into_offset_iter() {
        let leaf = match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                continue;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                continue;
            }
            Event::Start(Tag::MetadataBlock(_)) => {
                in_metadata = true;
                continue;
            }
            Event::End(TagEnd::MetadataBlock(_)) => {
                in_metadata = false;
                continue;
            }
            Event::Text(_) if in_metadata => continue,
            Event::Text(_) if in_code_block => Leaf {
                kind: LeafKind::CodeBlock,
                range,
            },
            Event::Text(_) => Leaf {
                kind: LeafKind::Prose,
                range,
            },
            Event::Code(_) => Leaf {
                kind: LeafKind::InlineCode,
                range: code_span_contents(text, range),
            },
            Event::Html(_) | Event::InlineHtml(_) => Leaf {
                kind: LeafKind::Html,
                range,
            },
            _ => continue,
        };

        match leaves.last_mut() {
            Some(last)
                if last.kind == leaf.kind
                    && leaf.kind != LeafKind::InlineCode
                    && last.range.end == leaf.range.start =>
            {
                last.range.end = leaf.range.end;
            }
            _ => leaves.push(leaf),
        }
    }

    leaves
}

/// Strip the backtick fences from a code span's source range.
fn code_span_contents(text: &str, range: Range<usize>) -> Range<usize> {
    let raw = &text[range.clone()];
    let opening = raw.len() - raw.trim_start_matches('`').len();
    let closing = raw.len() - raw.trim_end_matches('`').len();

    if opening + closing >= raw.len() {
        return range.start..range.start;
    }
    range.start + opening..range.end - closing
}

impl MarkdownOptions {
    fn accepts(&self, kind: LeafKind) -> bool {
        match kind {
            LeafKind::Prose => self.prose,
            LeafKind::InlineCode => self.inline_code,
            LeafKind::CodeBlock => self.code_blocks,
            LeafKind::Html => self.html,
        }
    }
}

/// Run `f` over every enabled leaf of a Markdown document.
///
/// Raw HTML leaves go through [`html::rewrite`] with `html_options`, so `f`
/// sees their text nodes rather than the markup.
pub fn rewrite<F>(
    text: &str,
    options: &MarkdownOptions,
    html_options: &HtmlOptions,
    mut f: F,
) -> String
where
    F: FnMut(&str) -> String,
{
    let mut output = String::with_capacity(text.len());
    let mut copied_up_to = 0;

    for leaf in collect_leaves(text) {
        if !options.accepts(leaf.kind) || leaf.range.start < copied_up_to {
            continue;
        }
        output.push_str(&text[copied_up_to..leaf.range.start]);
        let source = &text[leaf.range.clone()];
        let rewritten = match leaf.kind {
            LeafKind::Html => html::rewrite(source, html_options, &mut f),
            _ => f(source),
        };
        output.push_str(&rewritten);
        copied_up_to = leaf.range.end;
    }

    output.push_str(&text[copied_up_to..]);
    output
}
