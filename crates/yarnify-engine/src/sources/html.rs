//! HTML leaves: text nodes and the values of read-only text inputs.
//!
//! This is a tokenizer, not a DOM. It only distinguishes tags, comments and
//! text runs, which is all that is needed to find the strings a browser would
//! render as the text of a page. Text inside `<textarea>`, `<script>` and
//! `<style>` is never offered to the callback.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlOptions {
    /// Rewrite the `value` of `<input type="text" readonly>` elements
    pub inputs: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self { inputs: true }
    }
}

const RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "script", "style"];

/// Length of the tag starting at the beginning of `s`, including `>`.
fn tag_length(s: &str) -> Option<usize> {
    let mut chars = s.char_indices();
    if chars.next()?.1 != '<' {
        return None;
    }
    let (_, first) = chars.next()?;
    if !(first.is_ascii_alphabetic() || matches!(first, '/' | '!' | '?')) {
        return None;
    }

    let mut quote = None;
    for (index, c) in chars {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(index + 1),
            None => {}
        }
    }
    None
}

/// Byte offset where the next comment or tag starts at or after `from`.
fn next_markup(text: &str, from: usize) -> usize {
    let mut search = from;
    while let Some(offset) = text[search..].find('<') {
        let at = search + offset;
        let rest = &text[at..];
        if rest.starts_with("<!--") || tag_length(rest).is_some() {
            return at;
        }
        search = at + 1;
    }
    text.len()
}

/// Tag name (lowercase) and whether it is a closing tag.
fn tag_name(tag: &str) -> (String, bool) {
    let inner = &tag[1..];
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let name: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    (name.to_ascii_lowercase(), closing)
}

#[derive(Debug)]
struct Attribute<'a> {
    name: String,
    /// Raw value and the range of the whole value token, quotes included
    value: Option<(&'a str, Range<usize>)>,
}

fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE_REGEX: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE_REGEX.get_or_init(|| {
        Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .expect("Invalid attribute regex")
    })
}

/// Attributes of `tag`, with ranges relative to `tag`.
fn attributes(tag: &str, name_len: usize) -> Vec<Attribute<'_>> {
    let body_start = 1 + name_len;
    attribute_regex()
        .captures_iter(&tag[body_start..])
        .filter_map(|captures| {
            let name = captures.get(1)?.as_str().to_ascii_lowercase();
            let value = if let Some(m) = captures.get(2).or_else(|| captures.get(3)) {
                let start = body_start + m.start();
                Some((m.as_str(), start - 1..body_start + m.end() + 1))
            } else {
                captures.get(4).map(|m| {
                    (
                        m.as_str(),
                        body_start + m.start()..body_start + m.end(),
                    )
                })
            };
            Some(Attribute { name, value })
        })
        .collect()
}

fn find_attribute<'t, 'a>(attrs: &'t [Attribute<'a>], name: &str) -> Option<&'t Attribute<'a>> {
    attrs.iter().find(|attr| attr.name == name)
}

/// Rewrite the value of a read-only text input, or `None` to keep the tag.
fn rewrite_input<F>(tag: &str, name_len: usize, f: &mut F) -> Option<String>
where
    F: FnMut(&str) -> String,
{
    let attrs = attributes(tag, name_len);
    let find = |name: &str| find_attribute(&attrs, name);

    let is_text = find("type").is_none_or(|attr| {
        attr.value
            .as_ref()
            .is_none_or(|(value, _)| value.eq_ignore_ascii_case("text"))
    });
    if !is_text || find("readonly").is_none() {
        return None;
    }

    let (raw, token) = find("value")?.value.clone()?;
    let decoded = html_escape::decode_html_entities(raw);
    let rewritten = f(decoded.as_ref());
    if rewritten == decoded {
        return None;
    }

    Some(format!(
        "{}\"{}\"{}",
        &tag[..token.start],
        html_escape::encode_double_quoted_attribute(&rewritten),
        &tag[token.end..]
    ))
}

/// Run `f` over every text node (entity-decoded) and eligible input value.
pub fn rewrite<F>(text: &str, options: &HtmlOptions, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut output = String::with_capacity(text.len());
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];

        if rest.starts_with("<!--") {
            let end = rest.find("-->").map_or(text.len(), |index| pos + index + 3);
            output.push_str(&text[pos..end]);
            pos = end;
            continue;
        }

        if let Some(len) = tag_length(rest) {
            let tag = &rest[..len];
            let (name, closing) = tag_name(tag);
            let name_len = name.len() + usize::from(closing);
            let mut end = pos + len;

            let replaced = if options.inputs && !closing && name == "input" {
                rewrite_input(tag, name_len, &mut f)
            } else {
                None
            };
            output.push_str(replaced.as_deref().unwrap_or(tag));

            if !closing && !tag.ends_with("/>") && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                // ASCII lowercasing keeps byte offsets intact
                let lowered = text[end..].to_ascii_lowercase();
                let raw_end = lowered
                    .find(&format!("</{name}"))
                    .map_or(text.len(), |index| end + index);
                output.push_str(&text[end..raw_end]);
                end = raw_end;
            }

            pos = end;
            continue;
        }

        let end = next_markup(text, pos);
        let run = &text[pos..end];
        let decoded = html_escape::decode_html_entities(run);
        let rewritten = f(decoded.as_ref());
        if rewritten == decoded {
            output.push_str(run);
        } else {
            output.push_str(&html_escape::encode_text(&rewritten));
        }
        pos = end;
    }

    output
}
