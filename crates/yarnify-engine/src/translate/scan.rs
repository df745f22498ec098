use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// One `npm i` / `npm install` occurrence located in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationMatch<'a> {
    /// Byte range of `full_match_text` within the scanned text
    pub span: Range<usize>,
    /// The command token and its whole parameter tail
    pub full_match_text: &'a str,
    /// Either `npm i` or `npm install`
    pub command_token: &'a str,
    /// Whitespace-delimited tokens following the command, in order
    pub parameter_tokens: Vec<&'a str>,
}

fn invocation_regex() -> &'static Regex {
    static INVOCATION_REGEX: OnceLock<Regex> = OnceLock::new();
    // Parameters are separated by any whitespace except line breaks, so an
    // invocation never runs onto the next line.
    INVOCATION_REGEX.get_or_init(|| {
        Regex::new(r"\b(npm i(?:nstall)?)((?:[^\S\r\n]+\S+)*)")
            .expect("Invalid invocation regex")
    })
}

/// Find the first invocation that starts at or after byte offset `from`.
///
/// A candidate only counts when its command token is followed by whitespace
/// or the end of the text, so `npm init` and `npm installer` are ignored.
pub fn find_invocation(text: &str, from: usize) -> Option<InvocationMatch<'_>> {
    let regex = invocation_regex();
    let mut at = from;

    while at <= text.len() {
        let captures = regex.captures_at(text, at)?;
        let whole = captures.get(0)?;
        let command = captures.get(1)?;

        let terminated = text[command.end()..]
            .chars()
            .next()
            .is_none_or(char::is_whitespace);

        if terminated {
            let tail = captures.get(2).map_or("", |m| m.as_str());
            return Some(InvocationMatch {
                span: whole.range(),
                full_match_text: whole.as_str(),
                command_token: command.as_str(),
                parameter_tokens: tail.split_whitespace().collect(),
            });
        }

        // Every match starts with the ASCII `n`, so +1 stays on a char boundary.
        at = whole.start() + 1;
    }

    None
}
