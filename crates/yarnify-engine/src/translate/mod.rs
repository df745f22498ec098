//! npm install to yarn translation.
//!
//! [`translate`] repeatedly locates the first `npm i` / `npm install`
//! invocation remaining in the text, classifies its parameters and splices
//! the equivalent yarn command in its place.
//!
//! Invocations that only carry flags (`npm install --save-dev`) have no
//! package to hand to `yarn add`, so they are left as written. The scan
//! cursor moves past them, which keeps them excluded from every later scan
//! without touching the text.

pub mod parse;
pub mod scan;

pub use parse::{Parameter, ParsedInvocation, YarnCommand, package_name_part};
pub use scan::{InvocationMatch, find_invocation};

/// Rewrite every npm install invocation in `text` into its yarn equivalent.
pub fn translate(text: &str) -> String {
    let mut output = text.to_string();
    let mut cursor = 0;

    loop {
        let (span, replacement) = {
            let Some(invocation) = find_invocation(&output, cursor) else {
                break;
            };
            let parsed = ParsedInvocation::parse(&invocation);
            let replacement = parsed.yarn_command().map(|command| command.to_string());
            (invocation.span, replacement)
        };

        match replacement {
            Some(replacement) => {
                log::trace!("replacing `{}` with `{replacement}`", &output[span.clone()]);
                output.replace_range(span.clone(), &replacement);
                // Copied package tokens may hold another invocation, so the
                // next scan starts at the replacement itself.
                cursor = span.start;
            }
            None => {
                log::debug!(
                    "leaving flag-only invocation untouched: `{}`",
                    &output[span.clone()]
                );
                cursor = span.start + 1;
            }
        }
    }

    output
}
