pub mod io;
pub mod package_name;
pub mod sources;
pub mod translate;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use io::{FileOutcome, IoError};
pub use package_name::{PackageNameValidity, is_valid_legacy_name};
pub use sources::{
    HtmlOptions, MarkdownOptions, RewriteOptions, SourceFormat, UnknownFormat, translate_source,
};
pub use translate::{InvocationMatch, ParsedInvocation, YarnCommand, translate};
