//! npm package name validation.
//!
//! npm distinguishes between names that are acceptable for packages that
//! already exist in the registry ("old" packages) and names that may still be
//! published today. Problems that make a name unusable everywhere are
//! reported as errors; rules that were introduced later only produce
//! warnings, so a name with warnings is still valid for old packages.
//!
//! The translator only cares about the permissive legacy rules, exposed as
//! [`is_valid_legacy_name`].


/// Names that can never be used, compared case-insensitively.
const BLACKLISTED_NAMES: &[&str] = &["node_modules", "favicon.ico"];

/// Node core module names. Publishing under one of these is no longer allowed.
const CORE_MODULE_NAMES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "worker_threads",
    "zlib",
];

const MAX_NAME_LENGTH: usize = 214;

/// Result of validating a package name against npm's naming rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNameValidity {
    pub valid_for_new_packages: bool,
    pub valid_for_old_packages: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Validate `name` and collect every rule it breaks.
pub fn validate(name: &str) -> PackageNameValidity {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if name.is_empty() {
        errors.push("name length must be greater than zero".to_string());
    }
    if name.starts_with('.') {
        errors.push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        errors.push("name cannot start with an underscore".to_string());
    }
    if name.trim() != name {
        errors.push("name cannot contain leading or trailing spaces".to_string());
    }

    let lowercase = name.to_lowercase();
    for blacklisted in BLACKLISTED_NAMES {
        if lowercase == *blacklisted {
            errors.push(format!("{blacklisted} is a blacklisted name"));
        }
    }

    for core in CORE_MODULE_NAMES {
        if lowercase == *core {
            warnings.push(format!("{core} is a core module name"));
        }
    }
    if name.len() > MAX_NAME_LENGTH {
        warnings.push(format!(
            "name can no longer contain more than {MAX_NAME_LENGTH} characters"
        ));
    }
    if lowercase != name {
        warnings.push("name can no longer contain capital letters".to_string());
    }

    let last_segment = name.rsplit('/').next().unwrap_or(name);
    if last_segment.contains(['~', '\'', '!', '(', ')', '*']) {
        warnings.push(
            "name can no longer contain special characters (\"~'!()*\")".to_string(),
        );
    }

    if !is_url_safe(name) && !is_url_safe_scoped(name) {
        errors.push("name can only contain URL-friendly characters".to_string());
    }

    PackageNameValidity {
        valid_for_new_packages: errors.is_empty() && warnings.is_empty(),
        valid_for_old_packages: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Whether `name` is acceptable under npm's legacy (old package) rules.
pub fn is_valid_legacy_name(name: &str) -> bool {
    validate(name).valid_for_old_packages
}

/// True when URI component encoding would leave `s` unchanged.
fn is_url_safe(s: &str) -> bool {
    s.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
    })
}

/// `@scope/name` where both the scope and the name are URL-safe.
fn is_url_safe_scoped(name: &str) -> bool {
    let Some((scope, package)) = name
        .strip_prefix('@')
        .and_then(|rest| rest.split_once('/'))
    else {
        return false;
    };

    !scope.is_empty()
        && !package.is_empty()
        && !package.contains('/')
        && is_url_safe(scope)
        && is_url_safe(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("lodash")]
    #[case("left-pad")]
    #[case("lodash.merge")]
    #[case("@babel/core")]
    #[case("@types/node")]
    #[case("React")]
    #[case("fs")]
    #[case("--production")]
    fn accepted_by_legacy_rules(#[case] name: &str) {
        assert!(is_valid_legacy_name(name), "{name} should be valid");
    }

    #[rstest]
    #[case("")]
    #[case(".hidden")]
    #[case("_private")]
    #[case(" padded")]
    #[case("node_modules")]
    #[case("FAVICON.ICO")]
    #[case("foo,")]
    #[case("a/b")]
    #[case("@/pkg")]
    #[case("@scope/")]
    #[case("@scope/a/b")]
    #[case("café")]
    #[case("`quoted`")]
    fn rejected_by_legacy_rules(#[case] name: &str) {
        assert!(!is_valid_legacy_name(name), "{name} should be invalid");
    }

    #[test]
    fn warnings_only_affect_new_packages() {
        let result = validate("CoffeeScript");

        assert!(result.valid_for_old_packages);
        assert!(!result.valid_for_new_packages);
        assert!(result.errors.is_empty());
        assert_eq!(
            result.warnings,
            vec!["name can no longer contain capital letters".to_string()]
        );
    }

    #[test]
    fn core_module_name_is_a_warning() {
        let result = validate("http");

        assert!(result.valid_for_old_packages);
        assert_eq!(result.warnings, vec!["http is a core module name".to_string()]);
    }

    #[test]
    fn special_characters_checked_in_last_segment() {
        let result = validate("@scope/what!");

        assert!(result.valid_for_old_packages);
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.contains("special characters"))
        );
    }

    #[test]
    fn long_names_are_a_warning() {
        let name = "a".repeat(MAX_NAME_LENGTH + 1);
        let result = validate(&name);

        assert!(result.valid_for_old_packages);
        assert!(!result.valid_for_new_packages);
    }

    #[test]
    fn multiple_errors_collected() {
        let result = validate("_node modules");

        assert!(!result.valid_for_old_packages);
        assert_eq!(
            result.errors,
            vec![
                "name cannot start with an underscore".to_string(),
                "name can only contain URL-friendly characters".to_string(),
            ]
        );
    }
}
