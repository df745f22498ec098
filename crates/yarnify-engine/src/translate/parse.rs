use std::fmt;

use super::scan::InvocationMatch;
use crate::package_name::is_valid_legacy_name;

/// How a single npm parameter token contributes to the yarn command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    /// `-g` / `--global`
    Global,
    /// `-s` / `--save`: yarn always saves, so this has no counterpart
    Save,
    /// A flag with a direct yarn equivalent
    Flag(&'static str),
    /// A package specifier whose name passes validation
    Package,
    /// Anything else; dropped from the yarn command
    Invalid,
}

impl Parameter {
    pub fn classify(token: &str) -> Self {
        match token {
            "-g" | "--global" => Self::Global,
            "-s" | "--save" => Self::Save,
            "-D" | "--save-dev" => Self::Flag("--dev"),
            "-O" | "--save-optional" => Self::Flag("--optional"),
            "-E" | "--save-exact" => Self::Flag("--exact"),
            _ if is_valid_legacy_name(package_name_part(token)) => Self::Package,
            _ => Self::Invalid,
        }
    }
}

/// The name portion of a package specifier, without any `@version` suffix.
///
/// For scoped specifiers the leading `@` belongs to the name, so the version
/// separator is the second `@`.
pub fn package_name_part(token: &str) -> &str {
    let name_start = usize::from(token.starts_with('@'));
    match token[name_start..].find('@') {
        Some(index) => &token[..name_start + index],
        None => token,
    }
}

/// Classified parameters of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation<'a> {
    pub flags: Vec<&'static str>,
    pub packages: Vec<&'a str>,
    pub is_global: bool,
    /// Command token plus every parameter token, single-space separated
    pub parsed_command_text: String,
}

impl<'a> ParsedInvocation<'a> {
    pub fn parse(invocation: &InvocationMatch<'a>) -> Self {
        let mut parsed = Self {
            flags: Vec::new(),
            packages: Vec::new(),
            is_global: false,
            parsed_command_text: invocation.command_token.to_string(),
        };

        for &token in &invocation.parameter_tokens {
            match Parameter::classify(token) {
                Parameter::Global => parsed.is_global = true,
                Parameter::Save | Parameter::Invalid => {}
                Parameter::Flag(flag) => parsed.flags.push(flag),
                Parameter::Package => parsed.packages.push(token),
            }

            parsed.parsed_command_text.push(' ');
            parsed.parsed_command_text.push_str(token);
        }

        parsed
    }

    /// The equivalent yarn command, or `None` when the invocation only
    /// carries flags and names no package.
    pub fn yarn_command(&self) -> Option<YarnCommand<'_>> {
        match (self.packages.is_empty(), self.flags.is_empty()) {
            (true, false) => None,
            (true, true) => Some(YarnCommand::Install),
            (false, _) => Some(YarnCommand::Add {
                global: self.is_global,
                flags: &self.flags,
                packages: &self.packages,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YarnCommand<'a> {
    /// `yarn install`
    Install,
    /// `yarn [global] add [flags...] packages...`
    Add {
        global: bool,
        flags: &'a [&'static str],
        packages: &'a [&'a str],
    },
}

impl fmt::Display for YarnCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YarnCommand::Install => write!(f, "yarn install"),
            YarnCommand::Add {
                global,
                flags,
                packages,
            } => {
                write!(f, "yarn")?;
                if *global {
                    write!(f, " global")?;
                }
                write!(f, " add")?;
                for flag in flags.iter() {
                    write!(f, " {flag}")?;
                }
                for package in packages.iter() {
                    write!(f, " {package}")?;
                }
                Ok(())
            }
        }
    }
}
