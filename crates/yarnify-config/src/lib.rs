use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use yarnify_engine::{HtmlOptions, MarkdownOptions, RewriteOptions, SourceFormat};

/// Name of the per-project config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "yarnify.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation tree used when no paths are given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Format of text read from stdin when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<SourceFormat>,
    /// Globs, relative to the scanned root, for paths to leave alone
    pub exclude: Vec<String>,
    pub markdown: MarkdownOptions,
    pub html: HtmlOptions,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the configured root
        config.root = config
            .root
            .map(|root| Self::expand_path(&root).unwrap_or(root));

        // Surface bad globs at load time rather than mid-scan
        config.exclude_patterns()?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Prefer `yarnify.toml` in `dir`, falling back to the user config.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Option<Self>, ConfigError> {
        let project_config = dir.as_ref().join(PROJECT_CONFIG_FILE);
        if project_config.exists() {
            return Self::load_from_path(&project_config);
        }
        Self::load()
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/yarnify");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn exclude_patterns(&self) -> Result<Vec<Pattern>, ConfigError> {
        self.exclude
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }

    pub fn rewrite_options(&self) -> RewriteOptions {
        RewriteOptions {
            markdown: self.markdown,
            html: self.html,
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        // Should contain the expected config file name
        assert!(path_str.ends_with(".config/yarnify/config.toml"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert!(config.markdown.prose);
        assert!(config.markdown.inline_code);
        assert!(config.markdown.code_blocks);
        assert!(config.markdown.html);
        assert!(config.html.inputs);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
exclude = ["node_modules/**", "CHANGELOG.md"]

[markdown]
prose = false
"#,
        )
        .unwrap();

        assert_eq!(config.exclude, vec!["node_modules/**", "CHANGELOG.md"]);
        assert!(!config.markdown.prose);
        assert!(config.markdown.code_blocks);
        assert_eq!(config.rewrite_options().markdown, config.markdown);
    }

    #[test]
    fn test_stdin_format_key() {
        let config: Config = toml::from_str("format = \"markdown\"\n").unwrap();
        assert_eq!(config.format, Some(SourceFormat::Markdown));

        let err = toml::from_str::<Config>("format = \"rst\"\n").unwrap_err();
        assert!(err.to_string().contains("rst"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            root: Some(PathBuf::from("/tmp/test-docs")),
            format: Some(SourceFormat::Html),
            exclude: vec!["vendor/**".to_string()],
            markdown: MarkdownOptions {
                inline_code: false,
                ..MarkdownOptions::default()
            },
            html: HtmlOptions { inputs: false },
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_absolute_path() {
        let path = PathBuf::from("/absolute/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            root: Some(PathBuf::from("/tmp/test-docs")),
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_root_with_env_var_in_toml() {
        unsafe {
            env::set_var("YARNIFY_DOCS_ROOT", "/custom/docs");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "root = \"$YARNIFY_DOCS_ROOT/site\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(config.root, Some(PathBuf::from("/custom/docs/site")));

        unsafe {
            env::remove_var("YARNIFY_DOCS_ROOT");
        }
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "exclude = 3\n").unwrap();

        let result = Config::load_from_path(&config_file);
        assert!(matches!(
            result,
            Err(ConfigError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_invalid_exclude_glob_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "exclude = [\"docs/[oops\"]\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(err.to_string().contains("docs/[oops"));
    }

    #[test]
    fn test_discover_prefers_project_config() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(PROJECT_CONFIG_FILE),
            "exclude = [\"build/**\"]\n",
        )
        .unwrap();

        let config = Config::discover(temp_dir.path()).unwrap().unwrap();
        assert_eq!(config.exclude, vec!["build/**"]);
    }
}
