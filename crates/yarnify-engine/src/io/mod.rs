use crate::sources::{RewriteOptions, SourceFormat, translate_source};
use glob::Pattern;
use relative_path::RelativePathBuf;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid documentation root: {0}")]
    InvalidRoot(String),
    #[error("Unsupported file type: {0}")]
    UnsupportedFile(PathBuf),
}

/// Outcome of translating one documentation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub format: SourceFormat,
    pub content: String,
    pub changed: bool,
}

/// Read a documentation file and return its content
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write content to a documentation file
pub fn write_file(path: &Path, content: &str) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(path, content).map_err(IoError::Io)
}

/// Scan for supported documentation files under `root`.
///
/// `exclude` globs are matched against root-relative, `/`-separated paths.
/// A directory matching a pattern is not descended into.
pub fn scan_source_files(root: &Path, exclude: &[Pattern]) -> Result<Vec<PathBuf>, IoError> {
    validate_root(root)?;

    let mut files = Vec::new();
    scan_directory_recursive(root, root, exclude, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(
    root: &Path,
    dir: &Path,
    exclude: &[Pattern],
    files: &mut Vec<PathBuf>,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if is_excluded(root, &path, exclude) {
            log::debug!("Excluded {}", path.display());
            continue;
        }

        if path.is_dir() {
            scan_directory_recursive(root, &path, exclude, files)?;
        } else if SourceFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }

    Ok(())
}

fn is_excluded(root: &Path, path: &Path, exclude: &[Pattern]) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    let Ok(relative) = RelativePathBuf::from_path(relative) else {
        return false;
    };
    exclude
        .iter()
        .any(|pattern| pattern.matches(relative.as_str()))
}

pub fn validate_root(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidRoot(format!(
            "directory {} does not exist",
            path.display()
        )));
    }

    Ok(())
}

/// Translate a file without writing it back.
///
/// `format` overrides detection from the file extension.
pub fn translate_file(
    path: &Path,
    format: Option<SourceFormat>,
    options: &RewriteOptions,
) -> Result<FileOutcome, IoError> {
    let format = format
        .or_else(|| SourceFormat::from_path(path))
        .ok_or_else(|| IoError::UnsupportedFile(path.to_path_buf()))?;

    let original = read_file(path)?;
    let content = translate_source(&original, format, options);
    let changed = content != original;

    Ok(FileOutcome {
        path: path.to_path_buf(),
        format,
        content,
        changed,
    })
}

/// Translate a file and write it back if anything changed.
pub fn rewrite_file(
    path: &Path,
    format: Option<SourceFormat>,
    options: &RewriteOptions,
) -> Result<FileOutcome, IoError> {
    let outcome = translate_file(path, format, options)?;
    if outcome.changed {
        write_file(path, &outcome.content)?;
    }
    Ok(outcome)
}
