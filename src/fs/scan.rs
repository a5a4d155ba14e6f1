//! Directory listing with pattern matching.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{Error, Result};

/// Compile a listing pattern. Matching is anchored at the start of the name only,
/// so `sub-*` accepts any name beginning with `sub`.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{})", pattern))?)
}

/// List the names in `base` that match `pattern` and contain no `.`.
///
/// Names with a dot are files (or hidden entries) and never count as
/// subject or session folders. The result is sorted.
pub fn list_matching(base: &Path, pattern: &str) -> Result<Vec<String>> {
    let regex = compile_pattern(pattern)?;

    if !base.is_dir() {
        return Err(Error::DirectoryNotFound(base.to_path_buf()));
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::debug!("Skipping non UTF-8 entry in {}", base.display());
            continue;
        };

        if !name.contains('.') && regex.is_match(&name) {
            names.push(name);
        }
    }

    names.sort();
    tracing::debug!(
        "Found {} entries matching '{}' in {}",
        names.len(),
        pattern,
        base.display()
    );
    Ok(names)
}

/// List regular files in `dir` whose names end with `suffix`, sorted by name.
///
/// A missing directory yields an empty list.
pub fn list_files_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with(suffix))
            .unwrap_or(false);

        if matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
