//! FS-FAST functional directory helpers.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs::{list_files_with_suffix, list_matching};

/// Extension of contrast matrices inside an analysis folder.
const CONTRAST_EXT: &str = ".mat";

/// List session folders in the functionals directory.
pub fn functional_sessions(func_dir: &Path, pattern: &str) -> Result<Vec<String>> {
    list_matching(func_dir, pattern)
}

/// Read the session names from an FS-FAST session ID file.
///
/// `sessid` is either a path (when it contains a path separator) or a
/// pattern that must match exactly one entry of `func_dir`. Blank lines
/// are dropped.
pub fn read_session_list(func_dir: &Path, sessid: &str) -> Result<Vec<String>> {
    let path = if sessid.contains('/') || sessid.contains(std::path::MAIN_SEPARATOR) {
        PathBuf::from(sessid)
    } else {
        let matches = list_matching(func_dir, sessid)?;
        match matches.as_slice() {
            [only] => func_dir.join(only),
            [] => {
                return Err(Error::SessionFile(format!(
                    "Cannot find the session ID file ({}) in {}",
                    sessid,
                    func_dir.display()
                )))
            }
            several => {
                return Err(Error::SessionFile(format!(
                    "There are {} session ID files matching '{}' ({}). Please specify which one to use.",
                    several.len(),
                    sessid,
                    several.join(", ")
                )))
            }
        }
    };

    if !path.is_file() {
        return Err(Error::SessionFile(format!(
            "Cannot find the session ID file ({})",
            path.display()
        )));
    }

    let content = fs::read_to_string(&path)?;
    let sessions: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    tracing::debug!("Read {} session(s) from {}", sessions.len(), path.display());
    Ok(sessions)
}

/// Contrast names of each analysis folder (the `.mat` files without extension).
pub fn analysis_contrasts<S: AsRef<str>>(func_dir: &Path, analyses: &[S]) -> Result<Vec<Vec<String>>> {
    analyses
        .iter()
        .map(|analysis| {
            let dir = func_dir.join(analysis.as_ref());
            if !dir.is_dir() {
                return Err(Error::DirectoryNotFound(dir));
            }

            Ok(list_files_with_suffix(&dir, CONTRAST_EXT)?
                .iter()
                .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
                .map(|n| n.strip_suffix(CONTRAST_EXT).unwrap_or(n).to_string())
                .collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_session_list_by_pattern() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sessid"), "sub-01_self\n\nsub-02_self\n").unwrap();

        let sessions = read_session_list(dir.path(), "sessid*").unwrap();
        assert_eq!(sessions, vec!["sub-01_self", "sub-02_self"]);
    }

    #[test]
    fn test_read_session_list_by_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my.sessid");
        fs::write(&path, "s1\ns2").unwrap();

        let sessions = read_session_list(dir.path(), &path.to_string_lossy()).unwrap();
        assert_eq!(sessions, vec!["s1", "s2"]);
    }

    #[test]
    fn test_read_session_list_ambiguous_or_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_session_list(dir.path(), "sessid*"),
            Err(Error::SessionFile(_))
        ));

        fs::write(dir.path().join("sessid_a"), "s1").unwrap();
        fs::write(dir.path().join("sessid_b"), "s2").unwrap();
        match read_session_list(dir.path(), "sessid*") {
            Err(Error::SessionFile(msg)) => assert!(msg.contains("There are 2")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_functional_sessions() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Face1_self")).unwrap();
        fs::create_dir(dir.path().join("Face2_self")).unwrap();
        fs::create_dir(dir.path().join("Word1_self")).unwrap();

        let sessions = functional_sessions(dir.path(), "Face*").unwrap();
        assert_eq!(sessions, vec!["Face1_self", "Face2_self"]);
    }

    #[test]
    fn test_analysis_contrasts() {
        let dir = tempfile::tempdir().unwrap();
        let ana = dir.path().join("loc.sm5.lh");
        fs::create_dir(&ana).unwrap();
        fs::write(ana.join("face-vs-object.mat"), "").unwrap();
        fs::write(ana.join("face-vs-fix.mat"), "").unwrap();
        fs::write(ana.join("analysis.info"), "").unwrap();

        let contrasts = analysis_contrasts(dir.path(), &["loc.sm5.lh"]).unwrap();
        assert_eq!(contrasts, vec![vec!["face-vs-fix", "face-vs-object"]]);

        assert!(analysis_contrasts(dir.path(), &["missing"]).is_err());
    }

    #[test]
    fn test_analysis_contrasts_strips_one_extension() {
        let dir = tempfile::tempdir().unwrap();
        let ana = dir.path().join("loc.sm5.rh");
        fs::create_dir(&ana).unwrap();
        fs::write(ana.join("a.mat.mat"), "").unwrap();

        let contrasts = analysis_contrasts(dir.path(), &["loc.sm5.rh"]).unwrap();
        assert_eq!(contrasts, vec![vec!["a.mat"]]);
    }
}
