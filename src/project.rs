//! Project context.
//!
//! A [`Project`] bundles the resolved directories of a study with the
//! subject and session listings found in them. It is passed explicitly to
//! whatever needs it instead of living in process environment variables.

use std::path::{Path, PathBuf};

use crate::bids::{self, CodecOptions};
use crate::config::{Config, FmriprepLayout};
use crate::error::{Error, Result};
use crate::fs::{list_matching, ProjectPaths};

/// A directory together with the matching entries found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    pub dir: PathBuf,
    pub entries: Vec<String>,
}

impl DirListing {
    /// List `dir` with `pattern`, or `None` when the directory does not exist.
    pub fn scan_if_exists(dir: &Path, pattern: &str) -> Result<Option<Self>> {
        if !dir.is_dir() {
            tracing::debug!("Skipping missing directory {}", dir.display());
            return Ok(None);
        }

        Ok(Some(Self {
            dir: dir.to_path_buf(),
            entries: list_matching(dir, pattern)?,
        }))
    }
}

/// Resolved project state.
#[derive(Debug, Clone)]
pub struct Project {
    pub paths: ProjectPaths,
    pub layout: FmriprepLayout,
    pub codec: CodecOptions,
    pub subject_pattern: String,
    /// Subjects in the raw BIDS tree.
    pub bids: DirListing,
    /// FreeSurfer subjects, when the subjects directory exists.
    pub freesurfer: Option<DirListing>,
    /// FS-FAST sessions, when the functionals directory exists.
    pub functionals: Option<DirListing>,
    /// fMRIPrep subjects, when fMRIPrep was run and its directory exists.
    pub fmriprep: Option<DirListing>,
}

impl Project {
    /// Open a project from configuration. The BIDS directory must exist.
    pub fn open(config: &Config) -> Result<Self> {
        let paths = ProjectPaths::from_config(config)?;
        let pattern = config.project.subject_pattern.as_str();

        if !paths.bids_dir.is_dir() {
            return Err(Error::DirectoryNotFound(paths.bids_dir.clone()));
        }

        let bids = DirListing {
            dir: paths.bids_dir.clone(),
            entries: bids::subjects(&paths.bids_dir, pattern)?,
        };
        tracing::info!(
            "BIDS directory {} ({} subjects)",
            bids.dir.display(),
            bids.entries.len()
        );

        let freesurfer = DirListing::scan_if_exists(&paths.subjects_dir, pattern)?;
        let functionals = DirListing::scan_if_exists(&paths.functionals_dir, pattern)?;
        let fmriprep = if config.project.fmriprep_done {
            DirListing::scan_if_exists(&paths.fmriprep_dir, pattern)?
        } else {
            None
        };

        Ok(Self {
            paths,
            layout: config.project.layout,
            codec: config.codec.options()?,
            subject_pattern: config.project.subject_pattern.clone(),
            bids,
            freesurfer,
            functionals,
            fmriprep,
        })
    }

    pub fn bids_dir(&self) -> &Path {
        &self.paths.bids_dir
    }

    /// Subjects to operate on: `requested` when given, otherwise all BIDS subjects.
    ///
    /// A requested name is taken as-is when it is a listed folder, so custom
    /// subject patterns work. Otherwise it may omit the BIDS `sub-` prefix.
    pub fn select_subjects(&self, requested: &[String]) -> Result<Vec<String>> {
        if requested.is_empty() {
            return Ok(self.bids.entries.clone());
        }

        requested
            .iter()
            .map(|r| {
                if self.bids.entries.contains(r) {
                    return Ok(r.clone());
                }

                let prefixed = format!("sub-{}", r);
                if !r.starts_with("sub-") && self.bids.entries.contains(&prefixed) {
                    Ok(prefixed)
                } else {
                    Err(Error::DirectoryNotFound(self.paths.subject_dir(r)))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_config(bids: &Path) -> Config {
        let mut config = Config::default();
        config.project.bids_dir = Some(bids.to_path_buf());
        config
    }

    #[test]
    fn test_open_lists_existing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let bids = dir.path();
        fs::create_dir_all(bids.join("sub-01")).unwrap();
        fs::create_dir_all(bids.join("sub-02")).unwrap();
        fs::create_dir_all(bids.join("derivatives/freesurfer/sub-01")).unwrap();
        fs::create_dir_all(bids.join("derivatives/freesurfer/fsaverage")).unwrap();
        fs::create_dir_all(bids.join("derivatives/fmriprep/sub-01")).unwrap();

        let project = Project::open(&make_config(bids)).unwrap();
        assert_eq!(project.bids.entries, vec!["sub-01", "sub-02"]);
        assert_eq!(project.freesurfer.unwrap().entries, vec!["sub-01"]);
        assert!(project.functionals.is_none());
        // fMRIPrep output is ignored until it is marked as done
        assert!(project.fmriprep.is_none());
    }

    #[test]
    fn test_open_with_fmriprep() {
        let dir = tempfile::tempdir().unwrap();
        let bids = dir.path();
        fs::create_dir_all(bids.join("sub-01")).unwrap();
        fs::create_dir_all(bids.join("derivatives/fmriprep/sub-01")).unwrap();

        let mut config = make_config(bids);
        config.project.fmriprep_done = true;

        let project = Project::open(&config).unwrap();
        assert_eq!(project.fmriprep.unwrap().entries, vec!["sub-01"]);
    }

    #[test]
    fn test_open_missing_bids_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = make_config(&dir.path().join("missing"));
        assert!(matches!(
            Project::open(&config),
            Err(Error::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_select_subjects() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub-01")).unwrap();
        fs::create_dir_all(dir.path().join("sub-02")).unwrap();

        let project = Project::open(&make_config(dir.path())).unwrap();
        assert_eq!(project.select_subjects(&[]).unwrap(), vec!["sub-01", "sub-02"]);
        assert_eq!(
            project.select_subjects(&["02".to_string()]).unwrap(),
            vec!["sub-02"]
        );
        assert!(project.select_subjects(&["sub-09".to_string()]).is_err());
    }

    #[test]
    fn test_select_subjects_custom_pattern() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("S01")).unwrap();
        fs::create_dir_all(dir.path().join("S02")).unwrap();

        let mut config = make_config(dir.path());
        config.project.subject_pattern = "S".to_string();

        let project = Project::open(&config).unwrap();
        assert_eq!(project.bids.entries, vec!["S01", "S02"]);
        assert_eq!(
            project.select_subjects(&["S01".to_string()]).unwrap(),
            vec!["S01"]
        );
        match project.select_subjects(&["S09".to_string()]) {
            Err(Error::DirectoryNotFound(path)) => assert_eq!(path, dir.path().join("S09")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
