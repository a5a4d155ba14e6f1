//! Project directory layout.

use std::path::{Path, PathBuf};

use crate::config::{Config, FmriprepLayout};
use crate::error::{Error, Result};

/// Directories of a BIDS project and its derivatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub bids_dir: PathBuf,
    /// FreeSurfer `SUBJECTS_DIR`.
    pub subjects_dir: PathBuf,
    /// FreeSurfer FS-FAST `FUNCTIONALS_DIR`.
    pub functionals_dir: PathBuf,
    /// fMRIPrep output directory.
    pub fmriprep_dir: PathBuf,
}

impl ProjectPaths {
    /// Derive the default layout under a BIDS root.
    pub fn new(bids_dir: &Path, layout: FmriprepLayout) -> Self {
        let derivatives = bids_dir.join("derivatives");

        let (subjects_dir, fmriprep_dir) = match layout {
            FmriprepLayout::Legacy => (derivatives.join("freesurfer"), derivatives.join("fmriprep")),
            FmriprepLayout::Bids => (
                derivatives.join("sourcedata").join("freesurfer"),
                derivatives.clone(),
            ),
        };

        Self {
            bids_dir: bids_dir.to_path_buf(),
            subjects_dir,
            functionals_dir: derivatives.join("functionals"),
            fmriprep_dir,
        }
    }

    /// Resolve paths from the configuration, applying explicit overrides.
    pub fn from_config(config: &Config) -> Result<Self> {
        let bids_dir = config
            .project
            .bids_dir
            .as_deref()
            .ok_or_else(|| Error::MissingConfig("project.bids_dir".to_string()))?;

        let mut paths = Self::new(bids_dir, config.project.layout);

        if let Some(dir) = &config.freesurfer.subjects_dir {
            paths.subjects_dir = dir.clone();
        }
        if let Some(dir) = &config.freesurfer.functionals_dir {
            paths.functionals_dir = dir.clone();
        }

        Ok(paths)
    }

    /// Folder of one subject in the raw BIDS tree.
    pub fn subject_dir(&self, subject: &str) -> PathBuf {
        self.bids_dir.join(subject)
    }
}

/// FS-FAST functionals directory, without requiring a BIDS root.
///
/// An explicit `freesurfer.functionals_dir` wins; otherwise it is derived
/// from `project.bids_dir`.
pub fn functionals_dir(config: &Config) -> Result<PathBuf> {
    if let Some(dir) = &config.freesurfer.functionals_dir {
        return Ok(dir.clone());
    }

    if config.project.bids_dir.is_none() {
        return Err(Error::MissingConfig(
            "freesurfer.functionals_dir (or --functionals-dir / $FUNCTIONALS_DIR)".to_string(),
        ));
    }

    Ok(ProjectPaths::from_config(config)?.functionals_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_layout() {
        let paths = ProjectPaths::new(Path::new("/study/bids"), FmriprepLayout::Legacy);
        assert_eq!(paths.subjects_dir, PathBuf::from("/study/bids/derivatives/freesurfer"));
        assert_eq!(paths.fmriprep_dir, PathBuf::from("/study/bids/derivatives/fmriprep"));
        assert_eq!(
            paths.functionals_dir,
            PathBuf::from("/study/bids/derivatives/functionals")
        );
    }

    #[test]
    fn test_bids_layout() {
        let paths = ProjectPaths::new(Path::new("/study/bids"), FmriprepLayout::Bids);
        assert_eq!(
            paths.subjects_dir,
            PathBuf::from("/study/bids/derivatives/sourcedata/freesurfer")
        );
        assert_eq!(paths.fmriprep_dir, PathBuf::from("/study/bids/derivatives"));
    }

    #[test]
    fn test_from_config_overrides() {
        let mut config = Config::default();
        assert!(matches!(
            ProjectPaths::from_config(&config),
            Err(Error::MissingConfig(_))
        ));

        config.project.bids_dir = Some(PathBuf::from("/study/bids"));
        config.freesurfer.subjects_dir = Some(PathBuf::from("/fs/subjects"));

        let paths = ProjectPaths::from_config(&config).unwrap();
        assert_eq!(paths.subjects_dir, PathBuf::from("/fs/subjects"));
        assert_eq!(paths.subject_dir("sub-01"), PathBuf::from("/study/bids/sub-01"));
    }

    #[test]
    fn test_functionals_dir_without_bids_dir() {
        let mut config = Config::default();
        assert!(matches!(
            functionals_dir(&config),
            Err(Error::MissingConfig(_))
        ));

        config.freesurfer.functionals_dir = Some(PathBuf::from("/fs/functionals"));
        assert_eq!(
            functionals_dir(&config).unwrap(),
            PathBuf::from("/fs/functionals")
        );
    }

    #[test]
    fn test_functionals_dir_from_bids_dir() {
        let mut config = Config::default();
        config.project.bids_dir = Some(PathBuf::from("/study/bids"));
        assert_eq!(
            functionals_dir(&config).unwrap(),
            PathBuf::from("/study/bids/derivatives/functionals")
        );
    }
}
