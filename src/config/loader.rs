//! Configuration structures and loading logic.

use crate::bids::CodecOptions;
use crate::config::layout::FmriprepLayout;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub freesurfer: FreeSurferConfig,

    #[serde(default)]
    pub codec: CodecConfig,
}

/// BIDS project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Root of the BIDS dataset.
    #[serde(default)]
    pub bids_dir: Option<PathBuf>,

    /// Pattern identifying subject folders.
    #[serde(default = "default_subject_pattern")]
    pub subject_pattern: String,

    /// Output layout used by fMRIPrep.
    #[serde(default)]
    pub layout: FmriprepLayout,

    /// Whether fMRIPrep has been run (enables listing its output).
    #[serde(default)]
    pub fmriprep_done: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            bids_dir: None,
            subject_pattern: default_subject_pattern(),
            layout: FmriprepLayout::default(),
            fmriprep_done: false,
        }
    }
}

/// FreeSurfer directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeSurferConfig {
    /// Overrides the derived `SUBJECTS_DIR`.
    #[serde(default)]
    pub subjects_dir: Option<PathBuf>,

    /// Overrides the derived `FUNCTIONALS_DIR`.
    #[serde(default)]
    pub functionals_dir: Option<PathBuf>,

    /// Pattern (or path) of the FS-FAST session ID file.
    #[serde(default = "default_session_pattern")]
    pub session_pattern: String,
}

impl Default for FreeSurferConfig {
    fn default() -> Self {
        Self {
            subjects_dir: None,
            functionals_dir: None,
            session_pattern: default_session_pattern(),
        }
    }
}

/// Filename codec configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    #[serde(default = "default_section_separator")]
    pub section_separator: String,

    #[serde(default = "default_value_separator")]
    pub value_separator: String,

    /// Tokens recognized as a modality in addition to the built-in list.
    #[serde(default)]
    pub extra_modalities: Vec<String>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            section_separator: default_section_separator(),
            value_separator: default_value_separator(),
            extra_modalities: Vec::new(),
        }
    }
}

impl CodecConfig {
    /// Build codec options from this configuration.
    pub fn options(&self) -> Result<CodecOptions> {
        Ok(
            CodecOptions::new(&self.section_separator, &self.value_separator)?
                .with_modalities(self.extra_modalities.iter().cloned()),
        )
    }
}

fn default_subject_pattern() -> String {
    "sub-*".to_string()
}

fn default_session_pattern() -> String {
    "sessid*".to_string()
}

fn default_section_separator() -> String {
    "_".to_string()
}

fn default_value_separator() -> String {
    "-".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}
