//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use crate::fs::compile_pattern;

/// Validate the settings every command relies on.
pub fn validate_config(config: &Config) -> Result<()> {
    config.codec.options()?;
    validate_pattern("project.subject_pattern", &config.project.subject_pattern)?;
    validate_pattern("freesurfer.session_pattern", &config.freesurfer.session_pattern)?;

    Ok(())
}

/// Validate the settings needed by commands that touch the dataset.
pub fn validate_project(config: &Config) -> Result<()> {
    validate_config(config)?;

    let bids_dir = config
        .project
        .bids_dir
        .as_ref()
        .ok_or_else(|| Error::MissingConfig("project.bids_dir (or --bids-dir / $BIDS_DIR)".to_string()))?;

    if bids_dir.as_os_str().is_empty() {
        return Err(Error::ConfigValidation {
            field: "project.bids_dir".to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }

    Ok(())
}

/// Validate a directory listing pattern.
pub fn validate_pattern(field: &str, pattern: &str) -> Result<()> {
    compile_pattern(pattern).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}
