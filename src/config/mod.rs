//! Configuration module for nisurf.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - The fMRIPrep layout setting
//! - Configuration validation

pub mod layout;
pub mod loader;
pub mod validation;

pub use layout::FmriprepLayout;
pub use loader::{CodecConfig, Config, FreeSurferConfig, ProjectConfig};
pub use validation::{validate_config, validate_pattern, validate_project};
