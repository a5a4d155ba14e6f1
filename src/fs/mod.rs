//! Filesystem module.
//!
//! Provides:
//! - Directory listing with name patterns
//! - Project directory layout

pub mod paths;
pub mod scan;

pub use paths::{functionals_dir, ProjectPaths};
pub use scan::{compile_pattern, list_files_with_suffix, list_matching};
