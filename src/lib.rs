//! nisurf - utilities for BIDS datasets and FreeSurfer projects
//!
//! The core is a codec for BIDS-style filenames: [`decode`] turns
//! `sub-01_task-rest_run-1_bold.nii.gz` into ordered key/value information
//! and [`encode`] rebuilds a filename from it.
//!
//! # Features
//!
//! - Filename information codec with configurable separators
//! - JSON sidecar reading, writing and in-place updates
//! - Dataset maintenance: field map `IntendedFor`, functional `TaskName`,
//!   events files
//! - Subject/session discovery with name patterns
//! - FS-FAST session ID files and analysis contrasts
//! - Shell command escaping and a sequential command runner
//!
//! # Example
//!
//! ```
//! use nisurf::{decode, encode};
//!
//! let mut info = decode("sub-01_task-rest_run-1_bold.nii.gz");
//! assert_eq!(info.get("task"), Some("rest"));
//! assert_eq!(info.modality(), Some("bold"));
//!
//! info.set_modality("events");
//! info.set_ext(".tsv");
//! assert_eq!(encode(&info), "sub-01_task-rest_run-1_events.tsv");
//! ```

pub mod bids;
pub mod cli;
pub mod config;
pub mod error;
pub mod freesurfer;
pub mod fs;
pub mod output;
pub mod project;
pub mod shell;

// Re-exports for convenience
pub use bids::{decode, encode, CodecOptions, FileInfo};
pub use config::{Config, FmriprepLayout};
pub use error::{Error, Result};
pub use project::Project;
pub use shell::{CommandReport, CommandRunner};
