//! FreeSurfer module.
//!
//! Provides:
//! - FS-FAST session and analysis helpers
//! - Information derived from FreeSurfer names

pub mod fast;
pub mod naming;

pub use fast::{analysis_contrasts, functional_sessions, read_session_list};
pub use naming::{
    contrast_name, contrast_names, hemisphere, hemispheres, significance, template, Hemisphere,
};
