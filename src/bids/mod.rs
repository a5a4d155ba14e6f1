//! BIDS module.
//!
//! Provides:
//! - The filename information codec
//! - JSON sidecar reading and writing
//! - Dataset maintenance helpers

pub mod dataset;
pub mod filename;
pub mod sidecar;

pub use dataset::{
    copy_events, copy_subject_events, fix_fmap, fix_func, functional_images, session_dirs,
    subjects,
};
pub use filename::{decode, encode, CodecOptions, FileInfo, MODALITIES};
pub use sidecar::{read_sidecar, sidecar_path, update_sidecar, write_sidecar, Sidecar};
