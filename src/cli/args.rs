//! Command-line argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, FmriprepLayout};

/// BIDS and FreeSurfer project utilities.
#[derive(Parser, Debug)]
#[command(
    name = "nisurf",
    version,
    about = "Utilities for BIDS datasets and FreeSurfer projects",
    long_about = "Decode and rebuild BIDS filenames, list subjects and sessions, fix field map \
                  and functional sidecars, copy events files, and run shell commands.\n\n\
                  Directories come from the configuration file, the command line, or the \
                  BIDS_DIR / SUBJECTS_DIR / FUNCTIONALS_DIR environment variables."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(short, long, default_value = "nisurf.toml", global = true)]
    pub config: PathBuf,

    /// Root of the BIDS dataset.
    #[arg(long = "bids-dir", env = "BIDS_DIR", global = true)]
    pub bids_dir: Option<PathBuf>,

    /// FreeSurfer subjects directory.
    #[arg(long = "subjects-dir", env = "SUBJECTS_DIR", global = true)]
    pub subjects_dir: Option<PathBuf>,

    /// FS-FAST functionals directory.
    #[arg(long = "functionals-dir", env = "FUNCTIONALS_DIR", global = true)]
    pub functionals_dir: Option<PathBuf>,

    /// fMRIPrep output layout.
    #[arg(long, value_enum, global = true)]
    pub layout: Option<LayoutArg>,

    /// Pattern identifying subject folders.
    #[arg(long, global = true)]
    pub subject_pattern: Option<String>,

    /// fMRIPrep has been run; list its output too.
    #[arg(long, global = true)]
    pub fmriprep_done: bool,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode BIDS filenames into key/value information.
    Decode {
        /// Filenames or paths to decode.
        #[arg(required = true, num_args = 1..)]
        files: Vec<String>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Build a filename from a JSON object of key/value information.
    Encode {
        /// JSON object, e.g. '{"sub":"01","modality":"T1w","ext":".nii.gz"}'.
        json: String,
    },

    /// Change entities of a filename and print the new name.
    Rename {
        /// Filename to change.
        file: String,

        /// Set a key (KEY=VALUE). Repeatable.
        #[arg(long = "set", value_parser = parse_key_value)]
        set: Vec<(String, String)>,

        /// Remove a key. Repeatable.
        #[arg(long)]
        drop: Vec<String>,
    },

    /// List subjects in the project directories.
    Subjects,

    /// List the session folders of a subject.
    Sessions {
        /// Subject folder name (e.g. sub-01).
        subject: String,
    },

    /// Set IntendedFor in field map sidecars.
    FixFmap {
        /// Subjects to process (default: all).
        subjects: Vec<String>,
    },

    /// Set TaskName in functional sidecars.
    FixFunc {
        /// Subjects to process (default: all).
        subjects: Vec<String>,
    },

    /// Copy events templates next to functional runs.
    CopyEvents {
        /// Directory holding *_events.tsv templates.
        #[arg(long)]
        events_dir: PathBuf,

        /// Subjects to process (default: all).
        subjects: Vec<String>,
    },

    /// List the contrasts of FS-FAST analyses.
    Contrasts {
        /// Analysis folder names in the functionals directory.
        #[arg(required = true, num_args = 1..)]
        analyses: Vec<String>,
    },

    /// Print the sessions listed in an FS-FAST session ID file.
    SessionList {
        /// Session ID file name pattern or path.
        #[arg(long)]
        sessid: Option<String>,
    },

    /// Run shell commands and report their exit statuses.
    Run {
        /// Commands to run, in order.
        #[arg(required = true, num_args = 1..)]
        commands: Vec<String>,

        /// Only print the commands.
        #[arg(long)]
        dry_run: bool,

        /// Escape spaces, parentheses and `~` before running.
        #[arg(long)]
        escape: bool,
    },
}

impl Commands {
    /// Whether the command needs an existing BIDS project.
    ///
    /// FS-FAST commands only need the functionals directory.
    pub fn needs_project(&self) -> bool {
        matches!(
            self,
            Commands::Subjects
                | Commands::Sessions { .. }
                | Commands::FixFmap { .. }
                | Commands::FixFunc { .. }
                | Commands::CopyEvents { .. }
        )
    }
}

/// CLI layout argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    /// derivatives/fmriprep and derivatives/freesurfer.
    Legacy,
    /// derivatives with sourcedata/freesurfer inside.
    Bids,
}

impl From<LayoutArg> for FmriprepLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Legacy => FmriprepLayout::Legacy,
            LayoutArg::Bids => FmriprepLayout::Bids,
        }
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(dir) = &self.bids_dir {
            config.project.bids_dir = Some(dir.clone());
        }

        if let Some(dir) = &self.subjects_dir {
            config.freesurfer.subjects_dir = Some(dir.clone());
        }

        if let Some(dir) = &self.functionals_dir {
            config.freesurfer.functionals_dir = Some(dir.clone());
        }

        if let Some(layout) = self.layout {
            config.project.layout = layout.into();
        }

        if let Some(pattern) = &self.subject_pattern {
            config.project.subject_pattern = pattern.clone();
        }

        // Boolean flags (only override if set to non-default)
        if self.fmriprep_done {
            config.project.fmriprep_done = true;
        }

        if let Commands::SessionList {
            sessid: Some(sessid),
        } = &self.command
        {
            config.freesurfer.session_pattern = sessid.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rename() {
        let args = Args::try_parse_from([
            "nisurf", "rename", "sub-01_bold.nii", "--set", "run=2", "--drop", "ses",
        ])
        .unwrap();

        match args.command {
            Commands::Rename { file, set, drop } => {
                assert_eq!(file, "sub-01_bold.nii");
                assert_eq!(set, vec![("run".to_string(), "2".to_string())]);
                assert_eq!(drop, vec!["ses"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_key_value() {
        assert!(Args::try_parse_from(["nisurf", "rename", "x", "--set", "novalue"]).is_err());
    }

    #[test]
    fn test_merge_into_config() {
        let args = Args::try_parse_from([
            "nisurf",
            "--bids-dir",
            "/study/bids",
            "--layout",
            "bids",
            "session-list",
            "--sessid",
            "sessid.faces",
        ])
        .unwrap();

        let mut config = Config::default();
        args.merge_into_config(&mut config);
        assert_eq!(config.project.bids_dir, Some(PathBuf::from("/study/bids")));
        assert_eq!(config.project.layout, FmriprepLayout::Bids);
        assert_eq!(config.freesurfer.session_pattern, "sessid.faces");
        assert!(!args.command.needs_project());
    }

    #[test]
    fn test_fsfast_commands_need_no_project() {
        let args = Args::try_parse_from([
            "nisurf",
            "--functionals-dir",
            "/fs/functionals",
            "contrasts",
            "faces.sm05.lh",
        ])
        .unwrap();
        assert!(!args.command.needs_project());

        let mut config = Config::default();
        args.merge_into_config(&mut config);
        assert_eq!(config.project.bids_dir, None);
        assert_eq!(
            config.freesurfer.functionals_dir,
            Some(PathBuf::from("/fs/functionals"))
        );
    }

    #[test]
    fn test_codec_commands_need_no_project() {
        let args = Args::try_parse_from(["nisurf", "decode", "sub-01_T1w.nii.gz"]).unwrap();
        assert!(!args.command.needs_project());
    }
}
