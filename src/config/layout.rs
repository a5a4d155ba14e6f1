//! fMRIPrep output layout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Directory layout of fMRIPrep derivatives.
///
/// See <https://fmriprep.org/en/stable/outputs.html#legacy-layout>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FmriprepLayout {
    /// `derivatives/fmriprep` next to `derivatives/freesurfer` (default).
    #[default]
    Legacy,
    /// `derivatives` as the fMRIPrep root with `sourcedata/freesurfer` inside.
    Bids,
}

impl fmt::Display for FmriprepLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FmriprepLayout::Legacy => write!(f, "legacy"),
            FmriprepLayout::Bids => write!(f, "bids"),
        }
    }
}

impl FromStr for FmriprepLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(FmriprepLayout::Legacy),
            "bids" => Ok(FmriprepLayout::Bids),
            _ => Err(format!("Unknown fMRIPrep layout: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layout() {
        assert_eq!("legacy".parse::<FmriprepLayout>(), Ok(FmriprepLayout::Legacy));
        assert_eq!("BIDS".parse::<FmriprepLayout>(), Ok(FmriprepLayout::Bids));
        assert!("flat".parse::<FmriprepLayout>().is_err());
        assert_eq!(FmriprepLayout::Bids.to_string(), "bids");
    }
}
