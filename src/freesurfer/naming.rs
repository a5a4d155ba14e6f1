//! Information encoded in FreeSurfer file and folder names.
//!
//! Label and analysis names carry contrast, hemisphere, threshold and
//! template, e.g. `roi.lh.f13.face-vs-object.label`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Marker of a contrast name.
pub const CONTRAST_SIGN: &str = "-vs-";

/// Templates recognized by [`template`] by default.
pub const TEMPLATES: &[&str] = &["fsaverage", "self"];

/// Cortical hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    Left,
    Right,
}

impl Hemisphere {
    /// FreeSurfer abbreviation (`lh`/`rh`).
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Hemisphere::Left => "lh",
            Hemisphere::Right => "rh",
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for Hemisphere {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "lh" => Ok(Hemisphere::Left),
            "rh" => Ok(Hemisphere::Right),
            _ => Err(format!("Unknown hemisphere: {}", s)),
        }
    }
}

/// The parts of `name` (split on `separator`) that contain `sign`, concatenated.
pub fn contrast_name(name: &str, separator: &str, sign: &str) -> String {
    name.split(separator)
        .filter(|part| part.contains(sign))
        .collect::<Vec<_>>()
        .concat()
}

/// [`contrast_name`] over several names with `.` and [`CONTRAST_SIGN`].
pub fn contrast_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|n| contrast_name(n.as_ref(), ".", CONTRAST_SIGN))
        .collect()
}

/// Hemisphere of a file when exactly one of `lh`/`rh` occurs in its name.
///
/// With `name_only`, directories in the path are ignored.
pub fn hemisphere(path: &str, name_only: bool) -> Option<Hemisphere> {
    let name = if name_only {
        Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path)
    } else {
        path
    };

    match (name.contains("lh"), name.contains("rh")) {
        (true, false) => Some(Hemisphere::Left),
        (false, true) => Some(Hemisphere::Right),
        _ => {
            tracing::warn!("Cannot determine the hemisphere of {}", path);
            None
        }
    }
}

/// [`hemisphere`] over several names.
pub fn hemispheres<S: AsRef<str>>(paths: &[S], name_only: bool) -> Vec<Option<Hemisphere>> {
    let hemis: Vec<_> = paths
        .iter()
        .map(|p| hemisphere(p.as_ref(), name_only))
        .collect();

    let left = hemis.contains(&Some(Hemisphere::Left));
    let right = hemis.contains(&Some(Hemisphere::Right));
    if left && right {
        tracing::info!("These files are for both hemispheres");
    }

    hemis
}

/// Significance threshold written as `f<digits>` (e.g. `f13` gives 13.0).
///
/// Only the first such token counts.
pub fn significance(name: &str) -> Option<f64> {
    name.match_indices('f').find_map(|(i, _)| {
        let digits: String = name[i + 1..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            None
        } else {
            digits.parse().ok()
        }
    })
}

/// The templates from `patterns` found in `name`, concatenated; `None` when none occur.
pub fn template(name: &str, patterns: &[&str]) -> Option<String> {
    let found: String = patterns
        .iter()
        .filter(|p| name.contains(*p))
        .copied()
        .collect();

    if found.is_empty() {
        None
    } else {
        Some(found)
    }
}
