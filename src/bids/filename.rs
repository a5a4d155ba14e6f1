//! BIDS filename information codec.
//!
//! A BIDS-style filename such as `sub-002_task-A_run-01_bold.nii.gz` is a
//! sequence of *sections* joined by a section separator (`_`), followed by an
//! extension that starts at the first `.`. Each section is either a
//! `key-value` pair or a bare value. [`CodecOptions::decode`] turns a filename
//! into an ordered [`FileInfo`] mapping and [`CodecOptions::encode`] turns the
//! mapping back into a filename.
//!
//! Bare values receive synthesized keys: `modality` when the value is the last
//! section and belongs to the modality vocabulary, `custom<N>` otherwise, with
//! `N` counting bare sections only. Encoding writes those values back without
//! a key, so `encode(decode(f)) == f` as long as no explicit key starts with
//! `custom` or equals `modality`.

use std::convert::Infallible;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Reserved key holding the extension (including the leading `.`).
pub const EXT_KEY: &str = "ext";

/// Synthesized key for a trailing bare section found in the modality vocabulary.
pub const MODALITY_KEY: &str = "modality";

/// Prefix of synthesized keys for the remaining bare sections.
pub const CUSTOM_PREFIX: &str = "custom";

/// Default section separator.
pub const DEFAULT_SECTION_SEPARATOR: &str = "_";

/// Default key/value separator.
pub const DEFAULT_VALUE_SEPARATOR: &str = "-";

/// Modality tokens recognized by default (case-sensitive).
pub const MODALITIES: &[&str] = &[
    "bold",
    "sbref",
    "epi",
    "T1w",
    "T2w",
    "scans",
    "events",
    "inflated",
    "midthickness",
    "pial",
    "smoothwm",
    "probseg",
    "timeseries",
    "xfm",
    "boldref",
    "dseg",
    "mask",
];

/// Whether a key was synthesized for a bare section and is not written back.
pub fn is_synthetic_key(key: &str) -> bool {
    key.starts_with(CUSTOM_PREFIX) || key == MODALITY_KEY
}

/// Ordered key/value information decoded from a filename.
///
/// Iteration order is section order. Keys are unique; inserting an existing
/// key replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    entries: Vec<(String, String)>,
}

impl FileInfo {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert a value, returning the previous value if the key existed.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterate over `(key, value)` pairs in section order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The extension, or an empty string when no `ext` entry exists.
    pub fn ext(&self) -> &str {
        self.get(EXT_KEY).unwrap_or("")
    }

    pub fn set_ext(&mut self, ext: impl Into<String>) {
        self.insert(EXT_KEY, ext);
    }

    pub fn modality(&self) -> Option<&str> {
        self.get(MODALITY_KEY)
    }

    pub fn set_modality(&mut self, modality: impl Into<String>) {
        self.insert(MODALITY_KEY, modality);
    }

    /// Entries that came from explicit `key-value` sections.
    pub fn entities(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter(|(k, _)| *k != EXT_KEY && !is_synthetic_key(k))
    }
}

impl Index<&str> for FileInfo {
    type Output = str;

    fn index(&self, key: &str) -> &str {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key '{}' not present in file info", key),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for FileInfo
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut info = FileInfo::new();
        for (k, v) in iter {
            info.insert(k, v);
        }
        info
    }
}

impl FromStr for FileInfo {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(decode(s))
    }
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl Serialize for FileInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FileInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FileInfoVisitor;

        impl<'de> Visitor<'de> for FileInfoVisitor {
            type Value = FileInfo;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of filename keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut info = FileInfo::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    info.insert(key, value);
                }
                Ok(info)
            }
        }

        deserializer.deserialize_map(FileInfoVisitor)
    }
}

/// Separators and modality vocabulary used by the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    section_separator: String,
    value_separator: String,
    modalities: Vec<String>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            section_separator: DEFAULT_SECTION_SEPARATOR.to_string(),
            value_separator: DEFAULT_VALUE_SEPARATOR.to_string(),
            modalities: MODALITIES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl CodecOptions {
    /// Create options with custom separators and the default vocabulary.
    ///
    /// Separators must be non-empty and different from each other.
    pub fn new(section_separator: &str, value_separator: &str) -> Result<Self> {
        validate_separator("section_separator", section_separator)?;
        validate_separator("value_separator", value_separator)?;

        if section_separator == value_separator {
            return Err(Error::ConfigValidation {
                field: "value_separator".to_string(),
                message: format!(
                    "Must differ from the section separator (both are '{}')",
                    value_separator
                ),
            });
        }

        Ok(Self {
            section_separator: section_separator.to_string(),
            value_separator: value_separator.to_string(),
            ..Self::default()
        })
    }

    /// Extend the modality vocabulary.
    pub fn with_modalities<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for modality in extra {
            let modality = modality.into();
            if !self.modalities.contains(&modality) {
                self.modalities.push(modality);
            }
        }
        self
    }

    pub fn section_separator(&self) -> &str {
        &self.section_separator
    }

    pub fn value_separator(&self) -> &str {
        &self.value_separator
    }

    pub fn modalities(&self) -> &[String] {
        &self.modalities
    }

    pub fn is_modality(&self, token: &str) -> bool {
        self.modalities.iter().any(|m| m == token)
    }

    /// Decode a filename (or path) into its ordered key/value information.
    ///
    /// Never fails: sections without a value separator get placeholder keys,
    /// and empty sections produce empty values.
    pub fn decode(&self, filename: &str) -> FileInfo {
        let base = base_name(filename);
        let (stem, ext) = match base.find('.') {
            Some(dot) => base.split_at(dot),
            None => (base, ""),
        };

        let sections: Vec<&str> = stem.split(self.section_separator.as_str()).collect();
        let last = sections.len().saturating_sub(1);

        let mut info = FileInfo::new();
        let mut bare_count = 0;

        for (i, section) in sections.iter().enumerate() {
            match section.split_once(self.value_separator.as_str()) {
                Some((key, value)) => {
                    info.insert(key, value);
                }
                None => {
                    bare_count += 1;
                    let key = if i == last && self.is_modality(section) {
                        MODALITY_KEY.to_string()
                    } else {
                        format!("{}{}", CUSTOM_PREFIX, bare_count)
                    };
                    info.insert(key, *section);
                }
            }
        }

        info.set_ext(ext);
        info
    }

    /// Build a filename from key/value information.
    ///
    /// A missing `ext` entry means no extension. The input is not modified.
    pub fn encode(&self, info: &FileInfo) -> String {
        let sections: Vec<String> = info
            .iter()
            .filter(|(k, _)| *k != EXT_KEY)
            .map(|(k, v)| {
                if is_synthetic_key(k) {
                    v.to_string()
                } else {
                    format!("{}{}{}", k, self.value_separator, v)
                }
            })
            .collect();

        let mut name = sections.join(&self.section_separator);
        name.push_str(info.ext());
        name
    }
}

/// Decode a filename with the default separators and vocabulary.
pub fn decode(filename: &str) -> FileInfo {
    CodecOptions::default().decode(filename)
}

/// Encode file information with the default separators.
pub fn encode(info: &FileInfo) -> String {
    CodecOptions::default().encode(info)
}

fn validate_separator(field: &str, separator: &str) -> Result<()> {
    if separator.is_empty() {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Separator cannot be empty".to_string(),
        });
    }
    Ok(())
}

fn base_name(filename: &str) -> &str {
    filename
        .rsplit(|c: char| c == '/' || std::path::is_separator(c))
        .next()
        .unwrap_or(filename)
}
