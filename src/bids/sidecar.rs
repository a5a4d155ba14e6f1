//! JSON sidecar reading and writing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};

use crate::bids::filename::CodecOptions;
use crate::error::{Error, Result};

/// JSON object stored next to an image.
pub type Sidecar = Map<String, Value>;

/// Path of the JSON sidecar belonging to an image file.
///
/// `func/sub-01_task-a_bold.nii.gz` becomes `func/sub-01_task-a_bold.json`.
pub fn sidecar_path(image: &Path, options: &CodecOptions) -> Result<PathBuf> {
    let name = image
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidFilename(image.display().to_string()))?;

    let mut info = options.decode(name);
    info.set_ext(".json");

    Ok(image.with_file_name(options.encode(&info)))
}

/// Read a sidecar. The file must hold a JSON object.
pub fn read_sidecar(path: &Path) -> Result<Sidecar> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::Sidecar {
            path: path.to_path_buf(),
            message: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

/// Write a sidecar with four-space indentation, preserving key order.
pub fn write_sidecar(path: &Path, sidecar: &Sidecar) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    sidecar.serialize(&mut ser)?;
    buf.push(b'\n');

    fs::write(path, buf)?;
    Ok(())
}

/// Read a sidecar, let `edit` change it, and write it back if `edit` reports a change.
///
/// Returns whether the file was rewritten.
pub fn update_sidecar<F>(path: &Path, edit: F) -> Result<bool>
where
    F: FnOnce(&mut Sidecar) -> bool,
{
    let mut sidecar = read_sidecar(path)?;

    if !edit(&mut sidecar) {
        tracing::debug!("Sidecar unchanged: {}", path.display());
        return Ok(false);
    }

    write_sidecar(path, &sidecar)?;
    tracing::debug!("Sidecar updated: {}", path.display());
    Ok(true)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
