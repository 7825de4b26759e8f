//! Filesystem utilities.
//!
//! Snapshots, per-track dumps and exported documents are written through a
//! sibling temp file and swapped into place, so a crash mid-write never leaves
//! a truncated file behind.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{CollectError, CollectResult};

/// Default JSON indentation width for exported documents.
pub const DEFAULT_JSON_INDENT: usize = 4;

/// Write bytes to `path` using an atomic replace pattern.
///
/// Implementation notes:
/// - Write to a sibling temporary file.
/// - Flush and sync the temp file.
/// - Swap into place by renaming.
/// - If the destination exists, it is first moved aside as a `.bak` file, then removed.
pub fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> CollectResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = sibling_with_suffix(path, "tmp");
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    atomic_replace(path, &tmp_path)?;
    Ok(())
}

/// Serializes `value` as JSON indented by `indent` spaces.
///
/// Serialization failures are classified through [`CollectError::from_export`],
/// so numeric encoding rejections surface as `UnencodableValue`.
pub fn to_json_indented<T: Serialize>(value: &T, indent: usize) -> CollectResult<Vec<u8>> {
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut bytes = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    value
        .serialize(&mut serializer)
        .map_err(CollectError::from_export)?;
    Ok(bytes)
}

/// Write a JSON file atomically with the given indentation.
pub fn atomic_write_json_indented<T: Serialize>(
    path: &Path,
    value: &T,
    indent: usize,
) -> CollectResult<()> {
    let bytes = to_json_indented(value, indent)?;
    atomic_write_bytes(path, &bytes)
}

/// `path` with `suffix` appended to its file name (`doc.json` -> `doc.json.tmp`).
fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

/// Moves `staged` onto `dest`, parking an existing `dest` as `.bak` until
/// the move succeeds.
fn atomic_replace(dest: &Path, staged: &Path) -> CollectResult<()> {
    if !dest.exists() {
        std::fs::rename(staged, dest)?;
        return Ok(());
    }

    let parked = sibling_with_suffix(dest, "bak");
    let _ = std::fs::remove_file(&parked);
    std::fs::rename(dest, &parked)?;

    if let Err(e) = std::fs::rename(staged, dest) {
        let _ = std::fs::rename(&parked, dest);
        let _ = std::fs::remove_file(staged);
        return Err(CollectError::IoError(e));
    }
    let _ = std::fs::remove_file(&parked);
    Ok(())
}
