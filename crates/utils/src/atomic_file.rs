//! Swap-while-open file replacement
//!
//! New content is written to a scratch file next to the destination and then
//! moved over it, so a reader holding the old file never sees a half-written
//! one. Scratch names are unique per call.

use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use toolbox_core::{Error, IoResultExt, Result, SwapStage};
use uuid::Uuid;

/// Suffix shared by every scratch file
pub const SCRATCH_SUFFIX: &str = ".tmp";

/// How the scratch file replaces the destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwapOrder {
    /// Delete the original, then rename the scratch file into its place.
    /// A crash between the two steps leaves the destination absent.
    #[default]
    DeleteThenRename,
    /// Rename the scratch file over the original in one step
    RenameOver,
}

impl std::str::FromStr for SwapOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "delete-then-rename" => Ok(SwapOrder::DeleteThenRename),
            "rename-over" => Ok(SwapOrder::RenameOver),
            other => Err(Error::configuration(format!(
                "unknown swap order '{other}' (expected 'delete-then-rename' or 'rename-over')"
            ))),
        }
    }
}

/// Directory the destination lives in; `.` for bare file names
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Longest slice of the destination's name (in bytes) embedded in a scratch
/// name. Leaves room for the prefix, uuid and suffix under a 255-byte
/// `NAME_MAX`.
pub const MAX_EMBEDDED_NAME: usize = 128;

/// Longest prefix of `name` that fits in `max` bytes without splitting a char
fn truncate_on_char_boundary(name: &str, max: usize) -> &str {
    if name.len() <= max {
        return name;
    }
    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Compute a scratch path in the same directory as `destination`.
///
/// Same directory keeps the final rename on one volume. Long destination
/// names are shortened so the scratch name stays a legal file name.
pub fn scratch_path(destination: &Path, prefix: &str) -> Result<PathBuf> {
    let file_name = destination.file_name().ok_or_else(|| {
        Error::configuration(format!(
            "Invalid file path: '{}' has no file name",
            destination.display()
        ))
    })?;

    let file_name = file_name.to_string_lossy();
    let temp_name = format!(
        ".{prefix}{}.{}{SCRATCH_SUFFIX}",
        truncate_on_char_boundary(&file_name, MAX_EMBEDDED_NAME),
        Uuid::new_v4().simple()
    );
    Ok(parent_dir(destination).join(temp_name))
}

/// Create a fresh scratch file for `destination`, failing rather than reusing
/// an existing one.
pub fn create_scratch(destination: &Path, prefix: &str) -> Result<(File, PathBuf)> {
    let temp_path = scratch_path(destination, prefix)?;
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .fs_context(&temp_path, "create temporary file")?;

    tracing::trace!(temp = %temp_path.display(), "created scratch file");
    Ok((file, temp_path))
}

/// Whether `name` looks like a scratch file created by [`scratch_path`]
#[must_use]
pub fn is_scratch_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(SCRATCH_SUFFIX)
}

/// Move a fully written scratch file onto `destination`.
///
/// On failure the scratch file is left where it is and reported through
/// [`Error::SwapInterrupted`]; once the original is deleted it holds the only
/// copy of the data.
pub fn swap_into_place(temp_path: &Path, destination: &Path, order: SwapOrder) -> Result<()> {
    if order == SwapOrder::DeleteThenRename {
        match fs::remove_file(destination) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(Error::swap_interrupted(
                    destination,
                    temp_path,
                    SwapStage::RemoveOriginal,
                    e,
                ))
            }
        }
    }

    fs::rename(temp_path, destination)
        .map_err(|e| Error::swap_interrupted(destination, temp_path, SwapStage::Rename, e))?;

    tracing::debug!(
        temp = %temp_path.display(),
        destination = %destination.display(),
        ?order,
        "swapped file into place"
    );
    Ok(())
}

/// Best-effort removal of a scratch file nothing depends on yet
pub fn discard_scratch(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path) {
        tracing::debug!(temp = %temp_path.display(), error = %e, "could not remove scratch file");
    }
}
