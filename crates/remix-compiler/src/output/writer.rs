//! Atomic writes of bundle output.
//!
//! Files are first written next to their targets with a `.tmp` suffix and only
//! renamed into place once every file was written, so a failed write leaves the
//! previous build intact. Every output path must stay inside the target directory.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tracing::warn;

use crate::engine::BundleOutput;
use crate::{Error, Result};

/// Writes every chunk and asset of `output` below `dir`, replacing existing files.
///
/// Returns the absolute paths written, in output order.
pub fn write_output(output: &BundleOutput, dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = normalize_dir(dir)?;
    fs::create_dir_all(&dir).map_err(|e| {
        Error::WriteFailure(format!(
            "Failed to create output directory '{}': {e}",
            dir.display()
        ))
    })?;

    let operations = output
        .files()
        .map(|(file_name, content)| Ok((validate_output_path(&dir, file_name)?, content)))
        .collect::<Result<Vec<_>>>()?;

    write_files_atomic(&operations)?;
    Ok(operations.into_iter().map(|(path, _)| path).collect())
}

/// Cleans `dir` and makes it absolute.
pub(crate) fn normalize_dir(dir: &Path) -> Result<PathBuf> {
    let cleaned = dir.clean();
    if cleaned.is_absolute() {
        return Ok(cleaned);
    }
    let cwd = std::env::current_dir()
        .map_err(|e| Error::InvalidOutputPath(format!("Failed to get current directory: {e}")))?;
    Ok(cwd.join(cleaned).clean())
}

/// Joins `file_name` onto `base_dir`, rejecting names that escape it.
pub(crate) fn validate_output_path(base_dir: &Path, file_name: &str) -> Result<PathBuf> {
    if file_name.contains('\0') {
        return Err(Error::InvalidOutputPath(format!(
            "File name contains a null byte: {file_name:?}"
        )));
    }

    let full_path = base_dir.join(Path::new(file_name).clean()).clean();
    if !full_path.starts_with(base_dir) || full_path == base_dir {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{file_name}' escapes output directory '{}' (resolved to '{}')",
            base_dir.display(),
            full_path.display()
        )));
    }
    Ok(full_path)
}

fn temp_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(operations.len());

    for (target, content) in operations {
        if let Some(parent) = target.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                cleanup(&staged);
                return Err(Error::WriteFailure(format!(
                    "Failed to create directory '{}': {e}",
                    parent.display()
                )));
            }
        }

        let temp = temp_path(target);
        if let Err(e) = fs::write(&temp, content) {
            cleanup(&staged);
            return Err(Error::WriteFailure(format!(
                "Failed to write temporary file '{}': {e}",
                temp.display()
            )));
        }
        staged.push((temp, target.as_path()));
    }

    for (temp, target) in &staged {
        if let Err(e) = fs::rename(temp, target) {
            cleanup(&staged);
            return Err(Error::WriteFailure(format!(
                "Failed to rename '{}' to '{}': {e}",
                temp.display(),
                target.display()
            )));
        }
    }
    Ok(())
}

/// Best-effort removal of staged temp files; already renamed ones are gone.
fn cleanup(staged: &[(PathBuf, &Path)]) {
    for (temp, _) in staged {
        if temp.exists() {
            if let Err(e) = fs::remove_file(temp) {
                warn!(path = %temp.display(), error = %e, "failed to remove temporary file");
            }
        }
    }
}
