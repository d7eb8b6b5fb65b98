//! Mirrors paths from the input root onto the output root.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TransformError;

/// Suffix of the hidden sibling an output is encoded into before it is renamed.
const STAGING_SUFFIX: &str = ".part";

/// `output_root` joined with the part of `input_path` below `input_root`.
pub fn map_output_path(
    input_path: &Path,
    input_root: &Path,
    output_root: &Path,
) -> Result<PathBuf, TransformError> {
    let relative =
        input_path
            .strip_prefix(input_root)
            .map_err(|_| TransformError::OutsideInputRoot {
                path: input_path.to_path_buf(),
                root: input_root.to_path_buf(),
            })?;
    Ok(output_root.join(relative))
}

/// Creates every missing directory above `output_path`.
pub fn ensure_parent_dir(output_path: &Path) -> Result<(), TransformError> {
    let Some(dir) = output_path.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(());
    };
    fs::create_dir_all(dir).map_err(|source| TransformError::DirectoryCreate {
        dir: dir.to_path_buf(),
        source,
    })
}

/// Hidden sibling of `output_path` used while the encoded bytes are written.
///
/// `out/img.dcm` stages as `out/.img.dcm.part`.
pub fn staging_path(output_path: &Path) -> PathBuf {
    let name = output_path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    output_path.with_file_name(format!(".{name}{STAGING_SUFFIX}"))
}

/// True for paths produced by [`staging_path`].
pub fn is_staging_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.') && name.ends_with(STAGING_SUFFIX))
}
