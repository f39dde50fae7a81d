//! Disk Locator: find the source disk inside an artifact.

use super::DiskFormat;
use crate::artifact::Artifact;
use crate::errors::{ConvertError, ConvertResult};
use std::path::PathBuf;

/// Find the first file in `artifact` with the source disk extension.
///
/// Only the first match in list order is returned. Further matches are
/// ignored without error.
pub fn find_source_disk(artifact: &Artifact) -> ConvertResult<PathBuf> {
    let format = DiskFormat::SOURCE;

    let Some(path) = artifact.files().iter().find(|path| format.matches(path)) else {
        return Err(missing_disk(format));
    };

    std::path::absolute(path).map_err(|e| {
        ConvertError::Io(format!(
            "failed to get absolute path to {}: {}",
            path.display(),
            e
        ))
    })
}

/// Error for an artifact that lists no file in `format`.
pub(crate) fn missing_disk(format: DiskFormat) -> ConvertError {
    ConvertError::NotFound(format!(
        "input artifact did not have a {} file",
        format.extension().to_uppercase()
    ))
}
