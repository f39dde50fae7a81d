//! Artifact Adapter: provenance validation and staging directory wrapping.

use super::Artifact;
use crate::constants::{artifact::VM_ID, producers};
use crate::disk::DiskFormat;
use crate::errors::{ConvertError, ConvertResult};
use std::path::Path;
use walkdir::WalkDir;

/// Check that `artifact` was produced by `expected_producer`.
pub fn validate(artifact: &Artifact, expected_producer: &str) -> ConvertResult<()> {
    if artifact.builder_id() != expected_producer {
        return Err(ConvertError::UnsupportedArtifact {
            actual: artifact.builder_id().to_string(),
            expected: expected_producer.to_string(),
        });
    }
    Ok(())
}

/// Whether the artifact lists at least one file in `format`.
pub fn has_source_disk(artifact: &Artifact, format: DiskFormat) -> bool {
    artifact.files().iter().any(|path| format.matches(path))
}

/// Wrap a populated staging directory as a new artifact.
///
/// Files are enumerated recursively, sorted by file name within each
/// directory so the listing is stable across runs.
pub fn wrap(staging_root: &Path) -> ConvertResult<Artifact> {
    let mut files = Vec::new();

    for entry in WalkDir::new(staging_root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            ConvertError::Io(format!(
                "failed to walk staging directory {}: {}",
                staging_root.display(),
                e
            ))
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    tracing::debug!(
        staging_root = %staging_root.display(),
        file_count = files.len(),
        "Wrapped staging directory"
    );

    Ok(Artifact::new(producers::HYPERV, files)
        .with_id(VM_ID)
        .with_directory(staging_root))
}
