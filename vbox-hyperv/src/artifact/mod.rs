//! Build artifacts exchanged between pipeline stages.
//!
//! - `Artifact` - Producer tag plus the ordered list of files it produced
//! - `validate` / `wrap` - Artifact Adapter: provenance check and staging wrap

mod adapter;

pub use adapter::{has_source_disk, validate, wrap};

use crate::errors::{ConvertError, ConvertResult};
use crate::layout::StagingLayout;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Output of one build stage, consumed by the next.
///
/// Immutable once produced: accessors only, no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    builder_id: String,
    #[serde(default)]
    id: String,
    /// Backing directory, when the artifact owns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    directory: Option<PathBuf>,
    files: Vec<PathBuf>,
}

impl Artifact {
    /// Create an artifact from a producer tag and the files it produced.
    pub fn new(builder_id: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            builder_id: builder_id.into(),
            id: String::new(),
            directory: None,
            files,
        }
    }

    /// Attach an artifact id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Mark the directory that backs this artifact.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Producer tag.
    pub fn builder_id(&self) -> &str {
        &self.builder_id
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Files in production order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Remove everything this artifact produced.
    ///
    /// A backing directory must be a staging tree and is removed whole;
    /// otherwise each file is removed. Anything already gone is ignored.
    pub fn destroy(&self) -> ConvertResult<()> {
        if let Some(dir) = &self.directory {
            if !dir.exists() {
                return Ok(());
            }
            tracing::info!(directory = %dir.display(), "Destroying artifact directory");
            return StagingLayout::new(dir).remove();
        }

        for file in &self.files {
            match std::fs::remove_file(file) {
                Ok(()) => tracing::debug!(file = %file.display(), "Removed artifact file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(ConvertError::Io(format!(
                        "failed to remove artifact file {}: {}",
                        file.display(),
                        e
                    )));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.directory {
            Some(dir) => write!(f, "VM files in directory: {}", dir.display()),
            None => write!(
                f,
                "{} artifact with {} file(s)",
                self.builder_id,
                self.files.len()
            ),
        }
    }
}
