//! Type definitions for the conversion pipeline.

use crate::artifact::Artifact;
use crate::config::ResolvedConfig;
use crate::disk::DiskConverter;
use crate::errors::{ConvertError, ConvertResult};
use crate::layout::{PreparedStaging, StagingLayout};
use crate::packaging::{PackagedArtifact, PackagingStage};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a conversion run currently is.
///
/// Runs move strictly forward through the list below. `Failed` can be
/// entered from any non-terminal state and is terminal, as is `Forwarded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Validating,
    StagingPrepared,
    DiskLocated,
    DiskConverted,
    DescriptorWritten,
    ArtifactWrapped,
    Forwarded,
    Failed { reason: String },
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Forwarded | PipelineState::Failed { .. })
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "idle"),
            PipelineState::Validating => write!(f, "validating"),
            PipelineState::StagingPrepared => write!(f, "staging_prepared"),
            PipelineState::DiskLocated => write!(f, "disk_located"),
            PipelineState::DiskConverted => write!(f, "disk_converted"),
            PipelineState::DescriptorWritten => write!(f, "descriptor_written"),
            PipelineState::ArtifactWrapped => write!(f, "artifact_wrapped"),
            PipelineState::Forwarded => write!(f, "forwarded"),
            PipelineState::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Output of the staging task.
#[derive(Debug, Clone)]
pub struct StagingOutput {
    pub layout: StagingLayout,
    pub prepared: PreparedStaging,
}

pub struct ConvertDiskInput<'a> {
    pub converter: &'a dyn DiskConverter,
    pub layout: &'a StagingLayout,
    pub source: PathBuf,
    pub disk_name: &'a str,
}

pub struct DescriptorInput<'a> {
    pub layout: &'a StagingLayout,
    pub vm_name: &'a str,
    pub disk_path: &'a std::path::Path,
}

/// Shared state for one conversion run.
///
/// Each task reads its prerequisites from here and stores its typed output
/// back before the next task starts.
pub struct ConvertPipelineContext {
    pub config: ResolvedConfig,
    pub artifact: Artifact,
    pub run_id: String,
    pub converter: Arc<dyn DiskConverter>,
    pub packaging: Arc<dyn PackagingStage>,

    state: PipelineState,
    transitions: Vec<PipelineState>,

    pub staging_output: Option<StagingOutput>,
    pub source_disk: Option<PathBuf>,
    pub disk_output: Option<PathBuf>,
    pub descriptor_output: Option<PathBuf>,
    pub wrapped: Option<Artifact>,
    pub packaged: Option<PackagedArtifact>,
}

impl ConvertPipelineContext {
    pub fn new(
        config: ResolvedConfig,
        artifact: Artifact,
        run_id: String,
        converter: Arc<dyn DiskConverter>,
        packaging: Arc<dyn PackagingStage>,
    ) -> Self {
        Self {
            config,
            artifact,
            run_id,
            converter,
            packaging,
            state: PipelineState::Idle,
            transitions: vec![PipelineState::Idle],
            staging_output: None,
            source_disk: None,
            disk_output: None,
            descriptor_output: None,
            wrapped: None,
            packaged: None,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Every state this run has been in, oldest first.
    pub fn transitions(&self) -> &[PipelineState] {
        &self.transitions
    }

    /// Move to `next`. Terminal states cannot be left.
    pub fn transition(&mut self, next: PipelineState) -> ConvertResult<()> {
        if self.state.is_terminal() {
            return Err(ConvertError::Internal(format!(
                "cannot move from terminal state '{}' to '{}'",
                self.state, next
            )));
        }

        tracing::debug!(
            run_id = %self.run_id,
            from = %self.state,
            to = %next,
            "State transition"
        );
        self.transitions.push(next.clone());
        self.state = next;
        Ok(())
    }

    /// Record the error that ended the run.
    pub fn fail(&mut self, err: &ConvertError) {
        let reason = err.to_string();
        if let Err(e) = self.transition(PipelineState::Failed { reason }) {
            tracing::warn!(run_id = %self.run_id, error = %e, "Run already finished");
        }
    }

    pub fn layout(&self) -> ConvertResult<&StagingLayout> {
        self.staging_output
            .as_ref()
            .map(|output| &output.layout)
            .ok_or_else(|| ConvertError::Internal("staging task must run first".into()))
    }
}
