//! Conversion orchestration.
//!
//! ## Architecture
//!
//! A run is a fixed, table-driven plan. Every task moves the run one state
//! forward; the first error ends the run in `Failed`.
//!
//! ```text
//! 1. Validate     (producer tag, source disk present)      → Validating
//! 2. Staging      (create staging tree)                    → StagingPrepared
//! 3. Disk         LocateDisk (absolute source path)        → DiskLocated
//!                 ConvertDisk (external converter)         → DiskConverted
//! 4. Descriptor   (render + write vm.xml)                  → DescriptorWritten
//! 5. Handoff      Wrap (staging tree as artifact)          → ArtifactWrapped
//!                 Forward (packaging stage)                → Forwarded
//! ```
//!
//! Nothing is rolled back on failure. Whatever was created under the
//! staging directory stays there for the operator to inspect.

mod tasks;
mod types;

pub use types::PipelineState;

use crate::artifact::Artifact;
use crate::config::ResolvedConfig;
use crate::disk::{DiskConverter, converter_for};
use crate::errors::{ConvertError, ConvertResult};
use crate::packaging::{PackagedArtifact, PackagingStage};
use crate::pipeline::{BoxedTask, ExecutionPlan, PipelineExecutor, PipelineMetrics, Stage};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use ulid::Ulid;

use tasks::{
    ConvertCtx, ConvertDiskTask, DescriptorTask, ForwardTask, LocateDiskTask, StagingTask,
    ValidateTask, WrapTask,
};
use types::ConvertPipelineContext;

// ============================================================================
// EXECUTION PLAN
// ============================================================================

fn get_execution_plan() -> ExecutionPlan<ConvertCtx> {
    let stages: Vec<Stage<BoxedTask<ConvertCtx>>> = vec![
        Stage::sequential("validate", vec![Box::new(ValidateTask)]),
        Stage::sequential("staging", vec![Box::new(StagingTask)]),
        Stage::sequential(
            "disk",
            vec![Box::new(LocateDiskTask), Box::new(ConvertDiskTask)],
        ),
        Stage::sequential("descriptor", vec![Box::new(DescriptorTask)]),
        Stage::sequential("handoff", vec![Box::new(WrapTask), Box::new(ForwardTask)]),
    ];

    ExecutionPlan::new(stages)
}

/// Outcome of one conversion run.
#[derive(Debug)]
pub struct ConversionReport {
    /// Correlation id used on every log line of the run.
    pub run_id: String,
    /// Final state: `Forwarded` or `Failed`.
    pub state: PipelineState,
    /// Every state visited, oldest first.
    pub transitions: Vec<PipelineState>,
    /// Per-task timings, only for successful runs.
    pub metrics: Option<PipelineMetrics>,
    /// Converted disk, once written.
    pub disk_path: Option<PathBuf>,
    /// Machine descriptor, once written.
    pub descriptor_path: Option<PathBuf>,
    pub result: ConvertResult<PackagedArtifact>,
}

impl ConversionReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Converts VirtualBox build output into a staged Hyper-V machine.
///
/// # Example
///
/// ```ignore
/// let config = ConvertOptions::new("demo").resolve(Utc::now())?;
/// let processor = PostProcessor::from_config(config, Arc::new(PassthroughPackaging))?;
/// let packaged = processor.post_process(artifact).await?;
/// ```
pub struct PostProcessor {
    config: ResolvedConfig,
    converter: Arc<dyn DiskConverter>,
    packaging: Arc<dyn PackagingStage>,
}

impl PostProcessor {
    pub fn new(
        config: ResolvedConfig,
        converter: Arc<dyn DiskConverter>,
        packaging: Arc<dyn PackagingStage>,
    ) -> Self {
        Self {
            config,
            converter,
            packaging,
        }
    }

    /// Build a processor using the converter the configuration names.
    pub fn from_config(
        config: ResolvedConfig,
        packaging: Arc<dyn PackagingStage>,
    ) -> ConvertResult<Self> {
        let converter = converter_for(
            config.converter(),
            config.converter_path().map(|path| path.to_path_buf()),
        )?;
        Ok(Self::new(config, converter, packaging))
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Run the whole pipeline for `artifact`.
    pub async fn run(&self, artifact: Artifact) -> ConversionReport {
        let run_id = Ulid::new().to_string();

        tracing::info!(
            run_id = %run_id,
            input = %artifact,
            staging_root = %self.config.staging_directory().display(),
            converter = self.converter.name(),
            "Starting conversion"
        );

        let ctx = ConvertPipelineContext::new(
            self.config.clone(),
            artifact,
            run_id.clone(),
            Arc::clone(&self.converter),
            Arc::clone(&self.packaging),
        );
        let ctx = Arc::new(Mutex::new(ctx));

        let outcome = PipelineExecutor::execute(get_execution_plan(), Arc::clone(&ctx)).await;

        let mut ctx = ctx.lock().await;
        let (metrics, result) = match outcome {
            Ok(metrics) => {
                let packaged = ctx.packaged.take().ok_or_else(|| {
                    ConvertError::Internal("artifact_forward task must run first".into())
                });
                (Some(metrics), packaged)
            }
            Err(e) => (None, Err(e)),
        };

        match &result {
            Ok(_) => {
                if let Some(metrics) = &metrics {
                    let _span = tracing::info_span!("conversion", run_id = %run_id).entered();
                    metrics.log_summary();
                }
            }
            Err(e) => {
                ctx.fail(e);
                tracing::error!(run_id = %run_id, error = %e, "Conversion failed");
            }
        }

        ConversionReport {
            run_id,
            state: ctx.state().clone(),
            transitions: ctx.transitions().to_vec(),
            metrics,
            disk_path: ctx.disk_output.take(),
            descriptor_path: ctx.descriptor_output.take(),
            result,
        }
    }

    /// Run the pipeline and return only the packaging result.
    pub async fn post_process(&self, artifact: Artifact) -> ConvertResult<PackagedArtifact> {
        self.run(artifact).await.result
    }
}
