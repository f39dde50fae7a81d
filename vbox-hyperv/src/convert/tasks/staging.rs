//! Task: Staging directory creation.

use super::{ConvertCtx, log_task_error, task_start};
use crate::convert::types::{PipelineState, StagingOutput};
use crate::errors::ConvertResult;
use crate::layout::StagingLayout;
use crate::pipeline::PipelineTask;
use async_trait::async_trait;
use std::path::Path;

pub struct StagingTask;

#[async_trait]
impl PipelineTask<ConvertCtx> for StagingTask {
    async fn run(self: Box<Self>, ctx: ConvertCtx) -> ConvertResult<()> {
        let task_name = self.name();
        let run_id = task_start(&ctx, task_name).await;

        let root = {
            let ctx = ctx.lock().await;
            ctx.config.staging_directory().to_path_buf()
        };

        let output = run_staging(&root).inspect_err(|e| log_task_error(&run_id, task_name, e))?;

        tracing::info!(
            run_id = %run_id,
            staging_root = %root.display(),
            disks_dir = %output.prepared.disks_dir.display(),
            "Created staging directory"
        );

        let mut ctx = ctx.lock().await;
        ctx.staging_output = Some(output);
        ctx.transition(PipelineState::StagingPrepared)
    }

    fn name(&self) -> &str {
        "staging_prepare"
    }
}

fn run_staging(root: &Path) -> ConvertResult<StagingOutput> {
    let layout = StagingLayout::new(root);
    let prepared = layout.prepare()?;
    Ok(StagingOutput { layout, prepared })
}
