//! Task: Source disk lookup.

use super::{ConvertCtx, log_task_error, task_start};
use crate::convert::types::PipelineState;
use crate::disk::find_source_disk;
use crate::errors::ConvertResult;
use crate::pipeline::PipelineTask;
use async_trait::async_trait;

pub struct LocateDiskTask;

#[async_trait]
impl PipelineTask<ConvertCtx> for LocateDiskTask {
    async fn run(self: Box<Self>, ctx: ConvertCtx) -> ConvertResult<()> {
        let task_name = self.name();
        let run_id = task_start(&ctx, task_name).await;

        let mut ctx = ctx.lock().await;
        let source = find_source_disk(&ctx.artifact)
            .inspect_err(|e| log_task_error(&run_id, task_name, e))?;

        tracing::debug!(run_id = %run_id, path = %source.display(), "Found source disk");

        ctx.source_disk = Some(source);
        ctx.transition(PipelineState::DiskLocated)
    }

    fn name(&self) -> &str {
        "disk_locate"
    }
}
