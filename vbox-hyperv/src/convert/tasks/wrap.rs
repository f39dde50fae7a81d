//! Task: Wrap the staging directory as the output artifact.

use super::{ConvertCtx, log_task_error, task_start};
use crate::artifact;
use crate::convert::types::PipelineState;
use crate::errors::ConvertResult;
use crate::pipeline::PipelineTask;
use async_trait::async_trait;

pub struct WrapTask;

#[async_trait]
impl PipelineTask<ConvertCtx> for WrapTask {
    async fn run(self: Box<Self>, ctx: ConvertCtx) -> ConvertResult<()> {
        let task_name = self.name();
        let run_id = task_start(&ctx, task_name).await;

        let mut ctx = ctx.lock().await;
        let wrapped = artifact::wrap(ctx.layout()?.root())
            .inspect_err(|e| log_task_error(&run_id, task_name, e))?;

        ctx.wrapped = Some(wrapped);
        ctx.transition(PipelineState::ArtifactWrapped)
    }

    fn name(&self) -> &str {
        "artifact_wrap"
    }
}
