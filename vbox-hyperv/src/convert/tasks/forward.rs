//! Task: Hand the wrapped artifact to the packaging stage.
//!
//! The packaging result is stored as-is; errors from the packaging stage
//! are returned unchanged.

use super::{ConvertCtx, log_task_error, task_start};
use crate::constants::packaging::PROVIDER;
use crate::convert::types::PipelineState;
use crate::errors::{ConvertError, ConvertResult};
use crate::pipeline::PipelineTask;
use async_trait::async_trait;

pub struct ForwardTask;

#[async_trait]
impl PipelineTask<ConvertCtx> for ForwardTask {
    async fn run(self: Box<Self>, ctx: ConvertCtx) -> ConvertResult<()> {
        let task_name = self.name();
        let run_id = task_start(&ctx, task_name).await;

        let (packaging, wrapped) = {
            let ctx = ctx.lock().await;
            let wrapped = ctx
                .wrapped
                .clone()
                .ok_or_else(|| ConvertError::Internal("artifact_wrap task must run first".into()))?;
            (ctx.packaging.clone(), wrapped)
        };

        let packaged = packaging
            .package(PROVIDER, wrapped)
            .await
            .inspect_err(|e| log_task_error(&run_id, task_name, e))?;

        tracing::info!(
            run_id = %run_id,
            artifact = %packaged.artifact,
            keep_input = packaged.keep_input,
            "Forwarded artifact to packaging"
        );

        let mut ctx = ctx.lock().await;
        ctx.packaged = Some(packaged);
        ctx.transition(PipelineState::Forwarded)
    }

    fn name(&self) -> &str {
        "artifact_forward"
    }
}
