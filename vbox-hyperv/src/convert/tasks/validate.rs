//! Task: Input artifact validation.
//!
//! Checks the producer tag and that the artifact carries a source disk,
//! before anything touches the filesystem.

use super::{ConvertCtx, log_task_error, task_start};
use crate::artifact::{self, Artifact};
use crate::constants::producers;
use crate::convert::types::PipelineState;
use crate::disk::{DiskFormat, missing_disk};
use crate::errors::ConvertResult;
use crate::pipeline::PipelineTask;
use async_trait::async_trait;

pub struct ValidateTask;

#[async_trait]
impl PipelineTask<ConvertCtx> for ValidateTask {
    async fn run(self: Box<Self>, ctx: ConvertCtx) -> ConvertResult<()> {
        let task_name = self.name();
        let run_id = task_start(&ctx, task_name).await;

        let mut ctx = ctx.lock().await;
        ctx.transition(PipelineState::Validating)?;

        run_validate(&ctx.artifact).inspect_err(|e| log_task_error(&run_id, task_name, e))
    }

    fn name(&self) -> &str {
        "artifact_validate"
    }
}

fn run_validate(input: &Artifact) -> ConvertResult<()> {
    artifact::validate(input, producers::VIRTUALBOX)?;

    if !artifact::has_source_disk(input, DiskFormat::SOURCE) {
        return Err(missing_disk(DiskFormat::SOURCE));
    }

    Ok(())
}
