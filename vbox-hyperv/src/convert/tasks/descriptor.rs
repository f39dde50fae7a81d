//! Task: Machine descriptor synthesis.

use super::{ConvertCtx, log_task_error, task_start};
use crate::convert::types::{DescriptorInput, PipelineState};
use crate::descriptor::render_vm_xml;
use crate::errors::{ConvertError, ConvertResult};
use crate::pipeline::PipelineTask;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct DescriptorTask;

#[async_trait]
impl PipelineTask<ConvertCtx> for DescriptorTask {
    async fn run(self: Box<Self>, ctx: ConvertCtx) -> ConvertResult<()> {
        let task_name = self.name();
        let run_id = task_start(&ctx, task_name).await;

        let mut ctx = ctx.lock().await;
        let disk_path = ctx
            .disk_output
            .clone()
            .ok_or_else(|| ConvertError::Internal("disk_convert task must run first".into()))?;

        let path = run_descriptor(DescriptorInput {
            layout: ctx.layout()?,
            vm_name: ctx.config.vm_name(),
            disk_path: &disk_path,
        })
        .inspect_err(|e| log_task_error(&run_id, task_name, e))?;

        tracing::debug!(run_id = %run_id, path = %path.display(), "Wrote machine descriptor");

        ctx.descriptor_output = Some(path);
        ctx.transition(PipelineState::DescriptorWritten)
    }

    fn name(&self) -> &str {
        "descriptor_write"
    }
}

fn run_descriptor(input: DescriptorInput<'_>) -> ConvertResult<PathBuf> {
    let contents = render_vm_xml(input.vm_name, &input.disk_path.to_string_lossy());
    input.layout.write_descriptor(&contents)
}
