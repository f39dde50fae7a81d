//! Task: Disk format conversion.
//!
//! Hands the source disk to the configured converter and waits for the
//! target-format disk to land in the staging tree.

use super::{ConvertCtx, log_task_error, task_start};
use crate::convert::types::{ConvertDiskInput, PipelineState};
use crate::disk::{ConversionRequest, DiskFormat};
use crate::errors::{ConvertError, ConvertResult};
use crate::pipeline::PipelineTask;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct ConvertDiskTask;

#[async_trait]
impl PipelineTask<ConvertCtx> for ConvertDiskTask {
    async fn run(self: Box<Self>, ctx: ConvertCtx) -> ConvertResult<()> {
        let task_name = self.name();
        let run_id = task_start(&ctx, task_name).await;

        let (converter, layout, source, disk_name) = {
            let ctx = ctx.lock().await;
            let source = ctx
                .source_disk
                .clone()
                .ok_or_else(|| ConvertError::Internal("disk_locate task must run first".into()))?;
            (
                ctx.converter.clone(),
                ctx.layout()?.clone(),
                source,
                ctx.config.disk_name().to_string(),
            )
        };

        let destination = run_convert_disk(ConvertDiskInput {
            converter: converter.as_ref(),
            layout: &layout,
            source,
            disk_name: &disk_name,
        })
        .await
        .inspect_err(|e| log_task_error(&run_id, task_name, e))?;

        tracing::info!(
            run_id = %run_id,
            converter = converter.name(),
            path = %destination.display(),
            "Converted disk"
        );

        let mut ctx = ctx.lock().await;
        ctx.disk_output = Some(destination);
        ctx.transition(PipelineState::DiskConverted)
    }

    fn name(&self) -> &str {
        "disk_convert"
    }
}

async fn run_convert_disk(input: ConvertDiskInput<'_>) -> ConvertResult<PathBuf> {
    let target = input.layout.disk_path(input.disk_name);
    let destination = std::path::absolute(&target).map_err(|e| {
        ConvertError::Io(format!(
            "failed to get absolute path to {}: {}",
            target.display(),
            e
        ))
    })?;

    let request = ConversionRequest {
        source: input.source,
        destination,
        format: DiskFormat::TARGET,
    };
    input.converter.convert(&request).await?;

    Ok(request.destination)
}
