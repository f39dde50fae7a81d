//! Pipeline tasks for a conversion run.
//!
//! One task per state transition. Each task pulls its inputs out of the
//! shared context, releases the lock, does its work, then stores the
//! output and advances the state.

mod convert_disk;
mod descriptor;
mod forward;
mod locate;
mod staging;
mod validate;
mod wrap;

pub use convert_disk::ConvertDiskTask;
pub use descriptor::DescriptorTask;
pub use forward::ForwardTask;
pub use locate::LocateDiskTask;
pub use staging::StagingTask;
pub use validate::ValidateTask;
pub use wrap::WrapTask;

use super::types::ConvertPipelineContext;
use crate::errors::ConvertError;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type ConvertCtx = Arc<Mutex<ConvertPipelineContext>>;

/// Log the task start and return the run id for later log lines.
pub(super) async fn task_start(ctx: &ConvertCtx, task_name: &str) -> String {
    let ctx = ctx.lock().await;
    tracing::debug!(run_id = %ctx.run_id, task = task_name, state = %ctx.state(), "Task started");
    ctx.run_id.clone()
}

pub(super) fn log_task_error(run_id: &str, task_name: &str, err: &ConvertError) {
    tracing::error!(run_id, task = task_name, error = %err, "Task failed");
}
