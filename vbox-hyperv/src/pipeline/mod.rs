//! Table-driven, strictly sequential task execution.
//!
//! ```text
//! ExecutionPlan → Stages → Tasks
//!
//! - ExecutionPlan: ordered stages, consumed by one run
//! - Stage: named group of tasks, used for timing breakdowns
//! - Task: one unit of work against a shared context
//! ```
//!
//! A task never starts before the previous one has succeeded; the first
//! error ends the run and is handed back unchanged.
//!
//! ```ignore
//! let plan = ExecutionPlan::new(vec![
//!     Stage::sequential("prepare", vec![Box::new(TaskA)]),
//!     Stage::sequential("finish", vec![Box::new(TaskB)]),
//! ]);
//! let metrics = PipelineExecutor::execute(plan, ctx).await?;
//! ```

mod executor;
mod metrics;

pub use executor::{ExecutionPlan, PipelineExecutor};
pub use metrics::{PipelineMetrics, StageMetrics, TaskMetrics};

use crate::errors::ConvertResult;
use async_trait::async_trait;

/// One unit of work in a plan.
///
/// `Ctx` is cloned into every task, so it is normally an `Arc` around
/// whatever state the tasks share.
#[async_trait]
pub trait PipelineTask<Ctx>: Send + Sync {
    async fn run(self: Box<Self>, ctx: Ctx) -> ConvertResult<()>;

    /// Stable name used in logs and metrics.
    fn name(&self) -> &str;
}

pub type BoxedTask<Ctx> = Box<dyn PipelineTask<Ctx>>;

/// Named group of tasks executed one after another.
#[derive(Debug, Clone)]
pub struct Stage<T> {
    pub name: &'static str,
    pub tasks: Vec<T>,
}

impl<T> Stage<T> {
    pub fn sequential(name: &'static str, tasks: Vec<T>) -> Self {
        Self { name, tasks }
    }
}
