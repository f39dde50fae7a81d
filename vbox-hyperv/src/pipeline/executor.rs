//! Plan construction and execution.

use super::metrics::{PipelineMetrics, StageMetrics, TaskMetrics};
use super::{BoxedTask, Stage};
use crate::errors::ConvertResult;
use std::time::Instant;

/// Ordered stages for one run. Consumed by execution.
pub struct ExecutionPlan<Ctx> {
    stages: Vec<Stage<BoxedTask<Ctx>>>,
}

impl<Ctx> ExecutionPlan<Ctx> {
    pub fn new(stages: Vec<Stage<BoxedTask<Ctx>>>) -> Self {
        Self { stages }
    }

    /// Task names in execution order.
    pub fn task_names(&self) -> Vec<&str> {
        self.stages
            .iter()
            .flat_map(|stage| stage.tasks.iter().map(|task| task.name()))
            .collect()
    }
}

pub struct PipelineExecutor;

impl PipelineExecutor {
    /// Run every task of `plan` in order against `ctx`.
    ///
    /// Returns timings for a complete run, or the first task error as-is.
    pub async fn execute<Ctx: Clone>(
        plan: ExecutionPlan<Ctx>,
        ctx: Ctx,
    ) -> ConvertResult<PipelineMetrics> {
        let started = Instant::now();
        let mut stages = Vec::with_capacity(plan.stages.len());

        for (index, stage) in plan.stages.into_iter().enumerate() {
            stages.push(run_stage(index, stage, &ctx).await?);
        }

        Ok(PipelineMetrics {
            total_duration_ms: started.elapsed().as_millis(),
            stages,
        })
    }
}

async fn run_stage<Ctx: Clone>(
    index: usize,
    stage: Stage<BoxedTask<Ctx>>,
    ctx: &Ctx,
) -> ConvertResult<StageMetrics> {
    let started = Instant::now();
    let mut tasks = Vec::with_capacity(stage.tasks.len());

    tracing::trace!(stage = stage.name, index, "Stage started");

    for task in stage.tasks {
        let name = task.name().to_string();
        let task_started = Instant::now();
        if let Err(e) = task.run(ctx.clone()).await {
            tracing::debug!(stage = stage.name, task = %name, "Stage aborted");
            return Err(e);
        }
        tasks.push(TaskMetrics {
            name,
            duration_ms: task_started.elapsed().as_millis(),
        });
    }

    Ok(StageMetrics {
        index,
        name: stage.name.to_string(),
        duration_ms: started.elapsed().as_millis(),
        tasks,
    })
}
