use std::future::Future;

use async_trait::async_trait;

use crate::{
    supervisor::decision::Decider,
    task::{SharedError, TaskResult},
    TaskName,
};

/// Dyn-compatible form of the per-error hook. Not user-facing.
#[async_trait]
pub(crate) trait ErrorHook: Send + Sync + 'static {
    async fn on_error(
        &self,
        decider: Decider,
        error: SharedError,
        task_name: TaskName,
        attempt: u32,
    );
}

#[async_trait]
impl<F, Fut> ErrorHook for F
where
    F: Fn(Decider, SharedError, TaskName, u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn on_error(
        &self,
        decider: Decider,
        error: SharedError,
        task_name: TaskName,
        attempt: u32,
    ) {
        (self)(decider, error, task_name, attempt).await
    }
}

/// Dyn-compatible form of the fail hook. Not user-facing.
#[async_trait]
pub(crate) trait FailHook: Send + Sync + 'static {
    async fn on_fail(
        &self,
        last_error: Option<SharedError>,
        task_name: TaskName,
        attempts: u32,
    ) -> TaskResult;
}

#[async_trait]
impl<F, Fut> FailHook for F
where
    F: Fn(Option<SharedError>, TaskName, u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TaskResult> + Send + 'static,
{
    async fn on_fail(
        &self,
        last_error: Option<SharedError>,
        task_name: TaskName,
        attempts: u32,
    ) -> TaskResult {
        (self)(last_error, task_name, attempts).await
    }
}
