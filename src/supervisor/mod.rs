pub(crate) mod builder;
pub(crate) mod decision;
pub(crate) mod hooks;

use std::{
    future::Future,
    marker::PhantomData,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use tokio_util::sync::CancellationToken;

use crate::{
    diagnostics::{DiagnosticSink, Warning},
    supervisor::{
        decision::{Decider, Decision},
        hooks::{ErrorHook, FailHook},
    },
    task::{SharedError, SupervisedTask, TaskError, TaskResult},
    TaskName,
};

/// Plain-data part of a supervisor's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Decision applied when the error hook is absent or does not decide.
    pub default_decision: Decision,
    /// Suppresses every [`Warning`].
    pub disable_warnings: bool,
    /// Upper bound on attempts over the supervisor's whole lifetime.
    pub max_attempts: u32,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            default_decision: Decision::Restart,
            disable_warnings: false,
            max_attempts: 3,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("task {task_name} is already being supervised by another call")]
    AlreadyRunning { task_name: TaskName },
    #[error("fail handler of task {task_name} returned an error: {source}")]
    FailHandler {
        task_name: TaskName,
        source: SharedError,
    },
    #[error("supervision of task {task_name} was cancelled")]
    Cancelled { task_name: TaskName },
}

/// How a supervised call ended.
///
/// Task failures are never surfaced as errors: a call that ran out of attempts
/// still completes with `Ok`.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// An attempt succeeded.
    Succeeded { attempts: u32 },
    /// The attempt budget was used up.
    Exhausted {
        attempts: u32,
        last_error: Option<SharedError>,
    },
    /// The error hook decided [`Decision::Fail`].
    Stopped {
        attempts: u32,
        last_error: SharedError,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped { .. })
    }

    /// Value of the attempt counter when the call ended.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Succeeded { attempts }
            | Self::Exhausted { attempts, .. }
            | Self::Stopped { attempts, .. } => *attempts,
        }
    }

    pub fn last_error(&self) -> Option<&SharedError> {
        match self {
            Self::Succeeded { .. } => None,
            Self::Exhausted { last_error, .. } => last_error.as_ref(),
            Self::Stopped { last_error, .. } => Some(last_error),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Succeeded { attempts } => write!(f, "succeeded after {attempts} restarts"),
            Self::Exhausted { attempts, .. } => write!(f, "exhausted after {attempts} attempts"),
            Self::Stopped { attempts, .. } => write!(f, "stopped after {attempts} attempts"),
        }
    }
}

#[derive(Debug, Default)]
struct SupervisionState {
    attempts: u32,
    last_error: Option<SharedError>,
}

/// Marks a call as in flight for as long as it lives.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(running: &'a AtomicBool) -> Option<Self> {
        running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(running))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Wraps a task and re-runs it when it fails.
///
/// The attempt counter and the last error belong to the supervisor, not to a
/// single call: they are shared by every call and never reset. Only one call
/// may be in flight at a time; a concurrent call fails with
/// [`SupervisorError::AlreadyRunning`].
///
/// A `Supervisor<T, A>` is itself a [`SupervisedTask<A>`], so it can be used
/// anywhere the inner task could.
pub struct Supervisor<T, A> {
    task: T,
    config: SupervisorConfig,
    on_each_error: Option<Box<dyn ErrorHook>>,
    on_fail: Option<Box<dyn FailHook>>,
    sink: Arc<dyn DiagnosticSink>,
    running: AtomicBool,
    state: Mutex<SupervisionState>,
    _args: PhantomData<fn(A)>,
}

impl<T, A> Supervisor<T, A>
where
    T: SupervisedTask<A>,
    A: Clone + Send,
{
    /// Runs the task until it succeeds, the error hook decides to stop, or
    /// the attempt budget is used up.
    pub async fn call(&self, args: A) -> Result<Outcome, SupervisorError> {
        let Some(_running) = RunGuard::acquire(&self.running) else {
            return Err(SupervisorError::AlreadyRunning {
                task_name: self.name().to_string(),
            });
        };
        let task_name: TaskName = self.name().to_string();
        let mut attempts = self.state().attempts;
        let mut stopped_by: Option<SharedError> = None;

        while attempts < self.config.max_attempts {
            #[cfg(feature = "with_tracing")]
            tracing::debug!(task = %task_name, attempt = attempts, "starting attempt");

            let error: SharedError = match self.task.run(args.clone()).await {
                Ok(()) => {
                    #[cfg(feature = "with_tracing")]
                    tracing::debug!(task = %task_name, attempt = attempts, "attempt succeeded");
                    return Ok(Outcome::Succeeded { attempts });
                }
                Err(error) => Arc::from(error),
            };
            self.state().last_error = Some(error.clone());

            let decision = self.decide(error.clone(), &task_name, attempts).await;

            #[cfg(feature = "with_tracing")]
            tracing::debug!(task = %task_name, attempt = attempts, %decision, error = %error, "attempt failed");

            if decision == Decision::Fail {
                stopped_by = Some(error);
                break;
            }
            attempts += 1;
            self.state().attempts = attempts;
            self.warn(Warning::Restarting {
                task_name: task_name.clone(),
            });
        }

        let last_error = self.state().last_error.clone();
        self.handle_failure(last_error.clone(), task_name, attempts)
            .await?;

        Ok(match stopped_by {
            Some(last_error) => Outcome::Stopped {
                attempts,
                last_error,
            },
            None => Outcome::Exhausted {
                attempts,
                last_error,
            },
        })
    }

    /// Like [`Supervisor::call`], but gives up as soon as `token` is cancelled.
    ///
    /// The in-flight attempt or hook is dropped at its next suspension point.
    pub async fn call_until_cancelled(
        &self,
        args: A,
        token: &CancellationToken,
    ) -> Result<Outcome, SupervisorError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(SupervisorError::Cancelled {
                task_name: self.name().to_string(),
            }),
            result = self.call(args) => result,
        }
    }

    async fn decide(&self, error: SharedError, task_name: &str, attempt: u32) -> Decision {
        let Some(on_each_error) = &self.on_each_error else {
            return self.config.default_decision;
        };
        let (decider, pending) = Decider::new();
        on_each_error
            .on_error(decider, error, task_name.to_string(), attempt)
            .await;
        pending.resolve_or(self.config.default_decision)
    }

    async fn handle_failure(
        &self,
        last_error: Option<SharedError>,
        task_name: TaskName,
        attempts: u32,
    ) -> Result<(), SupervisorError> {
        let Some(on_fail) = &self.on_fail else {
            self.warn(Warning::FailedWithoutHandler {
                task_name,
                attempts,
                max_attempts: self.config.max_attempts,
            });
            return Ok(());
        };
        on_fail
            .on_fail(last_error, task_name.clone(), attempts)
            .await
            .map_err(|source| SupervisorError::FailHandler {
                task_name,
                source: Arc::from(source),
            })
    }
}

impl<T, A> Supervisor<T, A> {
    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }

    /// Current attempt counter.
    ///
    /// Never blocks on an in-flight call, so hooks may read it on their own
    /// supervisor.
    pub fn attempts(&self) -> u32 {
        self.state().attempts
    }

    /// Most recent task failure.
    pub fn last_error(&self) -> Option<SharedError> {
        self.state().last_error.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// The lock is only taken for plain reads and writes, never across an await.
    fn state(&self) -> MutexGuard<'_, SupervisionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn warn(&self, warning: Warning) {
        if !self.config.disable_warnings {
            self.sink.warn(&warning);
        }
    }
}

impl<T, A> Supervisor<T, A>
where
    T: SupervisedTask<A>,
{
    pub fn name(&self) -> &str {
        self.task.name()
    }
}

impl<T, A> SupervisedTask<A> for Supervisor<T, A>
where
    T: SupervisedTask<A>,
    A: Clone + Send + 'static,
{
    fn name(&self) -> &str {
        self.task.name()
    }

    fn run(&self, args: A) -> impl Future<Output = TaskResult> + Send {
        async move {
            self.call(args)
                .await
                .map(|_| ())
                .map_err(TaskError::from)
        }
    }
}

impl<T, A> std::fmt::Debug for Supervisor<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("config", &self.config)
            .field("on_each_error", &self.on_each_error.is_some())
            .field("on_fail", &self.on_fail.is_some())
            .finish_non_exhaustive()
    }
}
