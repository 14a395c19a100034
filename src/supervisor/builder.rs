use std::{
    future::Future,
    marker::PhantomData,
    sync::{atomic::AtomicBool, Arc, Mutex},
};

use crate::{
    diagnostics::{self, DiagnosticSink},
    supervisor::{
        decision::{Decider, Decision},
        hooks::{ErrorHook, FailHook},
        Supervisor, SupervisorConfig,
    },
    task::{SharedError, SupervisedTask, TaskResult},
    TaskName,
};

/// Builds a [`Supervisor`] around a task.
///
/// Every setting is optional; `SupervisorBuilder::new(task).build()` is the
/// same as [`crate::supervise`].
pub struct SupervisorBuilder<T, A> {
    task: T,
    config: SupervisorConfig,
    on_each_error: Option<Box<dyn ErrorHook>>,
    on_fail: Option<Box<dyn FailHook>>,
    sink: Option<Arc<dyn DiagnosticSink>>,
    _args: PhantomData<fn(A)>,
}

impl<T, A> SupervisorBuilder<T, A>
where
    T: SupervisedTask<A>,
{
    /// Creates a new builder with default configuration values.
    pub fn new(task: T) -> Self {
        Self {
            task,
            config: SupervisorConfig::default(),
            on_each_error: None,
            on_fail: None,
            sink: None,
            _args: PhantomData,
        }
    }

    /// Replaces the plain-data settings at once.
    pub fn with_config(mut self, config: SupervisorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the decision taken when no error hook overrides it.
    pub fn with_default_decision(mut self, decision: Decision) -> Self {
        self.config.default_decision = decision;
        self
    }

    /// Sets the maximum number of attempts. `0` means the task never runs.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub fn with_warnings_disabled(mut self) -> Self {
        self.config.disable_warnings = true;
        self
    }

    /// Sets the hook awaited after each failure.
    ///
    /// It receives a [`Decider`], the error, the task name and the 0-based
    /// attempt index. Leaving the `Decider` unused keeps the default decision.
    pub fn with_on_each_error<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Decider, SharedError, TaskName, u32) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_each_error = Some(Box::new(hook));
        self
    }

    /// Sets the hook awaited once when supervision ends without success.
    ///
    /// It receives the last error (if any), the task name and the final
    /// attempt count. An error it returns is reported by the supervisor.
    pub fn with_on_fail<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Option<SharedError>, TaskName, u32) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        self.on_fail = Some(Box::new(hook));
        self
    }

    /// Routes warnings to `sink` instead of the default one.
    pub fn with_diagnostic_sink(mut self, sink: impl DiagnosticSink) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Constructs the `Supervisor` with the configured settings.
    pub fn build(self) -> Supervisor<T, A> {
        Supervisor {
            task: self.task,
            config: self.config,
            on_each_error: self.on_each_error,
            on_fail: self.on_fail,
            sink: self.sink.unwrap_or_else(diagnostics::default_sink),
            running: AtomicBool::new(false),
            state: Mutex::default(),
            _args: PhantomData,
        }
    }
}
