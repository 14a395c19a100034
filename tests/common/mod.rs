#![allow(unused)]

use std::future::{ready, Ready};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use task_keepalive::{
    Decider, Decision, DiagnosticSink, SharedError, SupervisedTask, TaskName, TaskResult, Warning,
};

#[derive(Debug, thiserror::Error)]
#[error("task failed on purpose")]
pub struct PurposefulFailure;

/// Fails on every run.
#[derive(Clone, Default)]
pub struct FailingTask {
    pub run_count: Arc<AtomicUsize>,
}

impl FailingTask {
    pub fn runs(&self) -> usize {
        self.run_count.load(Ordering::SeqCst)
    }
}

impl SupervisedTask<()> for FailingTask {
    fn name(&self) -> &str {
        "failing_task"
    }

    async fn run(&self, _: ()) -> TaskResult {
        self.run_count.fetch_add(1, Ordering::SeqCst);
        Err(PurposefulFailure.into())
    }
}

/// Fails until its `succeed_on`-th run (1-indexed), then succeeds.
#[derive(Clone)]
pub struct FlakyTask {
    pub run_count: Arc<AtomicUsize>,
    pub succeed_on: usize,
}

impl FlakyTask {
    pub fn new(succeed_on: usize) -> Self {
        Self {
            run_count: Arc::new(AtomicUsize::new(0)),
            succeed_on,
        }
    }

    pub fn runs(&self) -> usize {
        self.run_count.load(Ordering::SeqCst)
    }
}

impl SupervisedTask<()> for FlakyTask {
    fn name(&self) -> &str {
        "flaky_task"
    }

    async fn run(&self, _: ()) -> TaskResult {
        let run = self.run_count.fetch_add(1, Ordering::SeqCst) + 1;
        if run >= self.succeed_on {
            Ok(())
        } else {
            Err(PurposefulFailure.into())
        }
    }
}

pub type Args = (u32, String, bool);

/// Records the arguments of every run, then fails.
#[derive(Clone, Default)]
pub struct RecordingTask {
    pub calls: Arc<Mutex<Vec<Args>>>,
}

impl SupervisedTask<Args> for RecordingTask {
    fn name(&self) -> &str {
        "recording_task"
    }

    async fn run(&self, args: Args) -> TaskResult {
        self.calls.lock().unwrap().push(args);
        Err(PurposefulFailure.into())
    }
}

#[derive(Debug, Clone)]
pub struct ErrorCall {
    pub error: SharedError,
    pub task_name: TaskName,
    pub attempt: u32,
}

#[derive(Debug, Clone)]
pub struct FailCall {
    pub error: Option<SharedError>,
    pub task_name: TaskName,
    pub attempts: u32,
}

/// Error hook that records its arguments and resolves `decision` when set.
pub fn error_recorder(
    decision: Option<Decision>,
) -> (
    Arc<Mutex<Vec<ErrorCall>>>,
    impl Fn(Decider, SharedError, TaskName, u32) -> Ready<()> + Send + Sync + 'static,
) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = calls.clone();
    let hook = move |decider: Decider, error: SharedError, task_name: TaskName, attempt: u32| {
        recorded.lock().unwrap().push(ErrorCall {
            error,
            task_name,
            attempt,
        });
        if let Some(decision) = decision {
            decider.decide(decision);
        }
        ready(())
    };
    (calls, hook)
}

/// Fail hook that records its arguments and succeeds.
pub fn fail_recorder() -> (
    Arc<Mutex<Vec<FailCall>>>,
    impl Fn(Option<SharedError>, TaskName, u32) -> Ready<TaskResult> + Send + Sync + 'static,
) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = calls.clone();
    let hook = move |error: Option<SharedError>, task_name: TaskName, attempts: u32| {
        recorded.lock().unwrap().push(FailCall {
            error,
            task_name,
            attempts,
        });
        ready(Ok(()))
    };
    (calls, hook)
}

/// Diagnostic sink keeping every warning in memory.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub warnings: Arc<Mutex<Vec<Warning>>>,
}

impl RecordingSink {
    pub fn taken(&self) -> Vec<Warning> {
        self.warnings.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn warn(&self, warning: &Warning) {
        self.warnings.lock().unwrap().push(warning.clone());
    }
}

pub fn is_purposeful(error: &SharedError) -> bool {
    error.downcast_ref::<PurposefulFailure>().is_some()
}
