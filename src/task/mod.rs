use std::{borrow::Cow, future::Future, pin::Pin, sync::Arc};

pub type TaskError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type TaskResult = Result<(), TaskError>;

/// A task failure as seen by the supervisor and its hooks.
///
/// The same failure is handed to the error hook and kept as the supervisor's
/// last error, so it is reference counted rather than boxed.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// The trait implemented by tasks that can be kept alive.
///
/// `A` is the argument type of one run. The supervisor clones the arguments it
/// was called with for every attempt, so each attempt sees exactly the same
/// input.
///
/// # Example
///
/// ```rust
/// use task_keepalive::{SupervisedTask, TaskResult};
///
/// struct Fetch;
///
/// impl SupervisedTask<String> for Fetch {
///     fn name(&self) -> &str {
///         "fetch"
///     }
///
///     async fn run(&self, url: String) -> TaskResult {
///         if url.is_empty() {
///             return Err("no url".into());
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait SupervisedTask<A>: Send + Sync + 'static {
    /// Name used in diagnostics and passed to the hooks.
    fn name(&self) -> &str;

    /// Runs the task once until completion or failure.
    fn run(&self, args: A) -> impl Future<Output = TaskResult> + Send;
}

/// Boxed future returned by a [`TaskFn`] attempt.
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = TaskResult> + Send + 'static>>;

type BoxTaskClosure<A> = Box<dyn Fn(A) -> BoxTaskFuture + Send + Sync + 'static>;

/// Closure-backed task.
///
/// Wraps a closure that creates a fresh future per attempt. The future type is
/// erased when the task is built, so a supervisor around a `TaskFn` can be
/// moved into `tokio::spawn` like any struct-backed task.
///
/// ```rust
/// use task_keepalive::{TaskError, TaskFn};
///
/// let task = TaskFn::new("double", |n: u64| async move {
///     if n == 0 {
///         return Err::<(), TaskError>("zero".into());
///     }
///     Ok(())
/// });
/// assert_eq!(task.name(), "double");
/// ```
pub struct TaskFn<A> {
    name: Cow<'static, str>,
    f: BoxTaskClosure<A>,
}

impl<A> TaskFn<A>
where
    A: 'static,
{
    pub fn new<F, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            f: Box::new(move |args: A| -> BoxTaskFuture { Box::pin(f(args)) }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<A> SupervisedTask<A> for TaskFn<A>
where
    A: 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, args: A) -> impl Future<Output = TaskResult> + Send {
        (self.f)(args)
    }
}

impl<A> std::fmt::Debug for TaskFn<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskFn")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
