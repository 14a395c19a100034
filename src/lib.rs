//! # task-keepalive
//!
//! `task-keepalive` keeps a Tokio task alive.
//! It wraps the task, runs it again when it fails, and lets you decide after
//! every failure whether to restart or give up, with a final hook for when
//! supervision ends without success.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use task_keepalive::{Decision, SupervisorBuilder, TaskError, TaskFn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetch = TaskFn::new("fetch", |url: String| async move {
//!         println!("fetching {url}");
//!         Err::<(), TaskError>("connection refused".into())
//!     });
//!
//!     let supervisor = SupervisorBuilder::new(fetch)
//!         .with_max_attempts(5)
//!         .with_on_each_error(|decider, error, _name, _attempt| async move {
//!             if error.to_string().contains("forbidden") {
//!                 decider.decide(Decision::Fail);
//!             }
//!         })
//!         .with_on_fail(|error, name, attempts| async move {
//!             eprintln!("{name} gave up after {attempts} attempts: {error:?}");
//!             Ok::<(), TaskError>(())
//!         })
//!         .build();
//!
//!     let outcome = supervisor.call("https://example.com".to_string()).await?;
//!     println!("{outcome}");
//!     Ok(())
//! }
//! ```
//!
//! ## What you get
//!
//! * **Bounded restarts** – the task runs at most `max_attempts` times.
//! * **Per-error decisions** – the error hook resolves a single-shot [`Decider`]
//!   to [`Decision::Restart`] or [`Decision::Fail`]; otherwise the default applies.
//! * **Absorbed failures** – task errors never escape; they reach the fail hook
//!   or a [`Warning`] on the configured [`DiagnosticSink`].
//!
//! The attempt counter lives as long as the [`Supervisor`]: it is shared by
//! every call and never reset. There is no delay between attempts.
//!
//! ## Features
//!
//! * `with_tracing` – route warnings through `tracing` and emit debug events
//!   for each attempt.

pub use diagnostics::{DiagnosticSink, StderrSink, Warning};
#[cfg(feature = "with_tracing")]
pub use diagnostics::TracingSink;
pub use supervisor::{
    builder::SupervisorBuilder,
    decision::{Decider, Decision},
    Outcome, Supervisor, SupervisorConfig, SupervisorError,
};
pub use task::{BoxTaskFuture, SharedError, SupervisedTask, TaskError, TaskFn, TaskResult};

mod diagnostics;
mod supervisor;
mod task;

pub type TaskName = String;

/// Wraps `task` in a [`Supervisor`] with the default configuration.
///
/// Equivalent to `SupervisorBuilder::new(task).build()`.
pub fn supervise<T, A>(task: T) -> Supervisor<T, A>
where
    T: SupervisedTask<A>,
{
    SupervisorBuilder::new(task).build()
}
