//! Non-fatal warnings emitted while supervising.
//!
//! The supervisor never writes to a global stream directly. It hands every
//! [`Warning`] to a [`DiagnosticSink`], which defaults to [`StderrSink`], or to
//! [`TracingSink`] when the `with_tracing` feature is enabled.

use std::sync::Arc;

use crate::TaskName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A failed attempt is about to be retried.
    Restarting { task_name: TaskName },
    /// Supervision ended without success and nobody handled it.
    FailedWithoutHandler {
        task_name: TaskName,
        attempts: u32,
        max_attempts: u32,
    },
}

impl Warning {
    pub fn task_name(&self) -> &str {
        match self {
            Self::Restarting { task_name } | Self::FailedWithoutHandler { task_name, .. } => {
                task_name
            }
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Restarting { task_name } => {
                write!(f, "Restarting {task_name} because of error")
            }
            Self::FailedWithoutHandler {
                task_name,
                attempts,
                max_attempts,
            } => write!(
                f,
                "Task {task_name} failed after {attempts}/{max_attempts} attempts without any fail handler"
            ),
        }
    }
}

/// Destination for supervisor warnings.
pub trait DiagnosticSink: Send + Sync + 'static {
    fn warn(&self, warning: &Warning);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Warning) + Send + Sync + 'static,
{
    fn warn(&self, warning: &Warning) {
        (self)(warning)
    }
}

/// Writes warnings to standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn warn(&self, warning: &Warning) {
        eprintln!("{warning}");
    }
}

/// Emits warnings as `tracing` events at `WARN` level.
#[cfg(feature = "with_tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[cfg(feature = "with_tracing")]
impl DiagnosticSink for TracingSink {
    fn warn(&self, warning: &Warning) {
        tracing::warn!(task = %warning.task_name(), "{warning}");
    }
}

pub(crate) fn default_sink() -> Arc<dyn DiagnosticSink> {
    #[cfg(feature = "with_tracing")]
    {
        Arc::new(TracingSink)
    }
    #[cfg(not(feature = "with_tracing"))]
    {
        Arc::new(StderrSink)
    }
}
