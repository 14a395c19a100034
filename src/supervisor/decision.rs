use tokio::sync::oneshot;

/// What happens after a failed attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Decision {
    /// Run the task again, if attempts remain.
    #[default]
    Restart,
    /// Stop supervising and go to the fail path.
    Fail,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Restart => write!(f, "restart"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Single-shot handle given to the error hook to override the default decision.
///
/// `decide` consumes the handle, so a failure can be resolved at most once.
/// Dropping it without deciding leaves the configured default in place.
#[derive(Debug)]
pub struct Decider {
    tx: oneshot::Sender<Decision>,
}

impl Decider {
    pub(crate) fn new() -> (Self, PendingDecision) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, PendingDecision { rx })
    }

    pub fn decide(self, decision: Decision) {
        // The supervisor only stops listening once the hook has returned.
        let _ = self.tx.send(decision);
    }

    pub fn restart(self) {
        self.decide(Decision::Restart);
    }

    pub fn fail(self) {
        self.decide(Decision::Fail);
    }
}

/// Supervisor side of a [`Decider`].
#[derive(Debug)]
pub(crate) struct PendingDecision {
    rx: oneshot::Receiver<Decision>,
}

impl PendingDecision {
    /// Returns the decision taken so far, or `default` if there is none.
    pub(crate) fn resolve_or(mut self, default: Decision) -> Decision {
        self.rx.try_recv().unwrap_or(default)
    }
}
