/// Lifecycle phases of a crawl worker
///
/// `Idle -> Running -> {Draining, Aborted} -> Done`
use std::fmt;

/// Represents where a crawl worker is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerPhase {
    /// Worker created, nothing fetched yet
    Idle,

    /// Pulling from the frontier and emitting items
    Running,

    /// Frontier exhausted naturally
    Draining,

    /// Stopped early: budget exceeded, cancelled or faulted
    Aborted,

    /// End-of-stream has been signalled
    Done,
}

impl WorkerPhase {
    /// Returns true if the worker may still emit items
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Idle | Self::Running)
    }

    /// Checks whether moving to `next` is a legal transition
    pub fn can_transition_to(&self, next: WorkerPhase) -> bool {
        use WorkerPhase::*;

        matches!(
            (self, next),
            (Idle, Running)
                | (Idle, Aborted)
                | (Running, Draining)
                | (Running, Aborted)
                | (Draining, Done)
                | (Aborted, Done)
        )
    }
}

impl fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Aborted => "aborted",
            Self::Done => "done",
        };
        write!(f, "{}", name)
    }
}
