//! Synchronization stages.

use std::fmt;

/// One step of the deploy state machine, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Idle,
    Connected,
    PoweredDown,
    BackedUp,
    Wiped,
    Uploading,
    Completed,
    Failed,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connected => "connected",
            Self::PoweredDown => "powered-down",
            Self::BackedUp => "backed-up",
            Self::Wiped => "wiped",
            Self::Uploading => "uploading",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected stage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid stage transition {from} -> {to}")]
pub struct InvalidTransition {
    pub from: Stage,
    pub to: Stage,
}

/// Holds the active stage and enforces forward-only transitions.
///
/// `Failed` is reachable from every stage and is terminal.
#[derive(Debug, Clone)]
pub struct StageMachine {
    current: Stage,
}

impl Default for StageMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StageMachine {
    pub fn new() -> Self {
        Self {
            current: Stage::Idle,
        }
    }

    pub fn current(&self) -> Stage {
        self.current
    }

    pub fn is_terminal(&self) -> bool {
        self.current == Stage::Failed
    }

    /// Moves to a later, non-failed stage.
    pub fn advance(&mut self, to: Stage) -> Result<(), InvalidTransition> {
        if self.is_terminal() || to == Stage::Failed || to <= self.current {
            return Err(InvalidTransition {
                from: self.current,
                to,
            });
        }
        self.current = to;
        Ok(())
    }

    /// Enters `Failed`, returning the stage that was active.
    pub fn fail(&mut self) -> Stage {
        std::mem::replace(&mut self.current, Stage::Failed)
    }
}
