use std::fmt;

use serde::{Deserialize, Serialize};

/// Run state of the line actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// The actuator advances through its phase sequence.
    Running,
    /// The actuator holds position; no phase advance occurs.
    Stopped,
}

impl RunState {
    /// Returns `true` for [`RunState::Running`].
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }

    /// Build from the shared run flag.
    pub fn from_flag(running: bool) -> Self {
        if running {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }

    /// Collapse back to the shared run flag.
    pub fn as_flag(&self) -> bool {
        self.is_running()
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Running => f.write_str("running"),
            RunState::Stopped => f.write_str("stopped"),
        }
    }
}
