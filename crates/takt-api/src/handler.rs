use async_trait::async_trait;
use takt_model::{Counters, RunState};

use crate::error::ApiError;

/// Command surface handler.
///
/// Abstracts the agent behind the HTTP routes, so the router can be
/// exercised against any implementation. The production implementation
/// operates on the same shared line state as the background loops, never
/// on a separate copy.
#[async_trait]
pub trait CommandHandler: Send + Sync + 'static {
    /// Apply a start/stop command and return the resulting run state.
    async fn set_power(&self, on: bool) -> Result<RunState, ApiError>;

    /// Zero both production counters.
    async fn reset_counters(&self) -> Result<(), ApiError>;

    /// Read-only snapshot of run state and counters.
    async fn status(&self) -> Result<(RunState, Counters), ApiError>;
}
