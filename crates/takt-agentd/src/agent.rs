use async_trait::async_trait;
use takt_api::{ApiError, CommandHandler};
use takt_core::LineState;
use takt_model::{Counters, PowerStateReport, RunState};
use takt_uplink::StoreClient;
use time::OffsetDateTime;
use tracing::{info, warn};

/// The production command handler.
///
/// Operates on the same shared line state as the background loops and
/// reports command-driven transitions to the store's power history.
pub struct LineAgent {
    state: LineState,
    store: StoreClient,
}

impl LineAgent {
    pub fn new(state: LineState, store: StoreClient) -> Self {
        Self { state, store }
    }
}

#[async_trait]
impl CommandHandler for LineAgent {
    async fn set_power(&self, on: bool) -> Result<RunState, ApiError> {
        let was_running = self.state.set_running(on);
        let run_state = self.state.run_state();
        if was_running != on {
            info!("motor {run_state} via command");
        }

        // The transition is already applied; the history append is best
        // effort and must not undo it or fail the command.
        let report = PowerStateReport::manual(on, OffsetDateTime::now_utc());
        if let Err(e) = self.store.push_power_state(&report).await {
            warn!("power state report failed: {e}");
        }

        Ok(run_state)
    }

    async fn reset_counters(&self) -> Result<(), ApiError> {
        // The gate makes the publisher skip its tick while the counters are
        // being zeroed; it is released when the guard drops, on every path.
        let _gate = self.state.begin_reset();
        self.state.reset_counters();
        info!("production counters reset");
        Ok(())
    }

    async fn status(&self) -> Result<(RunState, Counters), ApiError> {
        Ok((self.state.run_state(), self.state.counters()))
    }
}
