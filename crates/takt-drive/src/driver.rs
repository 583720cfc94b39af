use takt_core::{LineState, StepperConfig};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{outputs::StepperOutputs, phase::PhaseCycle};

/// Actuation driver loop.
///
/// Re-reads the run flag every iteration without blocking: while running it
/// asserts the next phase and waits the step interval; while stopped it
/// waits the idle interval and re-checks, so a stop command is honored
/// within one wait. On cancellation the outputs are de-asserted before the
/// loop returns.
pub async fn run<O: StepperOutputs>(
    mut outputs: O,
    state: LineState,
    cfg: StepperConfig,
    cancel: CancellationToken,
) {
    let step = cfg.step_interval();
    let idle = cfg.idle_interval();
    let mut cycle = PhaseCycle::new();

    info!(step_us = cfg.step_interval_us, "actuation driver started");
    loop {
        let wait = if state.is_running() {
            outputs.apply(cycle.advance());
            step
        } else {
            idle
        };

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = sleep(wait) => {}
        }
    }

    outputs.release();
    info!("actuation driver stopped, outputs de-asserted");
}
