use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};
use takt_core::{LineState, TelemetryConfig};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{StoreClient, telemetry};

/// Outcome of one publish tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Sample delivered to the store.
    Sent,
    /// Reset gate held; the tick was skipped outright, nothing queued.
    Skipped,
    /// Store unreachable or rejected the sample; superseded next tick.
    Failed,
}

/// One publisher tick. A held reset gate skips the whole tick: no
/// synthesis, no send, no retry of the skipped sample.
pub async fn publish_tick<R: Rng + ?Sized>(
    client: &StoreClient,
    cfg: &TelemetryConfig,
    state: &LineState,
    rng: &mut R,
) -> PublishOutcome {
    if !state.publish_allowed() {
        debug!("reset in progress, skipping telemetry tick");
        return PublishOutcome::Skipped;
    }

    let sample = telemetry::synthesize(cfg, state, rng);
    match client.push_sample(&sample).await {
        Ok(()) => {
            debug!(
                good = sample.good_product,
                bad = sample.bad_product,
                "telemetry sample pushed"
            );
            PublishOutcome::Sent
        }
        Err(e) => {
            warn!("telemetry push failed: {e}");
            PublishOutcome::Failed
        }
    }
}

/// Periodic telemetry loop: one tick per publish interval until cancelled.
///
/// Failures never stop the loop; the period itself bounds retry frequency,
/// so there is no backoff and a failed sample is simply superseded.
pub async fn run(
    client: StoreClient,
    cfg: TelemetryConfig,
    interval: Duration,
    state: LineState,
    cancel: CancellationToken,
) {
    let mut rng = StdRng::from_entropy();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(interval_ms = interval.as_millis() as u64, "telemetry publisher started");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                publish_tick(&client, &cfg, &state, &mut rng).await;
            }
        }
    }
    info!("telemetry publisher stopped");
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{Json, Router, extract::State, routing::post};
    use takt_core::StoreConfig;

    use super::*;

    async fn count_push(
        State(hits): State<Arc<AtomicUsize>>,
        Json(_body): Json<serde_json::Value>,
    ) -> Json<serde_json::Value> {
        hits.fetch_add(1, Ordering::SeqCst);
        Json(serde_json::json!({"id": 1}))
    }

    async fn stub_store() -> (SocketAddr, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/api/sensordata/", post(count_push))
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (addr, hits)
    }

    fn client_for(addr: SocketAddr) -> StoreClient {
        StoreClient::new(&StoreConfig {
            base_url: format!("http://{addr}"),
            ..StoreConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn held_gate_means_zero_sends_that_tick() {
        let (addr, hits) = stub_store().await;
        let client = client_for(addr);
        let cfg = TelemetryConfig::default();
        let state = LineState::new();
        let mut rng = StdRng::seed_from_u64(3);

        let guard = state.begin_reset();
        let outcome = publish_tick(&client, &cfg, &state, &mut rng).await;
        assert_eq!(outcome, PublishOutcome::Skipped);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        // Sending resumes the tick after the gate is released.
        drop(guard);
        let outcome = publish_tick(&client, &cfg, &state, &mut rng).await;
        assert_eq!(outcome, PublishOutcome::Sent);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unreachable_store_is_contained() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(addr);
        let cfg = TelemetryConfig::default();
        let state = LineState::new();
        let mut rng = StdRng::seed_from_u64(3);

        let outcome = publish_tick(&client, &cfg, &state, &mut rng).await;
        assert_eq!(outcome, PublishOutcome::Failed);
    }
}
