use std::time::Duration;

use takt_core::{LineState, RemoteApply};
use takt_model::PowerRecord;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::StoreClient;

/// One reconciliation pass against the store's power history.
///
/// A fetch failure or an empty history leaves local state untouched; the
/// next period retries. Only the record with the greatest id is considered,
/// and the monotonic check in [`LineState::apply_remote`] makes a late or
/// duplicated response harmless.
pub async fn poll_tick(client: &StoreClient, state: &LineState) {
    let records = match client.fetch_power_records().await {
        Ok(records) => records,
        Err(e) => {
            warn!("power record fetch failed: {e}");
            return;
        }
    };

    let Some(newest) = PowerRecord::newest(&records) else {
        debug!("power history is empty");
        return;
    };

    match state.apply_remote(newest.id, newest.status) {
        RemoteApply::Transitioned(run_state) => {
            info!(id = newest.id, "motor {run_state} from remote record");
        }
        RemoteApply::Unchanged => {
            debug!(id = newest.id, "remote record matches current state");
        }
        RemoteApply::Stale => {}
    }
}

/// Periodic reconciliation loop until cancelled.
pub async fn run(
    client: StoreClient,
    interval: Duration,
    state: LineState,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(interval_ms = interval.as_millis() as u64, "remote state poller started");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => poll_tick(&client, &state).await,
        }
    }
    info!("remote state poller stopped");
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{Json, Router, routing::get};
    use takt_core::StoreConfig;

    use super::*;

    async fn stub_store(records: serde_json::Value) -> SocketAddr {
        let app = Router::new().route(
            "/api/powersystem/",
            get(move || {
                let records = records.clone();
                async move { Json(records) }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        addr
    }

    fn client_for(addr: SocketAddr) -> StoreClient {
        StoreClient::new(&StoreConfig {
            base_url: format!("http://{addr}"),
            ..StoreConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn applies_the_greatest_id_not_the_last_element() {
        // History delivered out of order, with full wire records.
        let addr = stub_store(serde_json::json!([
            {"id": 3, "timestamp": "2024-05-01T12:00:00Z", "status": false, "reason": ""},
            {"id": 9, "timestamp": "2024-05-01T12:02:00Z", "status": true, "reason": ""},
            {"id": 7, "timestamp": "2024-05-01T12:01:00Z", "status": false, "reason": ""},
        ]))
        .await;
        let client = client_for(addr);
        let state = LineState::new();

        poll_tick(&client, &state).await;
        assert!(state.is_running());
        assert_eq!(state.last_applied(), 9);

        // Re-observing the same history is a no-op.
        poll_tick(&client, &state).await;
        assert!(state.is_running());
        assert_eq!(state.last_applied(), 9);
    }

    #[tokio::test]
    async fn empty_history_leaves_state_unchanged() {
        let addr = stub_store(serde_json::json!([])).await;
        let client = client_for(addr);
        let state = LineState::new();
        state.set_running(true);

        poll_tick(&client, &state).await;
        assert!(state.is_running());
        assert_eq!(state.last_applied(), 0);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_state_unchanged() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(addr);
        let state = LineState::new();
        state.set_running(true);

        poll_tick(&client, &state).await;
        assert!(state.is_running());
    }
}
