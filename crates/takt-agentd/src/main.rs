use std::{env, path::PathBuf, sync::Arc};

use anyhow::Context;
use takt_api::HttpApi;
use takt_core::{AgentConfig, LineState};
use takt_observe::{LoggerConfig, LoggerFormat, logger_init};
use takt_uplink::StoreClient;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod agent;
use agent::LineAgent;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Config: optional TOML path as the only argument, env vars on top.
    let config_path = env::args().nth(1).map(PathBuf::from);
    let cfg = AgentConfig::load(config_path.as_deref())?;

    // 2) Logger
    let logger_cfg = LoggerConfig {
        level: env::var("TAKT_LOG").unwrap_or_else(|_| "info".to_string()),
        format: match env::var("TAKT_LOG_FORMAT") {
            Ok(format) => format.parse::<LoggerFormat>()?,
            Err(_) => LoggerFormat::Text,
        },
        ..LoggerConfig::default()
    };
    logger_init(&logger_cfg)?;
    info!(listen = %cfg.listen_addr, store = %cfg.store.base_url, "takt agent starting");

    // 3) Shared state + store client
    let state = LineState::new();
    let client = StoreClient::new(&cfg.store).context("store client")?;

    // 4) Actuator outputs: acquisition failure is fatal before serving.
    let outputs = build_outputs(&cfg)?;

    // 5) Background loops
    let cancel = CancellationToken::new();
    let driver = tokio::spawn(takt_drive::driver::run(
        outputs,
        state.clone(),
        cfg.stepper.clone(),
        cancel.clone(),
    ));
    let publisher = tokio::spawn(takt_uplink::tasks::publish::run(
        client.clone(),
        cfg.telemetry.clone(),
        cfg.store.publish_interval(),
        state.clone(),
        cancel.clone(),
    ));
    let poller = tokio::spawn(takt_uplink::tasks::poll::run(
        client.clone(),
        cfg.store.poll_interval(),
        state.clone(),
        cancel.clone(),
    ));

    // 6) Command server, shut down gracefully on ctrl-c.
    let agent = Arc::new(LineAgent::new(state, client));
    let router = HttpApi::new(agent).router();
    let listener = tokio::net::TcpListener::bind(cfg.listen_addr)
        .await
        .with_context(|| format!("bind {}", cfg.listen_addr))?;
    info!("command server listening");

    let shutdown = cancel.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
            shutdown.cancel();
        })
        .await?;

    // 7) Drain the loops; the driver de-asserts its outputs on the way out.
    cancel.cancel();
    let _ = tokio::join!(driver, publisher, poller);
    info!("shutdown complete");

    Ok(())
}

#[cfg(feature = "raspberry-pi")]
fn build_outputs(cfg: &AgentConfig) -> anyhow::Result<takt_drive::GpioOutputs> {
    takt_drive::GpioOutputs::new(&cfg.stepper).context("acquire actuator outputs")
}

#[cfg(not(feature = "raspberry-pi"))]
fn build_outputs(_cfg: &AgentConfig) -> anyhow::Result<takt_drive::SimOutputs> {
    info!("no gpio backend enabled, using simulated outputs");
    Ok(takt_drive::SimOutputs::new())
}
