use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::ApiError, handler::CommandHandler};

/// HTTP command surface builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: CommandHandler,
{
    /// Create a new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build the axum router with the command routes mounted.
    ///
    /// Routes:
    /// - POST /control-power - start/stop the actuator
    /// - POST /reset-counter - zero the production counters
    /// - GET /status - run state and counters snapshot
    pub fn router(self) -> Router {
        Router::new()
            .route("/control-power", post(control_power::<H>))
            .route("/reset-counter", post(reset_counter::<H>))
            .route("/status", get(status::<H>))
            .with_state(self.handler)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct PowerRequest {
    status: Option<i64>,
}

#[derive(Debug, Serialize)]
struct PowerResponse {
    message: String,
    motor_running: bool,
}

#[derive(Debug, Deserialize)]
struct ResetRequest {
    reset: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ResetResponse {
    message: String,
    success: bool,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    motor_running: bool,
    good_product: u64,
    bad_product: u64,
}

fn required<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(req)) => Ok(req),
        Err(_) => Err(ApiError::InvalidRequest(
            "missing or malformed request body".to_string(),
        )),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /control-power
async fn control_power<H>(
    State(handler): State<Arc<H>>,
    body: Result<Json<PowerRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    H: CommandHandler,
{
    let status = required(body)?
        .status
        .ok_or_else(|| ApiError::InvalidRequest("missing 'status' parameter".to_string()))?;

    let on = match status {
        0 => false,
        1 => true,
        other => {
            return Err(ApiError::InvalidRequest(format!(
                "status must be 0 or 1, got {other}"
            )));
        }
    };

    debug!(on, "power command received");
    let run_state = handler.set_power(on).await?;

    let message = if run_state.is_running() {
        "Motor started"
    } else {
        "Motor stopped"
    };
    Ok(Json(PowerResponse {
        message: message.to_string(),
        motor_running: run_state.is_running(),
    }))
}

/// POST /reset-counter
async fn reset_counter<H>(
    State(handler): State<Arc<H>>,
    body: Result<Json<ResetRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    H: CommandHandler,
{
    if required(body)?.reset != Some(true) {
        return Err(ApiError::InvalidRequest(
            "missing or false 'reset' parameter".to_string(),
        ));
    }

    debug!("counter reset requested");
    handler.reset_counters().await?;

    Ok(Json(ResetResponse {
        message: "Counters reset successfully".to_string(),
        success: true,
    }))
}

/// GET /status
async fn status<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: CommandHandler,
{
    let (run_state, counters) = handler.status().await?;

    Ok(Json(StatusResponse {
        status: "running",
        motor_running: run_state.is_running(),
        good_product: counters.good,
        bad_product: counters.bad,
    }))
}
