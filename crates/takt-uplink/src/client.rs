use reqwest::Client;
use takt_core::StoreConfig;
use takt_model::{PowerRecord, PowerStateReport, TelemetrySample};

use crate::error::UplinkError;

/// HTTP client for the remote store.
///
/// The publisher and poller own all traffic to the store; every call is
/// bounded by the client-level timeout so a stalled store cannot stall a
/// loop past its period.
#[derive(Clone)]
pub struct StoreClient {
    client: Client,
    base_url: String,
}

impl StoreClient {
    pub fn new(cfg: &StoreConfig) -> Result<Self, UplinkError> {
        let client = Client::builder().timeout(cfg.request_timeout()).build()?;

        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Append one telemetry sample to the store's sensor history.
    pub async fn push_sample(&self, sample: &TelemetrySample) -> Result<(), UplinkError> {
        let url = format!("{}/api/sensordata/", self.base_url);
        let response = self.client.post(&url).json(sample).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UplinkError::Rejected(status));
        }
        Ok(())
    }

    /// Fetch the store's power history.
    pub async fn fetch_power_records(&self) -> Result<Vec<PowerRecord>, UplinkError> {
        let url = format!("{}/api/powersystem/", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UplinkError::Rejected(status));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            UplinkError::InvalidResponse(format!("failed to parse power records: {e}"))
        })
    }

    /// Append a power-state report to the store's power history.
    pub async fn push_power_state(&self, report: &PowerStateReport) -> Result<(), UplinkError> {
        let url = format!("{}/api/powersystem/", self.base_url);
        let response = self.client.post(&url).json(report).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UplinkError::Rejected(status));
        }
        Ok(())
    }
}
