use std::{
    env, fs,
    net::{Ipv4Addr, SocketAddr},
    path::Path,
    time::Duration,
};

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment override for the remote store base URL.
pub const ENV_STORE_URL: &str = "TAKT_STORE_URL";
/// Environment override for the command server listen address.
pub const ENV_LISTEN_ADDR: &str = "TAKT_LISTEN_ADDR";

/// Agent configuration, loaded from an optional TOML file with environment
/// overrides applied on top. Every field has a default, so a missing file or
/// a partial one is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Address the local command server binds to.
    pub listen_addr: SocketAddr,
    pub store: StoreConfig,
    pub stepper: StepperConfig,
    pub telemetry: TelemetryConfig,
}

/// Remote store endpoint and loop cadence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the remote store, no trailing slash.
    pub base_url: String,
    /// Bound on every outbound call so a stalled store cannot stall a loop.
    pub request_timeout_ms: u64,
    pub publish_interval_ms: u64,
    pub poll_interval_ms: u64,
}

/// Actuator output mapping and step timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    /// BCM pin numbers of the four coil lines, in phase order.
    pub pins: [u8; 4],
    /// Wait between phase advances while running.
    pub step_interval_us: u64,
    /// Re-check cadence while stopped.
    pub idle_interval_ms: u64,
}

/// Telemetry synthesis tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Id this actuator reports under.
    pub actuator_id: u32,
    /// Probability that a running tick produces a new item.
    pub p_event: f64,
    /// Probability that a produced item is classified bad.
    pub p_bad: f64,
    pub ranges: SensorRanges,
}

/// Plausible value ranges for the synthesized sensor fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SensorRanges {
    pub vibration_level: SensorRange,
    pub actuator_voltage: SensorRange,
    pub actuator_current: SensorRange,
    pub power_consumption: SensorRange,
    pub mass: SensorRange,
    pub brightness: SensorRange,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SensorRange {
    pub min: f64,
    pub max: f64,
}

impl SensorRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 5000)),
            store: StoreConfig::default(),
            stepper: StepperConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_ms: 3_000,
            publish_interval_ms: 1_000,
            poll_interval_ms: 1_000,
        }
    }
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            pins: [17, 18, 27, 22],
            step_interval_us: 5_000,
            idle_interval_ms: 100,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            actuator_id: 1,
            p_event: 0.2,
            p_bad: 0.3,
            ranges: SensorRanges::default(),
        }
    }
}

impl Default for SensorRanges {
    fn default() -> Self {
        Self {
            vibration_level: SensorRange::new(45.0, 55.0),
            actuator_voltage: SensorRange::new(15.0, 19.0),
            actuator_current: SensorRange::new(50.0, 60.0),
            power_consumption: SensorRange::new(60.0, 70.0),
            mass: SensorRange::new(50.0, 58.0),
            brightness: SensorRange::new(70.0, 80.0),
        }
    }
}

impl AgentConfig {
    /// Load from the given TOML file (defaults when `None`), apply
    /// environment overrides, validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut cfg = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                toml::from_str(&raw)?
            }
            None => Self::default(),
        };

        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var(ENV_STORE_URL) {
            self.store.base_url = url;
        }
        if let Ok(addr) = env::var(ENV_LISTEN_ADDR) {
            self.listen_addr = addr.parse().map_err(|_| {
                ConfigError::Invalid(format!("{ENV_LISTEN_ADDR}: not a socket address: {addr}"))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, p) in [
            ("telemetry.p_event", self.telemetry.p_event),
            ("telemetry.p_bad", self.telemetry.p_bad),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }

        let ranges = &self.telemetry.ranges;
        for (name, range) in [
            ("vibration_level", ranges.vibration_level),
            ("actuator_voltage", ranges.actuator_voltage),
            ("actuator_current", ranges.actuator_current),
            ("power_consumption", ranges.power_consumption),
            ("mass", ranges.mass),
            ("brightness", ranges.brightness),
        ] {
            if range.min > range.max {
                return Err(ConfigError::Invalid(format!(
                    "telemetry.ranges.{name}: min {} exceeds max {}",
                    range.min, range.max
                )));
            }
        }

        for (name, interval) in [
            ("store.request_timeout_ms", self.store.request_timeout_ms),
            ("store.publish_interval_ms", self.store.publish_interval_ms),
            ("store.poll_interval_ms", self.store.poll_interval_ms),
            ("stepper.step_interval_us", self.stepper.step_interval_us),
            ("stepper.idle_interval_ms", self.stepper.idle_interval_ms),
        ] {
            if interval == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be nonzero")));
            }
        }

        Ok(())
    }
}

impl StoreConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn publish_interval(&self) -> Duration {
        Duration::from_millis(self.publish_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl StepperConfig {
    pub fn step_interval(&self) -> Duration {
        Duration::from_micros(self.step_interval_us)
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = AgentConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.telemetry.p_event, 0.2);
        assert_eq!(cfg.telemetry.p_bad, 0.3);
        assert_eq!(cfg.stepper.pins, [17, 18, 27, 22]);
        assert_eq!(cfg.store.publish_interval(), Duration::from_secs(1));
    }

    #[test]
    fn partial_toml_keeps_defaults_elsewhere() {
        let cfg: AgentConfig = toml::from_str(
            r#"
            listen_addr = "127.0.0.1:6000"

            [store]
            base_url = "http://10.0.0.7:8000"

            [telemetry]
            p_event = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(cfg.listen_addr, "127.0.0.1:6000".parse().unwrap());
        assert_eq!(cfg.store.base_url, "http://10.0.0.7:8000");
        assert_eq!(cfg.store.poll_interval_ms, 1_000);
        assert_eq!(cfg.telemetry.p_event, 0.5);
        assert_eq!(cfg.telemetry.p_bad, 0.3);
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let mut cfg = AgentConfig::default();
        cfg.telemetry.p_bad = 1.4;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn inverted_sensor_range_is_rejected() {
        let mut cfg = AgentConfig::default();
        cfg.telemetry.ranges.mass = SensorRange::new(9.0, 3.0);
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut cfg = AgentConfig::default();
        cfg.store.poll_interval_ms = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn env_overrides_store_url_and_listen_addr() {
        let mut cfg = AgentConfig::default();

        // Only this test touches the TAKT_* variables.
        unsafe {
            env::set_var(ENV_STORE_URL, "http://store.example:8000");
            env::set_var(ENV_LISTEN_ADDR, "127.0.0.1:7000");
        }
        let applied = cfg.apply_env();
        unsafe {
            env::remove_var(ENV_STORE_URL);
            env::remove_var(ENV_LISTEN_ADDR);
        }

        applied.unwrap();
        assert_eq!(cfg.store.base_url, "http://store.example:8000");
        assert_eq!(cfg.listen_addr, "127.0.0.1:7000".parse().unwrap());
    }
}
