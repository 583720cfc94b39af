mod config;
pub use config::{
    AgentConfig, ENV_LISTEN_ADDR, ENV_STORE_URL, SensorRange, SensorRanges, StepperConfig,
    StoreConfig, TelemetryConfig,
};

mod error;
pub use error::ConfigError;

mod state;
pub use state::{LineState, RemoteApply, ResetGuard};
