mod error;
pub use error::UplinkError;

mod client;
pub use client::StoreClient;

pub mod telemetry;

pub mod tasks;
