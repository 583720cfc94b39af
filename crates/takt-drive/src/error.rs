use thiserror::Error;

/// Output-line acquisition failures. Fatal at startup: the agent does not
/// proceed to serving without its outputs.
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("gpio controller unavailable: {0}")]
    Gpio(String),

    #[error("output pin {pin} unavailable: {reason}")]
    Pin { pin: u8, reason: String },
}
