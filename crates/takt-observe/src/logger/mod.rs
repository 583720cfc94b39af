mod config;
mod error;
mod init;

pub use config::{LoggerConfig, LoggerFormat};
pub use error::LoggerError;

/// Install the global tracing subscriber for the configured format.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => init::text(cfg),
        LoggerFormat::Json => init::json(cfg),
    }
}
