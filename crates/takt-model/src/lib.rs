mod counters;
pub use counters::Counters;

mod run_state;
pub use run_state::RunState;

mod sample;
pub use sample::TelemetrySample;

mod power;
pub use power::{PowerRecord, PowerStateReport};
