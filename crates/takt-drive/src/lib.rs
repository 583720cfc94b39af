mod error;
pub use error::DriveError;

mod phase;
pub use phase::{PhaseCycle, STEP_SEQUENCE, StepPattern};

mod outputs;
pub use outputs::{SimOutputs, StepperOutputs};
#[cfg(feature = "raspberry-pi")]
pub use outputs::GpioOutputs;

pub mod driver;
