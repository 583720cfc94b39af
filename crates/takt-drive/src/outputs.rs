use tracing::trace;

use crate::phase::StepPattern;

/// The four coil output lines the driver steps through.
///
/// Exactly one component (the driver loop) owns an instance. `release`
/// runs on loop exit; implementations also release on drop so abnormal exit
/// paths leave the lines de-asserted.
pub trait StepperOutputs: Send {
    /// Assert the given activation pattern on the output lines.
    fn apply(&mut self, pattern: StepPattern);

    /// De-assert all four lines.
    fn release(&mut self);
}

/// Stand-in backend for off-target builds: traces patterns instead of
/// toggling hardware.
#[derive(Debug, Default)]
pub struct SimOutputs {
    last: Option<StepPattern>,
}

impl SimOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently applied pattern, if any.
    pub fn last(&self) -> Option<StepPattern> {
        self.last
    }
}

impl StepperOutputs for SimOutputs {
    fn apply(&mut self, pattern: StepPattern) {
        self.last = Some(pattern);
        trace!(?pattern, "step");
    }

    fn release(&mut self) {
        self.last = None;
        trace!("outputs de-asserted");
    }
}

#[cfg(feature = "raspberry-pi")]
pub use gpio::GpioOutputs;

#[cfg(feature = "raspberry-pi")]
mod gpio {
    use rppal::gpio::{Gpio, OutputPin};
    use takt_core::StepperConfig;
    use tracing::info;

    use super::StepperOutputs;
    use crate::{error::DriveError, phase::StepPattern};

    /// Real GPIO outputs. Pins are acquired low at startup and driven low
    /// again on release and on drop.
    pub struct GpioOutputs {
        pins: [OutputPin; 4],
    }

    impl GpioOutputs {
        pub fn new(cfg: &StepperConfig) -> Result<Self, DriveError> {
            let gpio = Gpio::new().map_err(|e| DriveError::Gpio(e.to_string()))?;
            let [a, b, c, d] = cfg.pins;
            let pins = [
                acquire(&gpio, a)?,
                acquire(&gpio, b)?,
                acquire(&gpio, c)?,
                acquire(&gpio, d)?,
            ];

            info!(pins = ?cfg.pins, "gpio outputs acquired");
            Ok(Self { pins })
        }
    }

    fn acquire(gpio: &Gpio, pin: u8) -> Result<OutputPin, DriveError> {
        let mut output = gpio
            .get(pin)
            .map_err(|e| DriveError::Pin {
                pin,
                reason: e.to_string(),
            })?
            .into_output();
        output.set_low();
        Ok(output)
    }

    impl StepperOutputs for GpioOutputs {
        fn apply(&mut self, pattern: StepPattern) {
            for (pin, &asserted) in self.pins.iter_mut().zip(pattern.iter()) {
                if asserted {
                    pin.set_high();
                } else {
                    pin.set_low();
                }
            }
        }

        fn release(&mut self) {
            for pin in &mut self.pins {
                pin.set_low();
            }
        }
    }

    impl Drop for GpioOutputs {
        fn drop(&mut self) {
            self.release();
        }
    }
}
