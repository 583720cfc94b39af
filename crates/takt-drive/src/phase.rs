/// One coil activation pattern: which of the four output lines to assert.
pub type StepPattern = [bool; 4];

/// Full-step wave sequence. Each entry asserts exactly one coil; traversing
/// in order and wrapping after the fourth keeps a consistent winding
/// direction. The electrical mapping of entries to pins is configuration
/// (`StepperConfig::pins`), not part of this table.
pub const STEP_SEQUENCE: [StepPattern; 4] = [
    [true, false, false, false],
    [false, true, false, false],
    [false, false, true, false],
    [false, false, false, true],
];

/// Cyclic cursor over [`STEP_SEQUENCE`].
#[derive(Debug, Default)]
pub struct PhaseCycle {
    index: usize,
}

impl PhaseCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next pattern in the cycle, wrapping after the fourth.
    pub fn advance(&mut self) -> StepPattern {
        let pattern = STEP_SEQUENCE[self.index % STEP_SEQUENCE.len()];
        self.index = self.index.wrapping_add(1);
        pattern
    }
}
