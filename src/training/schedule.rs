//! Geometric decay with a floor.

/// A scalar multiplied by `decay` after every episode while it is still
/// above `floor`. The last step may land just under the floor; after that
/// the value stays put.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecaySchedule {
    value: f64,
    decay: f64,
    floor: f64,
}

impl DecaySchedule {
    /// Creates a schedule starting at `start`.
    ///
    /// # Arguments
    ///
    /// * `start` - Initial value.
    /// * `decay` - Factor applied on each `step` while above the floor.
    /// * `floor` - Value at which decay stops.
    pub fn new(start: f64, decay: f64, floor: f64) -> Self {
        Self {
            value: start,
            decay,
            floor,
        }
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Applies one episode's decay.
    pub fn step(&mut self) {
        if self.value > self.floor {
            self.value *= self.decay;
        }
    }
}
