/// Turns a cumulative counter into a per-second rate.
///
/// The first reading only records a baseline, so no spike measured from
/// zero is ever emitted.
#[derive(Debug, Clone)]
pub struct CounterRate {
    previous: Option<u64>,
    samples_per_second: f64,
}

impl CounterRate {
    pub fn new(samples_per_second: f64) -> Self {
        Self {
            previous: None,
            samples_per_second,
        }
    }

    /// Record `current` and return the rate since the previous reading.
    ///
    /// A counter that went backwards yields 0.
    pub fn next(&mut self, current: u64) -> Option<f64> {
        let previous = self.previous.replace(current)?;
        Some(current.saturating_sub(previous) as f64 * self.samples_per_second)
    }

    /// Forget the baseline, e.g. when the counted device changes.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}
