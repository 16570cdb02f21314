//! Fixed-capacity sample storage and moving-average smoothing for charts.

use std::collections::VecDeque;

use crate::error::{PoptopError, Result};

/// Marker for a chart position that has no sample yet.
pub const NO_DATA: f64 = f64::NAN;

/// Returns true when `value` is a real sample rather than [`NO_DATA`].
pub fn has_data(value: f64) -> bool {
    !value.is_nan()
}

/// Running sum over the last `capacity` values pushed into it.
#[derive(Debug)]
struct FifoSum {
    capacity: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl FifoSum {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity.saturating_add(1)),
            sum: 0.0,
        }
    }

    fn push(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;
        if self.values.len() > self.capacity {
            if let Some(evicted) = self.values.pop_front() {
                self.sum -= evicted;
            }
        }
    }

    fn average(&self) -> f64 {
        self.sum / self.values.len() as f64
    }
}

/// Circular buffer of scalar samples for one chart series.
///
/// Twice the requested number of samples is retained so that a moving
/// average of up to `requested` samples can be computed for every displayed
/// position without losing history at the left edge of the chart.
#[derive(Debug, Clone)]
pub struct BoundedSeries {
    requested: usize,
    values: Vec<f64>,
    // Physical index of the oldest sample once the buffer has wrapped.
    head: usize,
    high_water: u64,
}

impl BoundedSeries {
    pub fn new(requested: usize) -> Result<Self> {
        if requested == 0 {
            return Err(PoptopError::InvalidCapacity(requested));
        }

        Ok(Self {
            requested,
            values: vec![NO_DATA; requested * 2],
            head: 0,
            high_water: 0,
        })
    }

    /// Number of samples returned by [`Self::display_window`].
    pub fn requested_capacity(&self) -> usize {
        self.requested
    }

    /// Number of slots actually held, always `2 * requested_capacity`.
    pub fn internal_capacity(&self) -> usize {
        self.values.len()
    }

    /// Total number of samples ever pushed.
    pub fn high_water(&self) -> u64 {
        self.high_water
    }

    pub fn push(&mut self, value: f64) {
        let capacity = self.values.len();
        if self.high_water < capacity as u64 {
            self.values[self.high_water as usize] = value;
        } else {
            self.values[self.head] = value;
            self.head = (self.head + 1) % capacity;
        }
        self.high_water += 1;
    }

    /// Number of buffer slots holding real samples.
    fn filled(&self) -> usize {
        self.high_water.min(self.values.len() as u64) as usize
    }

    /// Sample at logical position `i`, where 0 is the oldest retained sample.
    fn at(&self, i: usize) -> f64 {
        self.values[(self.head + i) % self.values.len()]
    }

    /// The most recent `requested_capacity` samples, oldest first.
    ///
    /// Until that many samples exist the front of the window is padded with
    /// [`NO_DATA`].
    pub fn display_window(&self) -> Vec<f64> {
        let filled = self.filled();
        let count = filled.min(self.requested);

        let mut window = Vec::with_capacity(self.requested);
        window.resize(self.requested - count, NO_DATA);
        window.extend((filled - count..filled).map(|i| self.at(i)));
        window
    }

    /// Moving average of the display window over `window_size` samples.
    ///
    /// Near the start of the stream the average is taken over however many
    /// samples the window holds so far. Output slots past the available
    /// history are [`NO_DATA`]. A window of 0 or 1 returns the display window.
    pub fn smoothed(&self, window_size: usize) -> Vec<f64> {
        if window_size <= 1 {
            return self.display_window();
        }

        // A window can never hold more than the retained history.
        let window_size = window_size.min(self.values.len());
        let filled = self.filled();
        let start = filled.saturating_sub(self.requested.saturating_add(window_size));
        let display_start = filled.saturating_sub(self.requested);

        let mut window = FifoSum::new(window_size);
        let mut series = Vec::with_capacity(self.requested);

        for i in start..filled {
            window.push(self.at(i));
            if i >= display_start {
                series.push(window.average());
            }
        }

        series.resize(self.requested, NO_DATA);
        series
    }
}
