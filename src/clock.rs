#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Converts a simulation time in milliseconds into seconds.
#[inline]
pub(crate) fn millis_to_seconds(time: i64) -> f64 {
    time as f64 / 1000.0
}

/// The simulation time, in integer milliseconds, and the step it advances by.
///
/// # Example
/// ```
/// use astrarium::SimulationClock;
///
/// let mut clock = SimulationClock::new(1_000);
/// clock.tick();
/// clock.warp(4);
///
/// assert_eq!(clock.get(), 5_000);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationClock {
    time: i64,
    time_step: i64,
}

impl SimulationClock {
    /// Creates a clock at time zero advancing by `time_step` milliseconds per tick.
    pub fn new(time_step: i64) -> SimulationClock {
        SimulationClock { time: 0, time_step }
    }

    /// Gets the current time, in milliseconds.
    pub fn get(&self) -> i64 {
        self.time
    }

    /// Sets the current time, in milliseconds.
    pub fn set(&mut self, time: i64) {
        self.time = time;
    }

    /// Gets the length of one tick, in milliseconds.
    pub fn time_step(&self) -> i64 {
        self.time_step
    }

    /// Sets the length of one tick, in milliseconds.
    pub fn set_time_step(&mut self, time_step: i64) {
        self.time_step = time_step;
    }

    /// Advances the clock by one tick and returns the new time.
    pub fn tick(&mut self) -> i64 {
        self.warp(1)
    }

    /// Advances the clock by multiple ticks and returns the new time.
    ///
    /// Saturates instead of overflowing.
    pub fn warp(&mut self, ticks: u32) -> i64 {
        self.time = self
            .time
            .saturating_add(self.time_step.saturating_mul(i64::from(ticks)));
        self.time
    }
}
