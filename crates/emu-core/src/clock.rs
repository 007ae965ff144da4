//! Clock domain configuration.

use crate::Ticks;

/// Frequency of the single clock domain that drives a design.
///
/// Only used to convert edge counts into wall time for traces and
/// testbench timestamps. Behaviour never depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterClock {
    /// Clock frequency in Hz (e.g., `50_000_000` for a 20 ns period).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Clock period in picoseconds (integer division, 0 for a zero clock).
    #[must_use]
    pub const fn period_ps(&self) -> u64 {
        if self.frequency_hz == 0 {
            0
        } else {
            1_000_000_000_000 / self.frequency_hz
        }
    }

    /// Wall time covered by `ticks` edges, in nanoseconds.
    #[must_use]
    pub const fn ticks_to_ns(&self, ticks: Ticks) -> u64 {
        ticks.get().saturating_mul(self.period_ps()) / 1_000
    }
}
