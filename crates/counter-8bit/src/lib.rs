//! 8-bit synchronous up-counter.
//!
//! One register, updated on each rising clock edge. Inputs are resolved in
//! strict priority order:
//!
//! | Priority | Input   | Kind          | Effect                      |
//! |----------|---------|---------------|-----------------------------|
//! | 1        | reset   | asynchronous  | count = 0, held while high  |
//! | 2        | load    | synchronous   | count = data                |
//! | 3        | enable  | synchronous   | count = count + 1 (wraps)   |
//! | -        | (none)  |               | count unchanged             |
//!
//! Reset is level-sensitive and clock-independent: asserting it clears the
//! register at once, between edges, and every edge while it stays asserted
//! leaves the register at zero. There is no carry out.

use emu_core::{Observable, Tickable, Value};

/// Synchronous inputs sampled on the next rising edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterInputs {
    /// Parallel load strobe. Wins over `enable`.
    pub load: bool,
    /// Count enable.
    pub enable: bool,
    /// Parallel load data, only sampled while `load` is high.
    pub data: u8,
}

/// Register value after one rising edge with reset released.
///
/// [`Counter8::tick`] is exactly this function applied to the stored count,
/// once reset has been ruled out.
#[must_use]
pub fn next_count(count: u8, inputs: &CounterInputs) -> u8 {
    if inputs.load {
        inputs.data
    } else if inputs.enable {
        count.wrapping_add(1)
    } else {
        count
    }
}

/// 8-bit counter with parallel load, count enable and asynchronous reset.
#[derive(Debug, Clone, Default)]
pub struct Counter8 {
    /// The only stored state.
    count: u8,
    /// Asynchronous reset level (active-high).
    reset: bool,
    /// Synchronous inputs for the next edge.
    inputs: CounterInputs,
}

impl Counter8 {
    /// Create a powered-up counter: count 0, all inputs low.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive the asynchronous reset level.
    ///
    /// Asserting clears the count immediately, without waiting for an edge.
    pub fn set_reset(&mut self, active: bool) {
        self.reset = active;
        if active {
            self.count = 0;
        }
    }

    pub fn set_load(&mut self, load: bool) {
        self.inputs.load = load;
    }

    pub fn set_enable(&mut self, enable: bool) {
        self.inputs.enable = enable;
    }

    pub fn set_data(&mut self, data: u8) {
        self.inputs.data = data;
    }

    /// Replace all synchronous inputs at once.
    pub fn set_inputs(&mut self, inputs: CounterInputs) {
        self.inputs = inputs;
    }

    /// One rising clock edge.
    pub fn tick(&mut self) {
        self.count = if self.reset {
            0
        } else {
            next_count(self.count, &self.inputs)
        };
    }

    /// Current register value. Stable between edges.
    #[must_use]
    pub fn count(&self) -> u8 {
        self.count
    }

    #[must_use]
    pub fn reset_active(&self) -> bool {
        self.reset
    }

    #[must_use]
    pub fn inputs(&self) -> CounterInputs {
        self.inputs
    }
}

impl Tickable for Counter8 {
    fn tick(&mut self) {
        Counter8::tick(self);
    }
}

impl Observable for Counter8 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "count" => Some(self.count.into()),
            "reset" => Some(self.reset.into()),
            "load" => Some(self.inputs.load.into()),
            "enable" => Some(self.inputs.enable.into()),
            "data" => Some(self.inputs.data.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &["count", "reset", "load", "enable", "data"]
    }
}
