//! Top-level counter tile.
//!
//! Pins are sampled the moment they change: control and data flow straight
//! into the core's synchronous inputs, the reset pad straight into its
//! asynchronous reset. Outputs are combinational functions of the count and
//! the current control word, so toggling OE moves `uio_oe` without a clock
//! edge.

use counter_8bit::Counter8;
use emu_core::{MasterClock, Observable, Tickable, Ticks, Value};

use crate::bus::{self, BusDrive, BusOutputs};
use crate::config::TileConfig;
use crate::control::ControlWord;

/// Counter core plus its pin-level wrapper.
#[derive(Debug, Clone)]
pub struct CounterTile {
    core: Counter8,
    clock: MasterClock,
    reset_ticks: u64,
    /// Reset pad, active-low.
    rst_n: bool,
    ui_in: u8,
    uio_in: u8,
    /// Rising edges since power-up.
    ticks: Ticks,
}

impl CounterTile {
    /// Power up a tile: reset released, all inputs low, count 0.
    #[must_use]
    pub fn new(config: &TileConfig) -> Self {
        Self {
            core: Counter8::new(),
            clock: config.clock,
            reset_ticks: config.reset_ticks,
            rst_n: true,
            ui_in: 0,
            uio_in: 0,
            ticks: Ticks::ZERO,
        }
    }

    /// Drive the active-low reset pad.
    pub fn set_rst_n(&mut self, level: bool) {
        if level != self.rst_n {
            if level {
                log::debug!("reset released at tick {}", self.ticks.get());
            } else {
                log::debug!(
                    "reset asserted at tick {} (count was {:#04X})",
                    self.ticks.get(),
                    self.core.count()
                );
            }
        }
        self.rst_n = level;
        self.core.set_reset(!level);
    }

    pub fn set_ui_in(&mut self, ui_in: u8) {
        self.ui_in = ui_in;
        self.route_inputs();
    }

    pub fn set_uio_in(&mut self, uio_in: u8) {
        self.uio_in = uio_in;
        self.route_inputs();
    }

    fn route_inputs(&mut self) {
        self.core
            .set_inputs(bus::core_inputs(self.control(), self.uio_in));
    }

    /// One rising clock edge.
    pub fn tick(&mut self) {
        let before = self.core.count();
        self.core.tick();
        self.ticks += Ticks::new(1);

        let control = self.control();
        if self.rst_n && control.load {
            log::debug!(
                "tick {}: load {:#04X} (was {before:#04X})",
                self.ticks.get(),
                self.uio_in
            );
        }
        log::trace!(
            "tick {}: count {before:#04X} -> {:#04X}",
            self.ticks.get(),
            self.core.count()
        );
    }

    /// Hold reset for the configured number of edges with the inputs
    /// quiet, then release it.
    pub fn pulse_reset(&mut self) {
        self.pulse_reset_for(self.reset_ticks);
    }

    pub fn pulse_reset_for(&mut self, ticks: u64) {
        self.set_ui_in(0);
        self.set_uio_in(0);
        self.set_rst_n(false);
        for _ in 0..ticks {
            self.tick();
        }
        self.set_rst_n(true);
    }

    #[must_use]
    pub fn control(&self) -> ControlWord {
        ControlWord::from(self.ui_in)
    }

    #[must_use]
    pub fn outputs(&self) -> BusOutputs {
        bus::drive_outputs(self.core.count(), self.control())
    }

    /// Observation bus.
    #[must_use]
    pub fn uo_out(&self) -> u8 {
        self.outputs().uo_out
    }

    /// Bidirectional bus output path.
    #[must_use]
    pub fn uio_out(&self) -> BusDrive {
        self.outputs().uio_out
    }

    #[must_use]
    pub fn uio_oe(&self) -> u8 {
        self.outputs().uio_oe()
    }

    #[must_use]
    pub fn rst_n(&self) -> bool {
        self.rst_n
    }

    #[must_use]
    pub fn ui_in(&self) -> u8 {
        self.ui_in
    }

    #[must_use]
    pub fn uio_in(&self) -> u8 {
        self.uio_in
    }

    #[must_use]
    pub fn ticks(&self) -> Ticks {
        self.ticks
    }

    /// Simulated time since power-up.
    #[must_use]
    pub fn elapsed_ns(&self) -> u64 {
        self.clock.ticks_to_ns(self.ticks)
    }

    #[must_use]
    pub fn core(&self) -> &Counter8 {
        &self.core
    }
}

impl Tickable for CounterTile {
    fn tick(&mut self) {
        CounterTile::tick(self);
    }
}

impl Observable for CounterTile {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("core.") {
            return self.core.query(rest);
        }
        match path {
            "uo_out" => Some(self.uo_out().into()),
            "uio_out" => Some(self.uio_out().value().into()),
            "uio_oe" => Some(self.uio_oe().into()),
            "ui_in" => Some(self.ui_in.into()),
            "uio_in" => Some(self.uio_in.into()),
            "rst_n" => Some(self.rst_n.into()),
            "ticks" => Some(self.ticks.get().into()),
            "elapsed_ns" => Some(self.elapsed_ns().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "core.<counter_paths>",
            "uo_out",
            "uio_out",
            "uio_oe",
            "ui_in",
            "uio_in",
            "rst_n",
            "ticks",
            "elapsed_ns",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{UI_EN, UI_LOAD, UI_OE};

    fn make_tile() -> CounterTile {
        CounterTile::new(&TileConfig::default())
    }

    #[test]
    fn powers_up_released_at_zero() {
        let tile = make_tile();
        assert!(tile.rst_n());
        assert_eq!(tile.uo_out(), 0);
        assert_eq!(tile.uio_out(), BusDrive::NotDriving);
        assert_eq!(tile.ticks(), Ticks::ZERO);
    }

    #[test]
    fn rst_n_low_clears_between_edges() {
        let mut tile = make_tile();
        tile.set_ui_in(UI_EN);
        tile.tick_n(Ticks::new(9));
        assert_eq!(tile.uo_out(), 9);
        tile.set_rst_n(false);
        assert_eq!(tile.uo_out(), 0);
        assert_eq!(tile.ticks().get(), 9, "reset must not need a clock edge");
    }

    #[test]
    fn pulse_reset_quiets_inputs_and_releases() {
        let mut tile = make_tile();
        tile.set_ui_in(UI_EN | UI_OE);
        tile.set_uio_in(0x77);
        tile.tick_n(Ticks::new(4));
        tile.pulse_reset_for(2);
        assert!(tile.rst_n());
        assert_eq!(tile.ui_in(), 0);
        assert_eq!(tile.uio_in(), 0);
        assert_eq!(tile.uo_out(), 0);
        assert_eq!(tile.ticks().get(), 6);
    }

    #[test]
    fn load_from_uio_in() {
        let mut tile = make_tile();
        tile.set_uio_in(200);
        tile.set_ui_in(UI_LOAD | UI_EN);
        tile.tick();
        assert_eq!(tile.uo_out(), 200);
    }

    #[test]
    fn oe_gates_bus_without_a_tick() {
        let mut tile = make_tile();
        tile.set_ui_in(UI_EN);
        tile.tick_n(Ticks::new(3));
        assert_eq!(tile.uio_oe(), 0x00);
        assert_eq!(tile.uio_out().value(), None);

        tile.set_ui_in(UI_EN | UI_OE);
        assert_eq!(tile.uio_oe(), 0xFF);
        assert_eq!(tile.uio_out(), BusDrive::Driven(3));
        assert_eq!(tile.uo_out(), 3);
    }

    #[test]
    fn elapsed_time_follows_clock() {
        let mut tile = make_tile();
        tile.tick_n(Ticks::new(5));
        assert_eq!(tile.elapsed_ns(), 100);
    }

    #[test]
    fn observable_routes_core_paths() {
        let mut tile = make_tile();
        tile.set_ui_in(UI_EN);
        tile.tick();
        assert_eq!(tile.query("core.count"), Some(Value::U8(1)));
        assert_eq!(tile.query("core.enable"), Some(Value::Bool(true)));
        assert_eq!(tile.query("uio_out"), Some(Value::HighZ));
        assert_eq!(tile.query("ticks"), Some(Value::U64(1)));
        assert_eq!(tile.query("bogus"), None);
    }
}
