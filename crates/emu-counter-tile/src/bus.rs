//! Bus adapter: pure bit routing between the tile pins and the core.
//!
//! `uo_out` always carries the count. `uio_out` carries it only while OE is
//! set; otherwise the tile releases the bus (all `uio_oe` bits low) so
//! another participant can drive it. The adapter holds no state.

use counter_8bit::CounterInputs;

use crate::control::ControlWord;

/// Level driven onto a tri-state bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusDrive {
    Driven(u8),
    /// High impedance: the tile does not drive the bus.
    NotDriving,
}

impl BusDrive {
    /// Gate `value` onto the bus by a single output-enable bit.
    #[must_use]
    pub fn gate(value: u8, output_enable: bool) -> Self {
        if output_enable {
            Self::Driven(value)
        } else {
            Self::NotDriving
        }
    }

    #[must_use]
    pub fn is_driving(self) -> bool {
        matches!(self, Self::Driven(_))
    }

    #[must_use]
    pub fn value(self) -> Option<u8> {
        match self {
            Self::Driven(v) => Some(v),
            Self::NotDriving => None,
        }
    }

    /// Per-bit output enables, as on the `uio_oe` pins.
    #[must_use]
    pub fn oe_mask(self) -> u8 {
        if self.is_driving() { 0xFF } else { 0x00 }
    }

    /// Level seen on the wire when another participant drives `other`.
    ///
    /// Only meaningful when at most one side drives: a driven tile wins.
    #[must_use]
    pub fn resolve(self, other: u8) -> u8 {
        self.value().unwrap_or(other)
    }
}

/// Everything the tile drives, for one count value and control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusOutputs {
    /// Observation bus, always driven.
    pub uo_out: u8,
    /// Bidirectional bus output path.
    pub uio_out: BusDrive,
}

impl BusOutputs {
    #[must_use]
    pub fn uio_oe(&self) -> u8 {
        self.uio_out.oe_mask()
    }
}

/// Drive the output pins from the current count.
#[must_use]
pub fn drive_outputs(count: u8, control: ControlWord) -> BusOutputs {
    BusOutputs {
        uo_out: count,
        uio_out: BusDrive::gate(count, control.output_enable),
    }
}

/// Route the control word and `uio_in` into the core's synchronous inputs.
#[must_use]
pub fn core_inputs(control: ControlWord, uio_in: u8) -> CounterInputs {
    CounterInputs {
        load: control.load,
        enable: control.enable,
        data: uio_in,
    }
}
