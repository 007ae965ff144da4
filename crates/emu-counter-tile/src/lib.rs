//! 8-bit counter tile.
//!
//! Wraps the `counter-8bit` core in the pin set of a small ASIC/FPGA tile:
//! a control word on `ui_in`, a bidirectional bus on `uio_*`, a dedicated
//! observation bus on `uo_out` and an active-low `rst_n` pad. All logic
//! lives in the core; the tile only routes bits and gates the bus.

pub mod bench;
mod bus;
mod config;
mod control;
pub mod mcp;
mod tile;

pub use bus::{BusDrive, BusOutputs, core_inputs, drive_outputs};
pub use config::{DEFAULT_CLOCK_HZ, TileConfig, TileError, parse_u64};
pub use control::{ControlWord, UI_EN, UI_LOAD, UI_OE, parse_byte};
pub use tile::CounterTile;
