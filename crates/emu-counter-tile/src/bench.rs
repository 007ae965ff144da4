//! Built-in bring-up bench.
//!
//! Programs the counter through the pins exactly as a tester on the real
//! tile would: reset, load 0xF0, count three edges, then toggle OE and
//! watch `uio_oe` follow without a clock.

use crate::bus::BusDrive;
use crate::control::{UI_EN, UI_LOAD, UI_OE};
use crate::tile::CounterTile;

/// Value parallel-loaded by [`counter_basic`].
pub const LOAD_VALUE: u8 = 0xF0;

/// Edges counted after the load.
pub const COUNT_EDGES: u8 = 3;

/// Run the bring-up sequence and collect every failed check.
pub fn counter_basic(tile: &mut CounterTile) -> Result<(), Vec<String>> {
    let mut failures = Vec::new();
    let mut check = |ok: bool, message: String| {
        if !ok {
            log::warn!("bench check failed: {message}");
            failures.push(message);
        }
    };

    tile.pulse_reset();

    // OE=1, EN=0, LOAD=0
    let ui = UI_OE;
    tile.set_ui_in(ui);
    check(
        tile.uo_out() == 0,
        format!("after reset got {:02x}", tile.uo_out()),
    );

    tile.set_uio_in(LOAD_VALUE);
    tile.set_ui_in(ui | UI_LOAD);
    tile.tick();
    tile.set_ui_in(ui);
    check(
        tile.uo_out() == LOAD_VALUE,
        format!("after load got {:02x}", tile.uo_out()),
    );

    tile.set_ui_in(ui | UI_EN);
    for _ in 0..COUNT_EDGES {
        tile.tick();
    }
    let expected = LOAD_VALUE.wrapping_add(COUNT_EDGES);
    check(
        tile.uo_out() == expected,
        format!("after {COUNT_EDGES} inc got {:02x}", tile.uo_out()),
    );

    tile.set_ui_in((ui & !UI_OE) | UI_EN);
    check(
        tile.uio_oe() == 0x00,
        format!("uio_oe expected 00 got {:02x}", tile.uio_oe()),
    );
    check(
        tile.uio_out() == BusDrive::NotDriving,
        "uio_out still driven with OE=0".to_string(),
    );

    tile.set_ui_in(tile.ui_in() | UI_OE);
    check(
        tile.uio_oe() == 0xFF,
        format!("uio_oe expected ff got {:02x}", tile.uio_oe()),
    );
    check(
        tile.uio_out() == BusDrive::Driven(expected),
        format!("uio_out expected {expected:02x} got {:?}", tile.uio_out()),
    );

    if failures.is_empty() {
        log::info!("counter_basic passed at {} ns", tile.elapsed_ns());
        Ok(())
    } else {
        Err(failures)
    }
}
