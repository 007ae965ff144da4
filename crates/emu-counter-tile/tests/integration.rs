//! End-to-end tests for the counter tile.
//!
//! Everything here goes through the pins (`rst_n`, `ui_in`, `uio_in`) and
//! checks the pins (`uo_out`, `uio_out`, `uio_oe`), the way a tester on
//! the real tile would.

use emu_core::{Tickable, Ticks};
use emu_counter_tile::mcp::McpServer;
use emu_counter_tile::{BusDrive, CounterTile, TileConfig, UI_EN, UI_LOAD, UI_OE, bench};

fn make_tile() -> CounterTile {
    let mut tile = CounterTile::new(&TileConfig::default());
    tile.pulse_reset();
    tile
}

/// Park the counter at `value` with a one-edge load, leaving inputs idle.
fn load(tile: &mut CounterTile, value: u8) {
    tile.set_uio_in(value);
    tile.set_ui_in(UI_LOAD);
    tile.tick();
    tile.set_ui_in(0);
    assert_eq!(tile.uo_out(), value);
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

#[test]
fn reset_forces_zero_for_every_input_combination() {
    for start in [0x00u8, 0x01, 0x80, 0xFF] {
        for ui in 0..8u8 {
            let mut tile = make_tile();
            load(&mut tile, start);
            tile.set_uio_in(0xC3);
            tile.set_ui_in(ui);
            tile.set_rst_n(false);
            assert_eq!(tile.uo_out(), 0, "immediate: start={start:#04X} ui={ui:#04X}");
            tile.tick();
            assert_eq!(tile.uo_out(), 0, "after edge: start={start:#04X} ui={ui:#04X}");
        }
    }
}

#[test]
fn held_reset_is_idempotent() {
    let mut tile = make_tile();
    load(&mut tile, 0x99);
    tile.set_ui_in(UI_EN | UI_LOAD);
    tile.set_rst_n(false);
    for _ in 0..20 {
        tile.tick();
        assert_eq!(tile.uo_out(), 0);
    }
    tile.set_rst_n(true);
    tile.set_ui_in(UI_EN);
    tile.tick();
    assert_eq!(tile.uo_out(), 1);
}

// ---------------------------------------------------------------------------
// Load, count, hold
// ---------------------------------------------------------------------------

#[test]
fn load_200_from_10() {
    let mut tile = make_tile();
    load(&mut tile, 10);
    tile.set_uio_in(200);
    tile.set_ui_in(UI_LOAD);
    tile.tick();
    assert_eq!(tile.uo_out(), 200);
}

#[test]
fn load_ignores_enable() {
    for start in [0u8, 10, 0xFF] {
        let mut tile = make_tile();
        load(&mut tile, start);
        tile.set_uio_in(0x3C);
        tile.set_ui_in(UI_LOAD | UI_EN);
        tile.tick();
        assert_eq!(tile.uo_out(), 0x3C, "start={start}");
    }
}

#[test]
fn enable_increments_every_state() {
    for start in 0..=255u8 {
        let mut tile = make_tile();
        load(&mut tile, start);
        tile.set_ui_in(UI_EN);
        tile.tick();
        assert_eq!(tile.uo_out(), start.wrapping_add(1));
    }
}

#[test]
fn idle_holds_every_state() {
    for start in 0..=255u8 {
        let mut tile = make_tile();
        load(&mut tile, start);
        tile.set_uio_in(!start);
        tile.set_ui_in(UI_OE);
        tile.tick_n(Ticks::new(3));
        assert_eq!(tile.uo_out(), start);
    }
}

#[test]
fn full_cycle_returns_to_zero_once() {
    let mut tile = make_tile();
    tile.set_ui_in(UI_EN);
    let mut zeros = 0;
    for n in 1..=256u32 {
        tile.tick();
        assert_eq!(u32::from(tile.uo_out()), n % 256);
        if tile.uo_out() == 0 {
            zeros += 1;
        }
    }
    assert_eq!(zeros, 1);
}

#[test]
fn unused_control_bits_have_no_effect() {
    let mut plain = make_tile();
    let mut noisy = make_tile();
    for step in 0..40u8 {
        let ui = match step % 4 {
            0 => UI_EN,
            1 => UI_LOAD | UI_OE,
            2 => UI_EN | UI_OE,
            _ => 0,
        };
        plain.set_uio_in(step.wrapping_mul(7));
        noisy.set_uio_in(step.wrapping_mul(7));
        plain.set_ui_in(ui);
        noisy.set_ui_in(ui | 0xF8);
        plain.tick();
        noisy.tick();
        assert_eq!(plain.outputs(), noisy.outputs(), "step {step}");
    }
}

// ---------------------------------------------------------------------------
// Tri-state bus
// ---------------------------------------------------------------------------

#[test]
fn bus_is_released_without_oe() {
    let mut tile = make_tile();
    load(&mut tile, 0x42);
    tile.set_ui_in(UI_EN);
    assert_eq!(tile.uio_out(), BusDrive::NotDriving);
    assert_eq!(tile.uio_oe(), 0x00);
    assert_eq!(tile.uio_out().resolve(0x5A), 0x5A);
    assert_eq!(tile.uo_out(), 0x42, "observation bus stays driven");
}

#[test]
fn bus_carries_count_with_oe() {
    let mut tile = make_tile();
    load(&mut tile, 0x42);
    tile.set_ui_in(UI_OE | UI_EN);
    for _ in 0..5 {
        assert_eq!(tile.uio_out(), BusDrive::Driven(tile.uo_out()));
        assert_eq!(tile.uio_oe(), 0xFF);
        tile.tick();
    }
}

// ---------------------------------------------------------------------------
// Bench and script
// ---------------------------------------------------------------------------

#[test]
fn counter_basic_bench_passes() {
    let mut tile = CounterTile::new(&TileConfig::default());
    assert_eq!(bench::counter_basic(&mut tile), Ok(()));
    // 1 reset edge + 1 load edge + 3 count edges at 20 ns
    assert_eq!(tile.ticks().get(), 5);
    assert_eq!(tile.elapsed_ns(), 100);
}

#[test]
fn bundled_script_replays_the_bench() {
    let script = include_str!("../scripts/counter_basic.json");
    let mut server = McpServer::new(TileConfig::default());
    let mut out = Vec::new();
    server
        .execute_script(script, &mut out)
        .expect("script should run");

    let lines: Vec<serde_json::Value> = String::from_utf8(out)
        .expect("utf8 output")
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 12);
    assert!(lines.iter().all(|l| l.get("error").is_none()));

    assert_eq!(lines[3]["result"]["value"], serde_json::json!(0));
    assert_eq!(lines[9]["result"]["uo_out"], serde_json::json!(0xF3));
    assert_eq!(lines[9]["result"]["uio_oe"], serde_json::json!(0x00));
    assert!(lines[9]["result"]["uio_out"].is_null());
    assert_eq!(lines[11]["result"]["uio_oe"], serde_json::json!(0xFF));
    assert_eq!(lines[11]["result"]["uio_out"], serde_json::json!(0xF3));
}
