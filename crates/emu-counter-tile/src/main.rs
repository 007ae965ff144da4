//! Counter tile binary.
//!
//! Runs the tile headless and prints one trace line per clock edge, runs
//! the built-in bring-up bench, or serves JSON-RPC over stdio.

use std::path::PathBuf;
use std::process;

use emu_counter_tile::mcp::McpServer;
use emu_counter_tile::{CounterTile, DEFAULT_CLOCK_HZ, TileConfig, bench, parse_byte, parse_u64};

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

struct CliArgs {
    mcp: bool,
    script_path: Option<PathBuf>,
    bench: bool,
    ticks: u64,
    ui_in: u8,
    uio_in: u8,
    clock_hz: u64,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        mcp: false,
        script_path: None,
        bench: false,
        ticks: 16,
        ui_in: 0,
        uio_in: 0,
        clock_hz: DEFAULT_CLOCK_HZ,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--mcp" => {
                cli.mcp = true;
            }
            "--script" => {
                i += 1;
                cli.script_path = args.get(i).map(PathBuf::from);
            }
            "--bench" => {
                cli.bench = true;
            }
            "--ticks" => {
                i += 1;
                cli.ticks = value_or_exit(args.get(i), "--ticks", |s| {
                    parse_u64(s).map_err(|e| e.to_string())
                });
            }
            "--ui" => {
                i += 1;
                cli.ui_in = value_or_exit(args.get(i), "--ui", |s| {
                    parse_byte(s).map_err(|e| e.to_string())
                });
            }
            "--uio" => {
                i += 1;
                cli.uio_in = value_or_exit(args.get(i), "--uio", |s| {
                    parse_byte(s).map_err(|e| e.to_string())
                });
            }
            "--clock-hz" => {
                i += 1;
                cli.clock_hz = value_or_exit(args.get(i), "--clock-hz", |s| {
                    parse_u64(s).map_err(|e| e.to_string())
                });
            }
            "--help" | "-h" => {
                eprintln!("Usage: emu-counter-tile [OPTIONS]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --ticks <n>          Clock edges to run after reset [default: 16]");
                eprintln!("  --ui <byte>          Control word: bit0=EN bit1=LOAD bit2=OE [default: 0]");
                eprintln!("  --uio <byte>         Bidirectional bus input (load data) [default: 0]");
                eprintln!("  --clock-hz <hz>      Clock frequency for timestamps [default: 50000000]");
                eprintln!("  --bench              Run the built-in bring-up bench");
                eprintln!("  --mcp                Run as MCP server (JSON-RPC over stdio)");
                eprintln!("  --script <file>      Run a JSON script file (headless batch mode)");
                eprintln!();
                eprintln!("Bytes accept decimal, 0x-hex or $-hex. Set RUST_LOG=debug for tile logs.");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn value_or_exit<T>(arg: Option<&String>, flag: &str, parse: impl Fn(&str) -> Result<T, String>) -> T {
    let Some(text) = arg else {
        eprintln!("{flag} needs a value");
        process::exit(1);
    };
    match parse(text) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{flag}: {e}");
            process::exit(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Headless mode
// ---------------------------------------------------------------------------

fn run_headless(cli: &CliArgs, config: &TileConfig) {
    let mut tile = CounterTile::new(config);
    tile.pulse_reset();
    tile.set_uio_in(cli.uio_in);
    tile.set_ui_in(cli.ui_in);

    println!("tick       ns  uo_out  uio_out  uio_oe");
    print_trace_line(&tile);
    for _ in 0..cli.ticks {
        tile.tick();
        print_trace_line(&tile);
    }
}

fn print_trace_line(tile: &CounterTile) {
    let uio = tile
        .uio_out()
        .value()
        .map_or_else(|| "zz".to_string(), |v| format!("{v:02x}"));
    println!(
        "{:>4} {:>8}      {:02x}       {uio}      {:02x}",
        tile.ticks().get(),
        tile.elapsed_ns(),
        tile.uo_out(),
        tile.uio_oe()
    );
}

fn main() {
    env_logger::init();
    let cli = parse_args();

    let config = match TileConfig::with_clock_hz(cli.clock_hz) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            process::exit(1);
        }
    };

    if cli.mcp {
        let mut server = McpServer::new(config);
        server.run();
        return;
    }

    if let Some(ref path) = cli.script_path {
        let mut server = McpServer::new(config);
        if let Err(e) = server.run_script(path) {
            eprintln!("Script error: {e}");
            process::exit(1);
        }
        return;
    }

    if cli.bench {
        let mut tile = CounterTile::new(&config);
        match bench::counter_basic(&mut tile) {
            Ok(()) => eprintln!("counter_basic: PASS ({} ns)", tile.elapsed_ns()),
            Err(failures) => {
                for failure in &failures {
                    eprintln!("  {failure}");
                }
                eprintln!("counter_basic: FAIL ({} checks)", failures.len());
                process::exit(1);
            }
        }
        return;
    }

    run_headless(&cli, &config);
}
