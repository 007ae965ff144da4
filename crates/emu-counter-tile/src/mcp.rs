//! MCP (Model Context Protocol) server for the counter tile.
//!
//! Exposes the tile as a JSON-RPC 2.0 server over stdin/stdout so scripts
//! and agents can drive pins, step the clock, and observe outputs.
//!
//! # Protocol
//!
//! Reads newline-delimited JSON-RPC 2.0 requests from stdin, writes
//! responses to stdout. Script files are a JSON array of
//! `{ "method": ..., "params": ... }` steps dispatched in order.

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use emu_core::{Observable, Ticks};

use crate::bench;
use crate::config::TileConfig;
use crate::tile::CounterTile;

// ---------------------------------------------------------------------------
// JSON-RPC types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RpcRequest {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: JsonValue,
    id: JsonValue,
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    id: JsonValue,
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const SERVER_ERROR: i32 = -32000;

impl RpcResponse {
    fn success(id: JsonValue, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0",
            result: Some(result),
            error: None,
            id,
        }
    }

    fn error(id: JsonValue, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(RpcError { code, message }),
            id,
        }
    }
}

/// A single step in a script file.
#[derive(Deserialize)]
struct ScriptStep {
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

// ---------------------------------------------------------------------------
// MCP Server
// ---------------------------------------------------------------------------

/// MCP server wrapping a headless counter tile.
pub struct McpServer {
    config: TileConfig,
    tile: Option<CounterTile>,
}

impl McpServer {
    #[must_use]
    pub fn new(config: TileConfig) -> Self {
        Self { config, tile: None }
    }

    #[must_use]
    pub fn tile(&self) -> Option<&CounterTile> {
        self.tile.as_ref()
    }

    /// Run the server loop: read JSON-RPC from stdin, write responses to stdout.
    pub fn run(&mut self) {
        log::info!("MCP server listening on stdio");
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut stdout = stdout.lock();

        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = self.handle_line(line);
            let _ = writeln!(
                stdout,
                "{}",
                serde_json::to_string(&response).unwrap_or_default()
            );
            let _ = stdout.flush();
        }
        log::info!("MCP server input closed");
    }

    /// Parse and dispatch one request line.
    pub fn handle_line(&mut self, line: &str) -> RpcResponse {
        let request: RpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                return RpcResponse::error(JsonValue::Null, PARSE_ERROR, format!("Parse error: {e}"));
            }
        };

        if request.jsonrpc != "2.0" {
            return RpcResponse::error(
                request.id,
                INVALID_REQUEST,
                "Invalid JSON-RPC version".to_string(),
            );
        }

        self.dispatch(&request.method, &request.params, request.id)
    }

    /// Dispatch a method call to the appropriate handler.
    pub fn dispatch(&mut self, method: &str, params: &JsonValue, id: JsonValue) -> RpcResponse {
        log::debug!("dispatch {method}");
        match method {
            "power_on" => self.handle_power_on(params, id),
            "reset" => self.handle_reset(params, id),
            "set_reset" => self.handle_set_reset(params, id),
            "set_inputs" => self.handle_set_inputs(params, id),
            "step_ticks" => self.handle_step_ticks(params, id),
            "outputs" => self.handle_outputs(id),
            "query" => self.handle_query(params, id),
            "run_bench" => self.handle_run_bench(id),
            _ => RpcResponse::error(id, METHOD_NOT_FOUND, format!("Unknown method: {method}")),
        }
    }

    /// Run a JSON script file, printing one response line per step.
    pub fn run_script(&mut self, path: &Path) -> io::Result<()> {
        let data = std::fs::read_to_string(path)?;
        log::info!("running script {}", path.display());
        let stdout = io::stdout();
        let mut stdout = stdout.lock();
        self.execute_script(&data, &mut stdout)
    }

    /// Dispatch every step of a JSON script, writing responses to `out`.
    pub fn execute_script<W: Write>(&mut self, script: &str, out: &mut W) -> io::Result<()> {
        let steps: Vec<ScriptStep> = serde_json::from_str(script)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        for (i, step) in steps.iter().enumerate() {
            let id = JsonValue::from(i as u64 + 1);
            let params = step
                .params
                .clone()
                .unwrap_or(JsonValue::Object(serde_json::Map::default()));
            let response = self.dispatch(&step.method, &params, id);
            if let Some(ref error) = response.error {
                log::warn!("script step {} ({}) failed: {}", i + 1, step.method, error.message);
            }
            writeln!(out, "{}", serde_json::to_string(&response).unwrap_or_default())?;
        }
        out.flush()
    }

    /// Ensure a tile exists, returning a mutable reference.
    fn require_tile(&mut self, id: &JsonValue) -> Result<&mut CounterTile, RpcResponse> {
        match self.tile.as_mut() {
            Some(tile) => Ok(tile),
            None => Err(RpcResponse::error(
                id.clone(),
                SERVER_ERROR,
                "No tile powered on. Call 'power_on' first.".to_string(),
            )),
        }
    }

    // === Tool handlers ===

    fn handle_power_on(&mut self, params: &JsonValue, id: JsonValue) -> RpcResponse {
        if let Some(hz) = params.get("clock_hz") {
            match hz.as_u64().map(TileConfig::with_clock_hz) {
                Some(Ok(config)) => self.config = config,
                Some(Err(e)) => return RpcResponse::error(id, INVALID_PARAMS, e.to_string()),
                None => {
                    return RpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        "'clock_hz' must be an unsigned integer".to_string(),
                    );
                }
            }
        }
        self.tile = Some(CounterTile::new(&self.config));
        log::info!("tile powered on at {} Hz", self.config.clock.frequency_hz);
        RpcResponse::success(
            id,
            serde_json::json!({"status": "ok", "clock_hz": self.config.clock.frequency_hz}),
        )
    }

    fn handle_reset(&mut self, params: &JsonValue, id: JsonValue) -> RpcResponse {
        let ticks = match u64_param(params, "ticks") {
            Ok(t) => t,
            Err(msg) => return RpcResponse::error(id, INVALID_PARAMS, msg),
        };
        let tile = match self.require_tile(&id) {
            Ok(t) => t,
            Err(e) => return e,
        };
        match ticks {
            Some(t) => tile.pulse_reset_for(t),
            None => tile.pulse_reset(),
        }
        RpcResponse::success(id, outputs_json(tile))
    }

    fn handle_set_reset(&mut self, params: &JsonValue, id: JsonValue) -> RpcResponse {
        let Some(active) = params.get("active").and_then(JsonValue::as_bool) else {
            return RpcResponse::error(
                id,
                INVALID_PARAMS,
                "Missing boolean 'active' parameter".to_string(),
            );
        };
        let tile = match self.require_tile(&id) {
            Ok(t) => t,
            Err(e) => return e,
        };
        tile.set_rst_n(!active);
        RpcResponse::success(id, outputs_json(tile))
    }

    fn handle_set_inputs(&mut self, params: &JsonValue, id: JsonValue) -> RpcResponse {
        let (ui_in, uio_in) = match (byte_param(params, "ui_in"), byte_param(params, "uio_in")) {
            (Ok(ui), Ok(uio)) => (ui, uio),
            (Err(msg), _) | (_, Err(msg)) => {
                return RpcResponse::error(id, INVALID_PARAMS, msg);
            }
        };
        let tile = match self.require_tile(&id) {
            Ok(t) => t,
            Err(e) => return e,
        };
        if let Some(v) = uio_in {
            tile.set_uio_in(v);
        }
        if let Some(v) = ui_in {
            tile.set_ui_in(v);
        }
        RpcResponse::success(id, outputs_json(tile))
    }

    fn handle_step_ticks(&mut self, params: &JsonValue, id: JsonValue) -> RpcResponse {
        let count = match u64_param(params, "count") {
            Ok(c) => c.unwrap_or(1),
            Err(msg) => return RpcResponse::error(id, INVALID_PARAMS, msg),
        };
        let tile = match self.require_tile(&id) {
            Ok(t) => t,
            Err(e) => return e,
        };
        emu_core::Tickable::tick_n(tile, Ticks::new(count));
        RpcResponse::success(id, outputs_json(tile))
    }

    fn handle_outputs(&mut self, id: JsonValue) -> RpcResponse {
        match self.require_tile(&id) {
            Ok(tile) => RpcResponse::success(id, outputs_json(tile)),
            Err(e) => e,
        }
    }

    fn handle_query(&mut self, params: &JsonValue, id: JsonValue) -> RpcResponse {
        let tile = match self.require_tile(&id) {
            Ok(t) => t,
            Err(e) => return e,
        };

        let Some(path) = params.get("path").and_then(JsonValue::as_str) else {
            return RpcResponse::error(id, INVALID_PARAMS, "Missing 'path' parameter".to_string());
        };

        match tile.query(path) {
            Some(value) => RpcResponse::success(
                id,
                serde_json::json!({"path": path, "value": value, "text": value.to_string()}),
            ),
            None => RpcResponse::error(id, SERVER_ERROR, format!("Unknown query path: {path}")),
        }
    }

    fn handle_run_bench(&mut self, id: JsonValue) -> RpcResponse {
        let mut tile = CounterTile::new(&self.config);
        let result = bench::counter_basic(&mut tile);
        let failures = result.err().unwrap_or_default();
        RpcResponse::success(
            id,
            serde_json::json!({"passed": failures.is_empty(), "failures": failures}),
        )
    }
}

fn outputs_json(tile: &CounterTile) -> JsonValue {
    serde_json::json!({
        "uo_out": tile.uo_out(),
        "uio_out": tile.uio_out().value(),
        "uio_oe": tile.uio_oe(),
        "rst_n": tile.rst_n(),
        "ticks": tile.ticks().get(),
        "time_ns": tile.elapsed_ns(),
    })
}

fn u64_param(params: &JsonValue, key: &str) -> Result<Option<u64>, String> {
    match params.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| format!("'{key}' must be an unsigned integer")),
    }
}

fn byte_param(params: &JsonValue, key: &str) -> Result<Option<u8>, String> {
    match u64_param(params, key)? {
        None => Ok(None),
        Some(v) => u8::try_from(v)
            .map(Some)
            .map_err(|_| format!("'{key}' must be 0-255, got {v}")),
    }
}
