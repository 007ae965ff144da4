//! Observability trait for inspecting component state.
//!
//! Every model exposes its internal state for debugging and testbenches.
//! Queries never affect simulation state.

use std::fmt;

/// A dynamically-typed value for state queries.
///
/// With the `mcp` feature, values serialise untagged: bits as booleans,
/// buses and counters as numbers, high impedance as `null`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "mcp", derive(serde::Serialize), serde(untagged))]
pub enum Value {
    /// Single-bit signal.
    Bool(bool),
    /// 8-bit bus or register.
    U8(u8),
    /// 64-bit counter (ticks, nanoseconds).
    U64(u64),
    /// Bus released to high impedance.
    HighZ,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", u8::from(*v)),
            Value::U8(v) => write!(f, "{v:#04X}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::HighZ => write!(f, "ZZ"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<Option<u8>> for Value {
    fn from(v: Option<u8>) -> Self {
        v.map_or(Value::HighZ, Value::U8)
    }
}

/// A component whose state can be inspected.
pub trait Observable {
    /// Query a specific signal or register by path.
    ///
    /// Paths are hierarchical, separated by dots:
    /// - `count` - Counter register
    /// - `uio_oe` - Bidirectional bus output enables
    /// - `core.count` - Counter register seen through its wrapper
    ///
    /// Returns `None` if the path is not recognised.
    fn query(&self, path: &str) -> Option<Value>;

    /// List all available query paths.
    fn query_paths(&self) -> &'static [&'static str];
}
