//! Tile configuration.

use std::fmt;

use emu_core::MasterClock;

/// Default tile clock: 50 MHz (20 ns period).
pub const DEFAULT_CLOCK_HZ: u64 = 50_000_000;

/// Configuration for creating a [`CounterTile`](crate::CounterTile).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileConfig {
    /// Clock domain. Only affects reported time, never behaviour.
    pub clock: MasterClock,
    /// Clock edges `rst_n` is held low by `pulse_reset`.
    pub reset_ticks: u64,
}

impl TileConfig {
    /// Config with the given clock frequency and default reset length.
    pub fn with_clock_hz(frequency_hz: u64) -> Result<Self, TileError> {
        if frequency_hz == 0 {
            return Err(TileError::ZeroClock);
        }
        Ok(Self {
            clock: MasterClock::new(frequency_hz),
            ..Self::default()
        })
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            clock: MasterClock::new(DEFAULT_CLOCK_HZ),
            reset_ticks: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileError {
    /// Not a byte in decimal, `0x` or `$` notation.
    InvalidByte(String),
    /// Not a non-negative integer.
    InvalidNumber(String),
    ZeroClock,
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidByte(text) => write!(f, "invalid byte value: {text:?} (expected 0-255)"),
            Self::InvalidNumber(text) => write!(f, "invalid number: {text:?}"),
            Self::ZeroClock => write!(f, "clock frequency must be non-zero"),
        }
    }
}

impl std::error::Error for TileError {}

/// Parse a non-negative decimal integer.
pub fn parse_u64(text: &str) -> Result<u64, TileError> {
    text.trim()
        .parse()
        .map_err(|_| TileError::InvalidNumber(text.to_string()))
}
