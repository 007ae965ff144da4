//! Control word (`ui_in`) layout.
//!
//! | Bit | Name | Meaning                                   |
//! |-----|------|-------------------------------------------|
//! | 0   | EN   | Count enable                              |
//! | 1   | LOAD | Synchronous load from `uio_in`            |
//! | 2   | OE   | Drive `uio_out` (1) or release it (0)     |
//! | 3-7 |      | Unused, ignored                           |

use crate::config::TileError;

pub const UI_EN: u8 = 0x01;
pub const UI_LOAD: u8 = 0x02;
pub const UI_OE: u8 = 0x04;

/// Decoded control word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlWord {
    pub enable: bool,
    pub load: bool,
    pub output_enable: bool,
}

impl ControlWord {
    /// Pack back into a `ui_in` byte. Unused bits come back as zero.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        let mut byte = 0;
        if self.enable {
            byte |= UI_EN;
        }
        if self.load {
            byte |= UI_LOAD;
        }
        if self.output_enable {
            byte |= UI_OE;
        }
        byte
    }
}

impl From<u8> for ControlWord {
    fn from(ui_in: u8) -> Self {
        Self {
            enable: ui_in & UI_EN != 0,
            load: ui_in & UI_LOAD != 0,
            output_enable: ui_in & UI_OE != 0,
        }
    }
}

/// Parse a byte written as decimal, `0x`-hex or `$`-hex.
pub fn parse_byte(text: &str) -> Result<u8, TileError> {
    let text = text.trim();
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16)
    } else if let Some(hex) = text.strip_prefix('$') {
        u8::from_str_radix(hex, 16)
    } else {
        text.parse()
    };
    parsed.map_err(|_| TileError::InvalidByte(text.to_string()))
}
