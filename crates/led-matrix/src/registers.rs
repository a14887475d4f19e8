//! IS31FL3728 register map
//!
//! The controller behind the Troyka LED matrix module exposes a flat set of
//! 8-bit write-only registers. Every write is a two-byte I²C transaction:
//! `[register, value]`.
//!
//! | Offset        | Register        | Contents                                              |
//! |---------------|-----------------|-------------------------------------------------------|
//! | `0x00`        | Configuration   | bit 7 shutdown, bit 2 audio input, bits 1:0 size      |
//! | `0x01`–`0x0B` | Row data        | one column bitmap per row                             |
//! | `0x0C`        | Update          | write `0xFF` to latch row data onto the LEDs          |
//! | `0x0D`        | Lighting effect | bits 6:4 audio gain, bits 3:0 row current             |
//! | `0x0F`        | Audio equalizer | not used by this driver                               |
//!
//! # Latching
//!
//! Row data registers are shadow registers. Nothing changes on the LEDs until
//! the update register is written, so a frame is always sent as all visible
//! rows followed by one write of [`UPDATE_COMMIT`] to [`REG_UPDATE`].

// ---------------------------------------------------------------------------
// Bus address
// ---------------------------------------------------------------------------

/// Default 7-bit I²C address of the module (AD pin to GND).
pub const DEFAULT_ADDRESS: u8 = 0x60;

// ---------------------------------------------------------------------------
// Register addresses
// ---------------------------------------------------------------------------

/// Configuration register: shutdown, audio input enable, matrix size.
pub const REG_CONFIGURATION: u8 = 0x00;

/// First row data register. Row `n` lives at `REG_ROW_DATA + n`.
pub const REG_ROW_DATA: u8 = 0x01;

/// Last row data register (row 10).
pub const REG_ROW_DATA_LAST: u8 = 0x0B;

/// Number of row data registers.
pub const ROW_REGISTER_COUNT: u8 = 11;

/// Update register. Writing [`UPDATE_COMMIT`] latches the row data.
pub const REG_UPDATE: u8 = 0x0C;

/// Lighting effect register: audio gain and row current limit.
pub const REG_LIGHTING_EFFECT: u8 = 0x0D;

/// Audio equalizer register. Declared for completeness, never written.
pub const REG_AUDIO_EQUALIZER: u8 = 0x0F;

// ---------------------------------------------------------------------------
// Register field values
// ---------------------------------------------------------------------------

/// Value written to [`REG_UPDATE`] to latch a frame.
pub const UPDATE_COMMIT: u8 = 0xFF;

/// Configuration: software shutdown (bit 7).
pub const CONFIG_SHUTDOWN: u8 = 0b1000_0000;

/// Configuration: audio input enable (bit 2).
pub const CONFIG_AUDIO_INPUT: u8 = 0b0000_0100;

/// Configuration: matrix size selector field (bits 1:0).
pub const CONFIG_MATRIX_SIZE_MASK: u8 = 0b0000_0011;

/// Lighting effect: bit offset of the audio gain field.
pub const EFFECT_AUDIO_GAIN_SHIFT: u32 = 4;

/// Lighting effect: width mask of the audio gain field (before shifting).
pub const EFFECT_AUDIO_GAIN_MASK: u8 = 0b0111;

/// Lighting effect: row current limit field (bits 3:0).
pub const EFFECT_ROW_CURRENT_MASK: u8 = 0b0000_1111;

/// Row data register for `row`, or `None` past the last row register.
#[must_use]
pub const fn row_register(row: u8) -> Option<u8> {
    if row >= ROW_REGISTER_COUNT {
        None
    } else {
        Some(REG_ROW_DATA.wrapping_add(row))
    }
}
