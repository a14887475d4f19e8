//! Device configuration fields and register packing.
//!
//! Every field maps onto a fixed-width bit field of the configuration or
//! lighting effect register. Out-of-range raw values are masked to the field
//! width rather than rejected, the same way the hardware ignores the upper
//! bits of a register write:
//! - [`MatrixSize`]: 2 bits, selects one of four (width, height) layouts
//! - [`AudioGain`]: 3 bits, audio input gain in 3 dB steps
//! - [`CurrentLimit`]: 4 bits, row current limit
//!
//! [`Config`] bundles the cached state of both registers and packs it with
//! [`Config::configuration_register`] and [`Config::lighting_effect_register`].

use crate::registers::{
    CONFIG_AUDIO_INPUT, CONFIG_MATRIX_SIZE_MASK, CONFIG_SHUTDOWN, EFFECT_AUDIO_GAIN_MASK,
    EFFECT_AUDIO_GAIN_SHIFT, EFFECT_ROW_CURRENT_MASK,
};

// ── MatrixSize ───────────────────────────────────────────────────────────────

/// LED matrix geometry, as (columns × rows).
///
/// The discriminant is the 2-bit selector written to bits 1:0 of the
/// configuration register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MatrixSize {
    /// 8 columns × 8 rows.
    #[default]
    Size8x8 = 0,
    /// 7 columns × 9 rows.
    Size7x9 = 1,
    /// 6 columns × 10 rows.
    Size6x10 = 2,
    /// 5 columns × 11 rows.
    Size5x11 = 3,
}

impl MatrixSize {
    /// All sizes in selector order.
    pub const ALL: [Self; 4] = [Self::Size8x8, Self::Size7x9, Self::Size6x10, Self::Size5x11];

    /// Build from a raw selector, keeping only the low 2 bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & CONFIG_MATRIX_SIZE_MASK {
            0 => Self::Size8x8,
            1 => Self::Size7x9,
            2 => Self::Size6x10,
            _ => Self::Size5x11,
        }
    }

    /// The 2-bit selector value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// `(width, height)` of the layout.
    #[must_use]
    pub const fn dimensions(self) -> (u8, u8) {
        match self {
            Self::Size8x8 => (8, 8),
            Self::Size7x9 => (7, 9),
            Self::Size6x10 => (6, 10),
            Self::Size5x11 => (5, 11),
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(self) -> u8 {
        self.dimensions().0
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(self) -> u8 {
        self.dimensions().1
    }
}

impl From<u8> for MatrixSize {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}

// ── AudioGain ────────────────────────────────────────────────────────────────

/// Audio input gain applied when audio-reactive lighting is enabled.
///
/// Selector 7 is the only attenuating setting (−6 dB).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AudioGain {
    /// 0 dB.
    #[default]
    Db0 = 0,
    /// +3 dB.
    Db3 = 1,
    /// +6 dB.
    Db6 = 2,
    /// +9 dB.
    Db9 = 3,
    /// +12 dB.
    Db12 = 4,
    /// +15 dB.
    Db15 = 5,
    /// +18 dB.
    Db18 = 6,
    /// −6 dB.
    DbMinus6 = 7,
}

impl AudioGain {
    /// Build from a raw selector, keeping only the low 3 bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & EFFECT_AUDIO_GAIN_MASK {
            0 => Self::Db0,
            1 => Self::Db3,
            2 => Self::Db6,
            3 => Self::Db9,
            4 => Self::Db12,
            5 => Self::Db15,
            6 => Self::Db18,
            _ => Self::DbMinus6,
        }
    }

    /// The 3-bit selector value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Gain in decibels.
    #[must_use]
    pub const fn decibels(self) -> i8 {
        match self {
            Self::Db0 => 0,
            Self::Db3 => 3,
            Self::Db6 => 6,
            Self::Db9 => 9,
            Self::Db12 => 12,
            Self::Db15 => 15,
            Self::Db18 => 18,
            Self::DbMinus6 => -6,
        }
    }
}

impl From<u8> for AudioGain {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}

// ── CurrentLimit ─────────────────────────────────────────────────────────────

/// Row current limit, a 4-bit register field (0–15).
///
/// Wraps a `u8` with the invariant `value <= 15`. [`CurrentLimit::new`]
/// masks instead of clamping: `0x1F` becomes `0x0F`, `0x10` becomes `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct CurrentLimit(u8);

impl CurrentLimit {
    /// Lowest supported level, used at power-up.
    pub const MIN: Self = Self(0);

    /// Highest encodable level.
    pub const MAX: Self = Self(EFFECT_ROW_CURRENT_MASK);

    /// Create a `CurrentLimit` from the low 4 bits of `value`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value & EFFECT_ROW_CURRENT_MASK)
    }

    /// Return the 4-bit field value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<u8> for CurrentLimit {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

// ── Config ───────────────────────────────────────────────────────────────────

/// Cached contents of the configuration and lighting effect registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Software shutdown: LEDs off, register contents kept.
    pub shutdown: bool,
    /// Audio input drives the row brightness.
    pub audio_input: bool,
    /// Matrix geometry.
    pub matrix_size: MatrixSize,
    /// Audio input gain.
    pub audio_gain: AudioGain,
    /// Row current limit.
    pub current_limit: CurrentLimit,
}

impl Config {
    /// Power-up defaults for the given geometry: running, audio input off,
    /// 0 dB gain, lowest row current.
    #[must_use]
    pub const fn new(matrix_size: MatrixSize) -> Self {
        Self {
            shutdown: false,
            audio_input: false,
            matrix_size,
            audio_gain: AudioGain::Db0,
            current_limit: CurrentLimit::MIN,
        }
    }

    /// Pack the configuration register (`0x00`).
    ///
    /// `bit 7` shutdown, `bit 2` audio input enable, `bits 1:0` matrix size.
    #[must_use]
    pub const fn configuration_register(&self) -> u8 {
        let mut value = self.matrix_size.bits() & CONFIG_MATRIX_SIZE_MASK;
        if self.shutdown {
            value |= CONFIG_SHUTDOWN;
        }
        if self.audio_input {
            value |= CONFIG_AUDIO_INPUT;
        }
        value
    }

    /// Pack the lighting effect register (`0x0D`).
    ///
    /// `bits 6:4` audio gain, `bits 3:0` row current limit.
    #[must_use]
    pub const fn lighting_effect_register(&self) -> u8 {
        let gain = (self.audio_gain.bits() & EFFECT_AUDIO_GAIN_MASK)
            .wrapping_shl(EFFECT_AUDIO_GAIN_SHIFT);
        gain | (self.current_limit.get() & EFFECT_ROW_CURRENT_MASK)
    }
}
