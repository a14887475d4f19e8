//! Terminal stand-in for the matrix module.
//!
//! Decodes register writes the way the controller does: row data goes to
//! shadow registers and only becomes visible when the update register is
//! written. Each latched frame is rendered as text.

use core::convert::Infallible;

use embedded_hal::i2c::{ErrorType, I2c, Operation};
use led_matrix::registers::{
    EFFECT_AUDIO_GAIN_SHIFT, EFFECT_ROW_CURRENT_MASK, REG_AUDIO_EQUALIZER, REG_CONFIGURATION,
    REG_LIGHTING_EFFECT, REG_ROW_DATA, REG_ROW_DATA_LAST, REG_UPDATE, UPDATE_COMMIT,
};
use led_matrix::{AudioGain, MatrixSize, MAX_ROWS};

/// Emulated IS31FL3728 answering at one address.
#[derive(Debug)]
pub struct EmulatedMatrix {
    address: u8,
    configuration: u8,
    lighting_effect: u8,
    shadow: [u8; MAX_ROWS],
    latched: [u8; MAX_ROWS],
    frames: u64,
}

impl EmulatedMatrix {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            configuration: 0,
            lighting_effect: 0,
            shadow: [0; MAX_ROWS],
            latched: [0; MAX_ROWS],
            frames: 0,
        }
    }

    /// Text picture of the latched frame, one line per visible row.
    pub fn render(&self) -> String {
        let (width, height) = MatrixSize::from_bits(self.configuration).dimensions();
        let mut out = String::new();
        for &row in self.latched.iter().take(usize::from(height)) {
            for col in 0..width {
                out.push(if row & 1u8.wrapping_shl(u32::from(col)) != 0 { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }

    /// Row current and audio gain fields of the lighting effect register.
    pub fn lighting(&self) -> (u8, AudioGain) {
        let current = self.lighting_effect & EFFECT_ROW_CURRENT_MASK;
        let gain = AudioGain::from_bits(self.lighting_effect.wrapping_shr(EFFECT_AUDIO_GAIN_SHIFT));
        (current, gain)
    }

    fn write_register(&mut self, register: u8, value: u8) {
        match register {
            REG_CONFIGURATION => {
                self.configuration = value;
                tracing::debug!(value, "emulator: configuration");
            }
            REG_ROW_DATA..=REG_ROW_DATA_LAST => {
                let row = usize::from(register.wrapping_sub(REG_ROW_DATA));
                if let Some(slot) = self.shadow.get_mut(row) {
                    *slot = value;
                }
            }
            REG_UPDATE if value == UPDATE_COMMIT => {
                self.latched = self.shadow;
                self.frames = self.frames.wrapping_add(1);
                let shutdown = self.configuration & 0x80 != 0;
                let (current, gain) = self.lighting();
                tracing::debug!(
                    frame = self.frames,
                    shutdown,
                    current,
                    gain_db = gain.decibels(),
                    "emulator: latched"
                );
                if !shutdown {
                    print!("\x1b[H\x1b[2J{}", self.render());
                }
            }
            REG_LIGHTING_EFFECT => {
                self.lighting_effect = value;
                tracing::debug!(value, "emulator: lighting effect");
            }
            REG_AUDIO_EQUALIZER => tracing::debug!(value, "emulator: audio equalizer"),
            _ => tracing::warn!(register, value, "emulator: write to unknown register"),
        }
    }
}

impl ErrorType for EmulatedMatrix {
    type Error = Infallible;
}

impl I2c for EmulatedMatrix {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            tracing::warn!(address, "emulator: no device at address");
            return Ok(());
        }
        for op in operations.iter() {
            match op {
                Operation::Write([register, value]) => self.write_register(*register, *value),
                Operation::Write(data) => {
                    tracing::warn!(len = data.len(), "emulator: unexpected write length");
                }
                Operation::Read(_) => tracing::warn!("emulator: registers are write-only"),
            }
        }
        Ok(())
    }
}
