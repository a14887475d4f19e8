//! IS31FL3728 LED matrix driver
//!
//! Blocking driver over [`embedded_hal::i2c::I2c`]. The driver caches both
//! control registers and the pixel buffer; every operation updates the cache
//! and immediately writes the affected registers.
//!
//! # Sharing the bus
//!
//! `LedMatrix` takes any `I2c` implementor by value. To keep ownership of the
//! bus, pass `&mut i2c`; to share it with other devices, pass an
//! `embedded_hal_bus::i2c::RefCellDevice` (or the critical-section / mutex
//! variants). Use [`LedMatrix::release`] to get the transport back.
//!
//! # Write sequences
//!
//! | Operation                  | Writes                                              |
//! |----------------------------|-----------------------------------------------------|
//! | [`LedMatrix::new`]         | `0x00` configuration, `0x0D` lighting effect        |
//! | [`LedMatrix::set_matrix_size`] | `0x00` configuration                            |
//! | [`LedMatrix::set_current_limit`] | `0x0D` lighting effect                        |
//! | [`LedMatrix::update_display`] | `0x01..` one per visible row, then `0x0C` ← `0xFF` |
//!
//! A transaction is not atomic on the bus: a caller sharing the driver
//! between contexts must hold its own lock for the whole operation so that
//! row writes and the commit are not interleaved with another frame.

use embedded_hal::i2c::I2c;

use crate::config::{AudioGain, Config, CurrentLimit, MatrixSize};
use crate::error::Error;
use crate::frame::FrameBuffer;
use crate::registers::{
    row_register, DEFAULT_ADDRESS, REG_CONFIGURATION, REG_LIGHTING_EFFECT, REG_UPDATE,
    UPDATE_COMMIT,
};

/// Whether a pixel operation pushes the frame to the device right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Update {
    /// Flush the whole frame after the edit.
    #[default]
    Immediate,
    /// Only edit the buffer; call [`LedMatrix::update_display`] later.
    Deferred,
}

/// Troyka LED matrix (IS31FL3728) driver.
pub struct LedMatrix<I> {
    i2c: I,
    address: u8,
    config: Config,
    frame: FrameBuffer,
}

impl<I: I2c> LedMatrix<I> {
    /// Create a driver and push the power-up configuration.
    ///
    /// Writes the configuration register, then the lighting effect register
    /// (running, audio off, 0 dB, lowest row current, `size`). The frame
    /// buffer starts blank and is not sent; the LEDs keep whatever the
    /// controller latched last until the first flush.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] from the first failed write. No driver is
    /// returned in that case.
    pub fn new(i2c: I, address: u8, size: impl Into<MatrixSize>) -> Result<Self, Error<I::Error>> {
        let mut matrix = Self {
            i2c,
            address,
            config: Config::new(size.into()),
            frame: FrameBuffer::new(),
        };
        log_debug!(
            "led matrix init: address={:#x} size={}x{}",
            matrix.address,
            matrix.width(),
            matrix.height()
        );
        matrix.write_configuration()?;
        matrix.write_lighting_effect()?;
        Ok(matrix)
    }

    /// [`LedMatrix::new`] at [`DEFAULT_ADDRESS`] with an 8×8 layout.
    ///
    /// # Errors
    ///
    /// See [`LedMatrix::new`].
    pub fn with_defaults(i2c: I) -> Result<Self, Error<I::Error>> {
        Self::new(i2c, DEFAULT_ADDRESS, MatrixSize::Size8x8)
    }

    /// Give the transport back.
    pub fn release(self) -> I {
        self.i2c
    }

    /// Write a single register over I²C.
    fn write_reg(&mut self, register: u8, value: u8) -> Result<(), Error<I::Error>> {
        log_trace!("write reg {:#x} <- {:#x}", register, value);
        self.i2c
            .write(self.address, &[register, value])
            .map_err(Error::Transport)
    }

    fn write_configuration(&mut self) -> Result<(), Error<I::Error>> {
        let value = self.config.configuration_register();
        self.write_reg(REG_CONFIGURATION, value)
    }

    fn write_lighting_effect(&mut self) -> Result<(), Error<I::Error>> {
        let value = self.config.lighting_effect_register();
        self.write_reg(REG_LIGHTING_EFFECT, value)
    }

    fn finish(&mut self, update: Update) -> Result<(), Error<I::Error>> {
        match update {
            Update::Immediate => self.update_display(),
            Update::Deferred => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Set the row current limit. Only the low 4 bits of `value` are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the lighting effect write fails. The
    /// cached value is updated regardless.
    pub fn set_current_limit(&mut self, value: u8) -> Result<(), Error<I::Error>> {
        self.config.current_limit = CurrentLimit::new(value);
        log_debug!("current limit={}", self.config.current_limit.get());
        self.write_lighting_effect()
    }

    /// Select the matrix layout. Raw selectors are masked to 2 bits.
    ///
    /// The frame buffer is left untouched: rows past the new height stay in
    /// the buffer and reappear when a taller layout is selected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the configuration write fails.
    pub fn set_matrix_size(&mut self, size: impl Into<MatrixSize>) -> Result<(), Error<I::Error>> {
        self.config.matrix_size = size.into();
        log_debug!(
            "matrix size={}x{}",
            self.config.matrix_size.width(),
            self.config.matrix_size.height()
        );
        self.write_configuration()
    }

    /// Set the audio input gain. Raw selectors are masked to 3 bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the lighting effect write fails.
    pub fn set_audio_gain(&mut self, gain: impl Into<AudioGain>) -> Result<(), Error<I::Error>> {
        self.config.audio_gain = gain.into();
        log_debug!("audio gain={}dB", self.config.audio_gain.decibels());
        self.write_lighting_effect()
    }

    /// Enable or disable audio-reactive row brightness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the configuration write fails.
    pub fn set_audio_input(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.config.audio_input = enabled;
        log_debug!("audio input={}", self.config.audio_input);
        self.write_configuration()
    }

    /// Enter or leave software shutdown. Register contents survive shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the configuration write fails.
    pub fn set_shutdown(&mut self, shutdown: bool) -> Result<(), Error<I::Error>> {
        self.config.shutdown = shutdown;
        log_debug!("shutdown={}", self.config.shutdown);
        self.write_configuration()
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    /// Turn pixel `(x, y)` on.
    ///
    /// `x` wraps at 8 columns and `y` at 11 rows whatever the current layout,
    /// so on a shorter layout rows 8..=10 can be written without being shown.
    ///
    /// # Errors
    ///
    /// With [`Update::Immediate`], returns [`Error::Transport`] from the flush.
    pub fn draw_pixel(&mut self, x: i32, y: i32, update: Update) -> Result<(), Error<I::Error>> {
        self.frame.set(x, y);
        self.finish(update)
    }

    /// Turn pixel `(x, y)` off. Wraps like [`LedMatrix::draw_pixel`].
    ///
    /// # Errors
    ///
    /// With [`Update::Immediate`], returns [`Error::Transport`] from the flush.
    pub fn clear_pixel(&mut self, x: i32, y: i32, update: Update) -> Result<(), Error<I::Error>> {
        self.frame.clear(x, y);
        self.finish(update)
    }

    /// Replace row `y` (wrapped at 11) with the column bitmap `bits`.
    ///
    /// # Errors
    ///
    /// With [`Update::Immediate`], returns [`Error::Transport`] from the flush.
    pub fn set_row(&mut self, y: i32, bits: u8, update: Update) -> Result<(), Error<I::Error>> {
        self.frame.set_row(y, bits);
        self.finish(update)
    }

    /// Turn every pixel off, hidden rows included.
    ///
    /// # Errors
    ///
    /// With [`Update::Immediate`], returns [`Error::Transport`] from the flush.
    pub fn clear(&mut self, update: Update) -> Result<(), Error<I::Error>> {
        self.frame.clear_all();
        self.finish(update)
    }

    /// Push the visible rows and latch them.
    ///
    /// Writes row `n` to register `0x01 + n` for every row of the current
    /// layout, then `0xFF` to the update register. Row data has no visible
    /// effect until the update write succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] from the first failed write; later rows
    /// and the commit are not sent.
    pub fn update_display(&mut self) -> Result<(), Error<I::Error>> {
        let frame = self.frame;
        let height = self.height();
        log_trace!("flush {} rows", height);
        for (row, &bits) in (0u8..).zip(frame.visible_rows(height)) {
            if let Some(register) = row_register(row) {
                self.write_reg(register, bits)?;
            }
        }
        self.write_reg(REG_UPDATE, UPDATE_COMMIT)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Cached register state.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current layout.
    pub fn matrix_size(&self) -> MatrixSize {
        self.config.matrix_size
    }

    /// Columns of the current layout.
    pub fn width(&self) -> u8 {
        self.config.matrix_size.width()
    }

    /// Rows of the current layout.
    pub fn height(&self) -> u8 {
        self.config.matrix_size.height()
    }

    /// Cached row current limit (0–15).
    pub fn current_limit(&self) -> u8 {
        self.config.current_limit.get()
    }

    /// Device address used for every write.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// The pixel buffer, all 11 rows.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Whether pixel `(x, y)` is on in the buffer. Wraps like drawing.
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        self.frame.get(x, y)
    }
}

impl<I> core::fmt::Debug for LedMatrix<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LedMatrix")
            .field("address", &self.address)
            .field("config", &self.config)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockBusError, RecordingI2c};
    use crate::registers::{REG_ROW_DATA, REG_ROW_DATA_LAST};

    fn matrix() -> LedMatrix<RecordingI2c> {
        let mut matrix = LedMatrix::with_defaults(RecordingI2c::new()).unwrap();
        matrix.i2c.clear();
        matrix
    }

    #[test]
    fn new_writes_configuration_then_lighting_effect() {
        let matrix = LedMatrix::with_defaults(RecordingI2c::new()).unwrap();
        let bus = matrix.release();
        assert_eq!(bus.registers_written(), [REG_CONFIGURATION, REG_LIGHTING_EFFECT]);
        assert_eq!(bus.last_value(REG_CONFIGURATION), Some(0x00));
        assert_eq!(bus.last_value(REG_LIGHTING_EFFECT), Some(0x00));
    }

    #[test]
    fn new_uses_given_address_and_size() {
        let matrix = LedMatrix::new(RecordingI2c::new(), 0x63, MatrixSize::Size6x10).unwrap();
        assert_eq!(matrix.address(), 0x63);
        assert_eq!((matrix.width(), matrix.height()), (6, 10));
        assert!(matrix.frame().is_blank());
        let bus = matrix.release();
        assert!(bus.writes().iter().all(|w| w.address == 0x63));
        assert_eq!(bus.last_value(REG_CONFIGURATION), Some(0x02));
    }

    #[test]
    fn new_masks_raw_size_selector() {
        let matrix = LedMatrix::new(RecordingI2c::new(), DEFAULT_ADDRESS, 7u8).unwrap();
        assert_eq!(matrix.matrix_size(), MatrixSize::Size5x11);
    }

    #[test]
    fn new_fails_on_first_write_error() {
        let err = LedMatrix::with_defaults(RecordingI2c::new().failing_at(0)).unwrap_err();
        assert_eq!(err, Error::Transport(MockBusError));
        let err = LedMatrix::with_defaults(RecordingI2c::new().failing_at(1)).unwrap_err();
        assert_eq!(err, Error::Transport(MockBusError));
    }

    #[test]
    fn new_does_not_flush_frame() {
        let bus = LedMatrix::with_defaults(RecordingI2c::new()).unwrap().release();
        assert_eq!(bus.last_value(REG_UPDATE), None);
    }

    #[test]
    fn set_current_limit_keeps_low_nibble() {
        let mut matrix = matrix();
        matrix.set_audio_gain(AudioGain::Db12).unwrap();
        matrix.set_current_limit(0xF3).unwrap();
        assert_eq!(matrix.current_limit(), 0x03);
        assert_eq!(matrix.i2c.last_value(REG_LIGHTING_EFFECT), Some(0x43));
        assert_eq!(matrix.i2c.writes().len(), 2);
    }

    #[test]
    fn set_matrix_size_writes_selector_and_dimensions() {
        let mut matrix = matrix();
        matrix.set_matrix_size(MatrixSize::Size7x9).unwrap();
        assert_eq!((matrix.width(), matrix.height()), (7, 9));
        assert_eq!(matrix.i2c.registers_written(), [REG_CONFIGURATION]);
        assert_eq!(matrix.i2c.last_value(REG_CONFIGURATION), Some(0x01));
    }

    #[test]
    fn set_matrix_size_preserves_flags() {
        let mut matrix = matrix();
        matrix.set_shutdown(true).unwrap();
        matrix.set_audio_input(true).unwrap();
        matrix.set_matrix_size(3u8).unwrap();
        assert_eq!(matrix.i2c.last_value(REG_CONFIGURATION), Some(0b1000_0111));
    }

    #[test]
    fn set_matrix_size_keeps_frame() {
        let mut matrix = matrix();
        matrix.draw_pixel(1, 10, Update::Deferred).unwrap();
        matrix.set_matrix_size(MatrixSize::Size8x8).unwrap();
        assert!(matrix.pixel(1, 10));
    }

    #[test]
    fn draw_pixel_flushes_by_default() {
        let mut matrix = matrix();
        matrix.draw_pixel(2, 1, Update::default()).unwrap();
        let expected: std::vec::Vec<u8> = (REG_ROW_DATA..=MatrixSize::Size8x8.height())
            .chain([REG_UPDATE])
            .collect();
        assert_eq!(matrix.i2c.registers_written(), expected);
        assert_eq!(matrix.i2c.last_value(REG_ROW_DATA + 1), Some(0b0000_0100));
        assert_eq!(matrix.i2c.last_value(REG_UPDATE), Some(UPDATE_COMMIT));
    }

    #[test]
    fn deferred_edits_do_not_touch_the_bus() {
        let mut matrix = matrix();
        matrix.draw_pixel(0, 0, Update::Deferred).unwrap();
        matrix.clear_pixel(0, 1, Update::Deferred).unwrap();
        matrix.set_row(2, 0xAA, Update::Deferred).unwrap();
        matrix.clear(Update::Deferred).unwrap();
        assert!(matrix.i2c.writes().is_empty());
    }

    #[test]
    fn clear_pixel_turns_off_one_bit() {
        let mut matrix = matrix();
        matrix.set_row(4, 0xFF, Update::Deferred).unwrap();
        matrix.clear_pixel(12, 4, Update::Immediate).unwrap();
        assert_eq!(matrix.i2c.last_value(REG_ROW_DATA + 4), Some(0b1110_1111));
    }

    #[test]
    fn hidden_rows_are_not_sent_until_layout_grows() {
        let mut matrix = matrix();
        matrix.draw_pixel(0, 10, Update::Immediate).unwrap();
        assert_eq!(matrix.i2c.last_value(REG_ROW_DATA_LAST), None);

        matrix.set_matrix_size(MatrixSize::Size5x11).unwrap();
        matrix.update_display().unwrap();
        assert_eq!(matrix.i2c.last_value(REG_ROW_DATA_LAST), Some(0x01));
    }

    #[test]
    fn update_display_stops_at_first_failure() {
        let bus = RecordingI2c::new().failing_at(5);
        let mut matrix = LedMatrix::with_defaults(bus).unwrap();
        let err = matrix.update_display().unwrap_err();
        assert_eq!(err.into_transport(), MockBusError);
        // Two init writes plus rows 0..=2; the fourth row failed, no commit.
        assert_eq!(matrix.i2c.writes().len(), 5);
        assert_eq!(matrix.i2c.last_value(REG_UPDATE), None);
    }

    #[test]
    fn audio_gain_and_shutdown_setters_write_one_register() {
        let mut matrix = matrix();
        matrix.set_audio_gain(9u8).unwrap();
        assert_eq!(matrix.config().audio_gain, AudioGain::Db3);
        assert_eq!(matrix.i2c.last_value(REG_LIGHTING_EFFECT), Some(0x10));
        matrix.set_shutdown(true).unwrap();
        assert_eq!(matrix.i2c.last_value(REG_CONFIGURATION), Some(0x80));
        assert_eq!(matrix.i2c.writes().len(), 2);
    }

    #[test]
    fn debug_output_omits_bus() {
        let matrix = matrix();
        let text = std::format!("{matrix:?}");
        assert!(text.starts_with("LedMatrix"));
        assert!(text.contains("address: 96"));
    }
}
