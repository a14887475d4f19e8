//! Row-major 1bpp frame buffer.
//!
//! One byte per row, one bit per column: bit `i` of row `j` is pixel
//! `(i, j)`. The buffer always holds [`MAX_ROWS`] rows, the tallest layout the
//! controller supports, so switching between matrix sizes never reallocates
//! or drops content.
//!
//! # Coordinate wrapping
//!
//! Coordinates are reduced with Euclidean remainder: the column against
//! [`MAX_COLS`] and the row against [`MAX_ROWS`], independently of the layout
//! currently configured on the device. On an 8×8 layout, `(0, 9)` therefore
//! lands in row 9, which is kept in the buffer but not transmitted until a
//! taller layout is selected. Negative coordinates wrap from the far edge.

/// Rows held by the buffer (height of the 5×11 layout).
pub const MAX_ROWS: usize = 11;

/// Fewest rows of any layout (8×8).
pub const MIN_ROWS: usize = 8;

/// Columns addressable in a row byte (width of the 8×8 layout).
pub const MAX_COLS: usize = 8;

/// Fewest columns of any layout (5×11).
pub const MIN_COLS: usize = 5;

// Both limits are tiny, so the casts are lossless.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const ROW_MODULUS: i32 = MAX_ROWS as i32;
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const COL_MODULUS: i32 = MAX_COLS as i32;

/// Fixed-capacity pixel buffer covering every supported layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameBuffer {
    rows: [u8; MAX_ROWS],
}

impl FrameBuffer {
    /// An all-off buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: [0; MAX_ROWS] }
    }

    /// Buffer row index for logical `y`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // result is 0..11
    pub fn row_index(y: i32) -> usize {
        y.rem_euclid(ROW_MODULUS).unsigned_abs() as usize
    }

    /// Single-bit column mask for logical `x`.
    #[must_use]
    pub fn column_mask(x: i32) -> u8 {
        1u8.wrapping_shl(x.rem_euclid(COL_MODULUS).unsigned_abs())
    }

    /// Turn pixel `(x, y)` on.
    pub fn set(&mut self, x: i32, y: i32) {
        if let Some(row) = self.rows.get_mut(Self::row_index(y)) {
            *row |= Self::column_mask(x);
        }
    }

    /// Turn pixel `(x, y)` off.
    pub fn clear(&mut self, x: i32, y: i32) {
        if let Some(row) = self.rows.get_mut(Self::row_index(y)) {
            *row &= !Self::column_mask(x);
        }
    }

    /// Whether pixel `(x, y)` is on.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.row(y) & Self::column_mask(x) != 0
    }

    /// Column bitmap of row `y`.
    #[must_use]
    pub fn row(&self, y: i32) -> u8 {
        self.rows.get(Self::row_index(y)).copied().unwrap_or(0)
    }

    /// Replace the whole column bitmap of row `y`.
    pub fn set_row(&mut self, y: i32, bits: u8) {
        if let Some(row) = self.rows.get_mut(Self::row_index(y)) {
            *row = bits;
        }
    }

    /// Turn every pixel off, including rows outside the visible layout.
    pub fn clear_all(&mut self) {
        self.rows = [0; MAX_ROWS];
    }

    /// The first `height` rows, i.e. what a layout of that height shows.
    ///
    /// `height` is capped at [`MAX_ROWS`].
    #[must_use]
    pub fn visible_rows(&self, height: u8) -> &[u8] {
        let height = usize::from(height).min(MAX_ROWS);
        self.rows.get(..height).unwrap_or(&self.rows)
    }

    /// All rows, visible or not.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; MAX_ROWS] {
        &self.rows
    }

    /// Whether every pixel is off.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|&row| row == 0)
    }
}
