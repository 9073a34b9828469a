//! Fixed 5x7 bitmap font and text rasterizer.
//!
//! Glyphs cover ASCII 32..=127 and are stored column-major: byte `col` of a
//! glyph holds one column, and bit `row` (LSB = top row) of that byte lights
//! row `row`. Anything outside that range, including non-ASCII `char`s, is
//! drawn with the fallback glyph `?`.
//!
//! # Cell Layout
//!
//! | Scale | Glyph | Cell (glyph + spacing column) | Line pitch |
//! |-------|-------|-------------------------------|------------|
//! | X1    | 5x7   | 6x7                           | 8          |
//! | X2    | 10x14 | 12x14                         | 16         |
//!
//! The spacing column is painted with the background color so text drawn over
//! an existing scene gets a clean right edge. The extra row between lines is
//! not painted.

use embedded_graphics::pixelcolor::Rgb565;

use crate::framebuffer::Framebuffer;

/// Glyph width in source pixels.
pub const GLYPH_WIDTH: i32 = 5;

/// Glyph height in source pixels.
pub const GLYPH_HEIGHT: i32 = 7;

/// First code point in the table.
const FIRST_CHAR: u32 = 32;

/// Drawn in place of anything outside the table.
pub const FALLBACK_CHAR: char = '?';

/// Integer text scale.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontScale {
    /// Native 5x7 glyphs.
    #[default]
    X1,
    /// Every source pixel drawn as a 2x2 block.
    X2,
}

impl FontScale {
    /// Pixels per source pixel.
    #[inline]
    pub const fn factor(self) -> i32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
        }
    }

    /// Horizontal cursor advance per character (glyph plus spacing column).
    #[inline]
    pub const fn cell_width(self) -> i32 { (GLYPH_WIDTH + 1) * self.factor() }

    /// Height of the painted cell.
    #[inline]
    pub const fn cell_height(self) -> i32 { GLYPH_HEIGHT * self.factor() }

    /// Vertical cursor advance on `\n`.
    #[inline]
    pub const fn line_pitch(self) -> i32 { (GLYPH_HEIGHT + 1) * self.factor() }
}

/// Column bitmaps for ASCII 32..=127.
#[rustfmt::skip]
pub static FONT_5X7: [[u8; 5]; 96] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x14, 0x08, 0x3E, 0x08, 0x14], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x72, 0x49, 0x49, 0x49, 0x46], // 2
    [0x21, 0x41, 0x49, 0x4D, 0x33], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x31], // 6
    [0x41, 0x21, 0x11, 0x09, 0x07], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x46, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x59, 0x09, 0x06], // ?
    [0x3E, 0x41, 0x5D, 0x59, 0x4E], // @
    [0x7C, 0x12, 0x11, 0x12, 0x7C], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // \
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x10, 0x08, 0x08, 0x10, 0x08], // ~
    [0x78, 0x46, 0x41, 0x46, 0x78], // DEL
];

/// Look up the column bitmap for `c`, substituting the fallback glyph.
#[inline]
pub fn glyph(c: char) -> &'static [u8; 5] {
    let code = c as u32;
    let index = if (FIRST_CHAR..FIRST_CHAR + FONT_5X7.len() as u32).contains(&code) {
        code - FIRST_CHAR
    } else {
        FALLBACK_CHAR as u32 - FIRST_CHAR
    };
    &FONT_5X7[index as usize]
}

/// Draw one character cell with its top-left corner at (`x`, `y`).
pub fn draw_glyph<const W: usize, const H: usize>(
    fb: &mut Framebuffer<W, H>,
    x: i32,
    y: i32,
    c: char,
    fg: Rgb565,
    bg: Rgb565,
    scale: FontScale,
) {
    let columns = glyph(c);
    let s = scale.factor();

    for row in 0..GLYPH_HEIGHT {
        for (col, bits) in columns.iter().enumerate() {
            let on = (bits >> row) & 0x01 != 0;
            let color = if on { fg } else { bg };
            fb.fill_rect(x.saturating_add(col as i32 * s), y.saturating_add(row * s), s, s, color);
        }
        // 1px spacing column, scaled
        fb.fill_rect(x.saturating_add(GLYPH_WIDTH * s), y.saturating_add(row * s), s, s, bg);
    }
}

/// Draw a string starting at (`x`, `y`).
///
/// `\n` returns the cursor to `x` and moves down one line pitch. There is no
/// wrapping; characters past the panel edge are clipped pixel by pixel.
pub fn draw_text<const W: usize, const H: usize>(
    fb: &mut Framebuffer<W, H>,
    x: i32,
    y: i32,
    text: &str,
    fg: Rgb565,
    bg: Rgb565,
    scale: FontScale,
) {
    let mut cursor_x = x;
    let mut cursor_y = y;

    for c in text.chars() {
        if c == '\n' {
            cursor_x = x;
            cursor_y = cursor_y.saturating_add(scale.line_pitch());
            continue;
        }
        draw_glyph(fb, cursor_x, cursor_y, c, fg, bg, scale);
        cursor_x = cursor_x.saturating_add(scale.cell_width());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
