//! Indexed-palette sprites: the heart icon and the pulse animation frames.
//!
//! A sprite is a fixed grid of small palette indices plus the palette it is
//! drawn with. Every index cell is written (index 0 is an ordinary opaque
//! color, not transparency). Indices past the end of the palette are skipped.

use embedded_graphics::pixelcolor::Rgb565;

use crate::colors::rgb565;
use crate::framebuffer::Framebuffer;

/// Row-major grid of palette indices, `grid[y][x]`.
pub type IndexGrid<const SW: usize, const SH: usize> = [[u8; SW]; SH];

/// Icon edge length in pixels.
pub const ICON_SIZE: usize = 16;

/// Pulse frame edge length in pixels.
pub const PULSE_SIZE: usize = 12;

/// An index grid paired with its palette.
#[derive(Clone, Copy, Debug)]
pub struct Sprite<const SW: usize, const SH: usize> {
    pub indices: &'static IndexGrid<SW, SH>,
    pub palette: &'static [Rgb565],
}

impl<const SW: usize, const SH: usize> Sprite<SW, SH> {
    /// Blit with the top-left corner at (`x`, `y`).
    pub fn draw<const W: usize, const H: usize>(
        &self,
        fb: &mut Framebuffer<W, H>,
        x: i32,
        y: i32,
    ) {
        draw_sprite(fb, x, y, self.indices, self.palette);
    }
}

/// Blit an index grid through `palette`. Clipped like every other primitive.
pub fn draw_sprite<const W: usize, const H: usize, const SW: usize, const SH: usize>(
    fb: &mut Framebuffer<W, H>,
    x: i32,
    y: i32,
    indices: &IndexGrid<SW, SH>,
    palette: &[Rgb565],
) {
    for (iy, row) in indices.iter().enumerate() {
        for (ix, &index) in row.iter().enumerate() {
            if let Some(&color) = palette.get(index as usize) {
                fb.set_pixel(x.saturating_add(ix as i32), y.saturating_add(iy as i32), color);
            }
        }
    }
}

/// Blit a 16x16 icon.
#[inline]
pub fn draw_icon<const W: usize, const H: usize>(
    fb: &mut Framebuffer<W, H>,
    x: i32,
    y: i32,
    icon: &IndexGrid<ICON_SIZE, ICON_SIZE>,
    palette: &[Rgb565],
) {
    draw_sprite(fb, x, y, icon, palette);
}

// =============================================================================
// Animation
// =============================================================================

/// Same-shaped frames sharing one palette, played at a fixed interval.
#[derive(Clone, Copy, Debug)]
pub struct Animation<const SW: usize, const SH: usize> {
    pub frames: &'static [IndexGrid<SW, SH>],
    pub palette: &'static [Rgb565],
    pub frame_delay_ms: u32,
}

impl<const SW: usize, const SH: usize> Animation<SW, SH> {
    #[inline]
    pub const fn len(&self) -> usize { self.frames.len() }

    #[inline]
    pub const fn is_empty(&self) -> bool { self.frames.is_empty() }

    /// Frame `index` as a drawable sprite.
    pub fn frame(
        &self,
        index: usize,
    ) -> Option<Sprite<SW, SH>> {
        self.frames.get(index).map(|indices| Sprite { indices, palette: self.palette })
    }

    /// Frames in playback order.
    pub fn sprites(&self) -> impl Iterator<Item = Sprite<SW, SH>> + '_ {
        self.frames.iter().map(|indices| Sprite { indices, palette: self.palette })
    }

    /// Same frames with a different interval.
    #[must_use]
    pub const fn with_frame_delay(
        self,
        frame_delay_ms: u32,
    ) -> Self {
        Self { frame_delay_ms, ..self }
    }
}

// =============================================================================
// Heart Icon
// =============================================================================

pub static HEART_PALETTE: [Rgb565; 4] = [
    rgb565(10, 10, 20),
    rgb565(255, 120, 120),
    rgb565(255, 70, 70),
    rgb565(200, 20, 20),
];

#[rustfmt::skip]
pub static HEART_ICON: IndexGrid<ICON_SIZE, ICON_SIZE> = [
    [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
    [0,0,1,1,0,0,0,0,0,0,1,1,0,0,0,0],
    [0,1,2,2,1,0,0,0,0,1,2,2,1,0,0,0],
    [1,2,3,3,2,1,0,0,1,2,3,3,2,1,0,0],
    [1,3,3,3,3,2,1,1,2,3,3,3,3,2,1,0],
    [1,3,3,3,3,3,2,2,3,3,3,3,3,2,1,0],
    [0,2,3,3,3,3,3,3,3,3,3,3,2,2,0,0],
    [0,1,2,3,3,3,3,3,3,3,3,2,1,0,0,0],
    [0,0,1,2,3,3,3,3,3,3,2,1,0,0,0,0],
    [0,0,0,1,2,3,3,3,3,2,1,0,0,0,0,0],
    [0,0,0,0,1,2,3,3,2,1,0,0,0,0,0,0],
    [0,0,0,0,0,1,2,2,1,0,0,0,0,0,0,0],
    [0,0,0,0,0,0,1,1,0,0,0,0,0,0,0,0],
    [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
    [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
    [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
];

pub const HEART: Sprite<ICON_SIZE, ICON_SIZE> = Sprite { indices: &HEART_ICON, palette: &HEART_PALETTE };

// =============================================================================
// Pulse Animation
// =============================================================================

pub static PULSE_PALETTE: [Rgb565; 3] = [rgb565(0, 0, 0), rgb565(80, 220, 255), rgb565(255, 255, 255)];

#[rustfmt::skip]
pub static PULSE_FRAMES: [IndexGrid<PULSE_SIZE, PULSE_SIZE>; 3] = [
    // small dot
    [
        [0,0,0,0,0,0,0,0,0,0,0,0],
        [0,0,0,0,0,0,0,0,0,0,0,0],
        [0,0,0,0,0,0,0,0,0,0,0,0],
        [0,0,0,0,1,1,1,0,0,0,0,0],
        [0,0,0,0,1,2,1,0,0,0,0,0],
        [0,0,0,0,1,1,1,0,0,0,0,0],
        [0,0,0,0,0,0,0,0,0,0,0,0],
        [0,0,0,0,0,0,0,0,0,0,0,0],
        [0,0,0,0,0,0,0,0,0,0,0,0],
        [0,0,0,0,0,0,0,0,0,0,0,0],
        [0,0,0,0,0,0,0,0,0,0,0,0],
        [0,0,0,0,0,0,0,0,0,0,0,0],
    ],
    // medium ring
    [
        [0,0,0,0,0,0,0,0,0,0,0,0],
        [0,0,0,1,1,1,1,1,1,0,0,0],
        [0,0,1,2,2,2,2,2,2,1,0,0],
        [0,1,2,1,1,1,1,1,1,2,1,0],
        [0,1,2,1,0,0,0,0,1,2,1,0],
        [0,1,2,1,0,0,0,0,1,2,1,0],
        [0,1,2,1,0,0,0,0,1,2,1,0],
        [0,1,2,1,1,1,1,1,1,2,1,0],
        [0,0,1,2,2,2,2,2,2,1,0,0],
        [0,0,0,1,1,1,1,1,1,0,0,0],
        [0,0,0,0,0,0,0,0,0,0,0,0],
        [0,0,0,0,0,0,0,0,0,0,0,0],
    ],
    // large ring
    [
        [0,0,1,1,1,1,1,1,1,1,1,0],
        [0,1,2,2,2,2,2,2,2,2,2,1],
        [1,2,1,1,1,1,1,1,1,1,1,2],
        [1,2,1,0,0,0,0,0,0,0,1,2],
        [1,2,1,0,0,0,0,0,0,0,1,2],
        [1,2,1,0,0,0,0,0,0,0,1,2],
        [1,2,1,0,0,0,0,0,0,0,1,2],
        [1,2,1,0,0,0,0,0,0,0,1,2],
        [1,2,1,0,0,0,0,0,0,0,1,2],
        [1,2,1,1,1,1,1,1,1,1,1,2],
        [0,1,2,2,2,2,2,2,2,2,2,1],
        [0,0,1,1,1,1,1,1,1,1,1,0],
    ],
];

/// Default inter-frame delay of the pulse.
pub const PULSE_FRAME_DELAY_MS: u32 = 160;

pub const PULSE: Animation<PULSE_SIZE, PULSE_SIZE> = Animation {
    frames: &PULSE_FRAMES,
    palette: &PULSE_PALETTE,
    frame_delay_ms: PULSE_FRAME_DELAY_MS,
};

// =============================================================================
// Unit Tests
// =============================================================================
