//! The four demo scenes, drawn into a [`Framebuffer`].
//!
//! Static scenes only draw. Presenting them is the page cycle's job. The
//! animation is the exception: it owns its flushes because every frame has to
//! reach the panel before the next one is drawn.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_hal::delay::DelayNs;

use crate::colors::{
    BANNER_BG, BANNER_GOLD, BANNER_ICE, BANNER_LAVENDER, BANNER_MINT, BLACK, ICON_BG, ICON_CAPTION, PULSE_CAPTION,
    WHITE, rgb565,
};
use crate::font::{FontScale, draw_text};
use crate::framebuffer::Framebuffer;
use crate::sprites::{Animation, HEART, ICON_SIZE, Sprite};
use crate::st7789::FrameSink;

// =============================================================================
// Layout
// =============================================================================

/// Left margin of the banner lines.
pub const BANNER_X: i32 = 8;

/// Top of each banner line.
pub const BANNER_LINE_Y: [i32; 4] = [10, 34, 58, 82];

/// Banner line colors, top to bottom.
pub const BANNER_COLORS: [Rgb565; 4] = [BANNER_GOLD, BANNER_ICE, BANNER_MINT, BANNER_LAVENDER];

/// Inset of the black card border on the gradient page.
pub const CARD_BORDER_INSET: i32 = 12;

/// Inset of the white card face on the gradient page.
pub const CARD_FACE_INSET: i32 = 14;

pub const GRADIENT_CAPTION: &str = "Gradient + frame";
pub const GRADIENT_CAPTION_POS: (i32, i32) = (20, 18);

pub const ICON_CAPTION_TEXT: &str = "Icon demo";
pub const ICON_CAPTION_POS: (i32, i32) = (12, 12);

pub const PULSE_CAPTION_TEXT: &str = "GIF-ish pulse";
pub const PULSE_CAPTION_POS: (i32, i32) = (8, 8);

/// First row of the region the animation clears before every frame.
pub const PULSE_REGION_TOP: i32 = 32;

// =============================================================================
// Banner
// =============================================================================

/// The four lines of the text page.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Banner {
    pub lines: [&'static str; 4],
}

impl Banner {
    /// Single-loop build: board name plus console hint.
    pub const BARE_METAL: Self = Self {
        lines: ["RP2350-GEEK", "Bare-metal demo", "I2C/SPI/ADC+LCD", "BOOTSEL: reflash"],
    };

    /// Concurrent build: board name plus task summary.
    pub const RTOS: Self = Self {
        lines: ["RP2350-GEEK", "Embassy LCD demo", "Heartbeat+pages", "UART0@115200"],
    };

    pub const fn new(lines: [&'static str; 4]) -> Self { Self { lines } }
}

impl Default for Banner {
    fn default() -> Self { Self::BARE_METAL }
}

// =============================================================================
// Scenes
// =============================================================================

/// Text page: dark background and four 2x caption lines.
pub fn render_text<const W: usize, const H: usize>(
    fb: &mut Framebuffer<W, H>,
    banner: &Banner,
) {
    fb.clear(BANNER_BG);
    for ((line, y), color) in banner.lines.iter().zip(BANNER_LINE_Y).zip(BANNER_COLORS) {
        draw_text(fb, BANNER_X, y, line, color, BANNER_BG, FontScale::X2);
    }
}

/// Gradient color at (`x`, `y`) on a `w` x `h` panel.
///
/// Each channel is an integer ramp truncated toward zero:
/// `r = x*255/w`, `g = y*255/h`, `b = (x+y)*255/(w+h)`.
#[inline]
pub const fn gradient_color(
    x: usize,
    y: usize,
    w: usize,
    h: usize,
) -> Rgb565 {
    let r = (x * 255 / w) as u8;
    let g = (y * 255 / h) as u8;
    let b = ((x + y) * 255 / (w + h)) as u8;
    rgb565(r, g, b)
}

/// Gradient page: full-panel ramp, a framed white card and a caption.
pub fn render_gradient<const W: usize, const H: usize>(fb: &mut Framebuffer<W, H>) {
    for (i, pixel) in fb.pixels_mut().iter_mut().enumerate() {
        *pixel = gradient_color(i % W, i / W, W, H);
    }

    card(fb.bounding_box(), CARD_BORDER_INSET).into_styled(PrimitiveStyle::with_fill(BLACK)).draw(fb).ok();
    card(fb.bounding_box(), CARD_FACE_INSET).into_styled(PrimitiveStyle::with_fill(WHITE)).draw(fb).ok();

    let (x, y) = GRADIENT_CAPTION_POS;
    draw_text(fb, x, y, GRADIENT_CAPTION, BLACK, WHITE, FontScale::X2);
}

/// `bounds` shrunk by `inset` on every side (empty when the inset eats it).
fn card(
    bounds: Rectangle,
    inset: i32,
) -> Rectangle {
    let shrink = Size::new_equal(2 * inset as u32);
    Rectangle::new(bounds.top_left + Point::new_equal(inset), bounds.size.saturating_sub(shrink))
}

/// Top-left corner that centers a `sw` x `sh` sprite on the panel.
#[inline]
pub const fn centered(
    panel_w: usize,
    panel_h: usize,
    sw: usize,
    sh: usize,
) -> (i32, i32) {
    ((panel_w as i32 - sw as i32) / 2, (panel_h as i32 - sh as i32) / 2)
}

/// Icon page: caption and the heart centered on the panel.
pub fn render_icon<const W: usize, const H: usize>(fb: &mut Framebuffer<W, H>) {
    fb.clear(ICON_BG);
    let (cx, cy) = ICON_CAPTION_POS;
    draw_text(fb, cx, cy, ICON_CAPTION_TEXT, ICON_CAPTION, ICON_BG, FontScale::X2);

    let (x, y) = centered(W, H, ICON_SIZE, ICON_SIZE);
    HEART.draw(fb, x, y);
}

/// Draw the caption and clear the panel for the animation.
pub fn render_animation_backdrop<const W: usize, const H: usize>(fb: &mut Framebuffer<W, H>) {
    fb.clear(BLACK);
    let (x, y) = PULSE_CAPTION_POS;
    draw_text(fb, x, y, PULSE_CAPTION_TEXT, PULSE_CAPTION, BLACK, FontScale::X2);
}

/// Clear the region below the caption and blit one frame centered on the panel.
pub fn render_animation_frame<const W: usize, const H: usize, const SW: usize, const SH: usize>(
    fb: &mut Framebuffer<W, H>,
    frame: &Sprite<SW, SH>,
) {
    fb.fill_rect(0, PULSE_REGION_TOP, W as i32, H as i32 - PULSE_REGION_TOP, BLACK);
    let (x, y) = centered(W, H, SW, SH);
    frame.draw(fb, x, y);
}

/// Animation page: backdrop, then draw + flush + sleep per frame.
///
/// Returns the number of flushes issued (one per frame).
pub fn play_animation<const W: usize, const H: usize, const SW: usize, const SH: usize, S, D>(
    fb: &mut Framebuffer<W, H>,
    sink: &mut S,
    delay: &mut D,
    animation: &Animation<SW, SH>,
) -> usize
where
    S: FrameSink,
    D: DelayNs,
{
    render_animation_backdrop(fb);

    let mut flushes = 0;
    for frame in animation.sprites() {
        render_animation_frame(fb, &frame);
        sink.flush(fb);
        flushes += 1;
        delay.delay_ms(animation.frame_delay_ms);
    }
    flushes
}

// =============================================================================
// Unit Tests
// =============================================================================
