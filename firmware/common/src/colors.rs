//! RGB565 color construction and the fixed palette used by the demo scenes.
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue,
//! packed MSB-first as `R:G:B`. This is the only pixel format the panel is
//! configured for (COLMOD 0x55).
//!
//! Every color in this crate goes through [`rgb565`], which takes ordinary
//! 8-bit channels and drops the low bits. Hand-packed `u16` literals are not
//! used anywhere so that bit placement stays consistent with the wire format.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::{RawData, RgbColor};

/// Convert 8-bit channels to RGB565 by truncating to 5/6/5 bits.
#[inline]
pub const fn rgb565(
    r: u8,
    g: u8,
    b: u8,
) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Re-expand a color to 8-bit channels (quantized bits in the high positions).
///
/// `rgb565(channels(c))` always yields `c` again.
#[inline]
pub fn channels(color: Rgb565) -> (u8, u8, u8) { (color.r() << 3, color.g() << 2, color.b() << 3) }

/// Packed 16-bit value as it appears on the wire (before byte splitting).
#[inline]
pub fn packed(color: Rgb565) -> u16 { RawU16::from(color).into_inner() }

// =============================================================================
// Scene Colors
// =============================================================================

/// Pure black.
pub const BLACK: Rgb565 = rgb565(0, 0, 0);

/// Pure white.
pub const WHITE: Rgb565 = rgb565(255, 255, 255);

/// Navy background behind the text banner.
pub const BANNER_BG: Rgb565 = rgb565(8, 16, 32);

/// Banner line colors, top to bottom.
pub const BANNER_GOLD: Rgb565 = rgb565(255, 215, 64);
pub const BANNER_ICE: Rgb565 = rgb565(200, 240, 255);
pub const BANNER_MINT: Rgb565 = rgb565(180, 255, 200);
pub const BANNER_LAVENDER: Rgb565 = rgb565(180, 180, 255);

/// Near-black background of the icon page.
pub const ICON_BG: Rgb565 = rgb565(12, 12, 18);

/// Icon page caption.
pub const ICON_CAPTION: Rgb565 = rgb565(220, 220, 255);

/// Animation page caption.
pub const PULSE_CAPTION: Rgb565 = rgb565(120, 220, 255);

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_rgb565_bit_placement() {
        assert_eq!(packed(rgb565(255, 0, 0)), 0xF800);
        assert_eq!(packed(rgb565(0, 255, 0)), 0x07E0);
        assert_eq!(packed(rgb565(0, 0, 255)), 0x001F);
        assert_eq!(packed(WHITE), 0xFFFF);
        assert_eq!(packed(BLACK), 0x0000);
    }

    #[test]
    fn test_rgb565_matches_shift_and_mask() {
        // (r & 0xF8) << 8 | (g & 0xFC) << 3 | b >> 3
        assert_eq!(packed(rgb565(255, 120, 120)), 0xFBCF);
        assert_eq!(packed(rgb565(80, 220, 255)), 0x56FF);
        assert_eq!(packed(rgb565(10, 10, 20)), 0x0842);
    }

    #[test]
    fn test_rgb565_agrees_with_builtin_constants() {
        assert_eq!(rgb565(255, 255, 255), Rgb565::WHITE);
        assert_eq!(rgb565(255, 0, 0), Rgb565::RED);
        assert_eq!(rgb565(0, 0, 0), Rgb565::BLACK);
    }

    #[test]
    fn test_channels_truncate_low_bits() {
        assert_eq!(channels(rgb565(0xFF, 0xFF, 0xFF)), (0xF8, 0xFC, 0xF8));
        assert_eq!(channels(rgb565(0x07, 0x03, 0x07)), (0, 0, 0));
    }

    proptest! {
        #[test]
        fn prop_rgb565_round_trip_is_stable(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let color = rgb565(r, g, b);
            let (r2, g2, b2) = channels(color);
            prop_assert_eq!(rgb565(r2, g2, b2), color);
        }
    }
}
