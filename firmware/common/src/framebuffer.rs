//! Fixed-size RGB565 framebuffer.
//!
//! The framebuffer is the single source of truth for what the panel shows:
//! scenes draw into it, then [`St7789::flush`](crate::st7789::St7789::flush)
//! streams it out row by row. It is allocated once (a `static` on the device,
//! a local in tests and the simulator) and mutated in place every render.
//!
//! It is also an embedded-graphics [`DrawTarget`], so styled primitives can be
//! drawn into it directly.
//!
//! # Clipping
//!
//! All drawing takes signed coordinates and silently drops anything outside
//! `[0, W) x [0, H)`. Glyphs and rectangles near the right/bottom border
//! routinely spill over, so out-of-range writes are a normal case here rather
//! than an error.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// `W` x `H` grid of colors, row-major (`index = y * W + x`).
pub struct Framebuffer<const W: usize, const H: usize> {
    rows: [[Rgb565; W]; H],
}

impl<const W: usize, const H: usize> Framebuffer<W, H> {
    /// Create a framebuffer filled with `color`.
    pub const fn new(color: Rgb565) -> Self { Self { rows: [[color; W]; H] } }

    #[inline]
    pub const fn width(&self) -> usize { W }

    #[inline]
    pub const fn height(&self) -> usize { H }

    /// All pixels in scan order, exactly `W * H` long.
    #[inline]
    pub fn pixels(&self) -> &[Rgb565] { self.rows.as_flattened() }

    /// Mutable scan-order view, for scenes that compute every pixel.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgb565] { self.rows.as_flattened_mut() }

    /// Read a pixel, `None` when out of range.
    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Option<Rgb565> {
        let (x, y) = Self::checked(x, y)?;
        Some(self.rows[y][x])
    }

    /// Fill the whole buffer.
    pub fn clear(
        &mut self,
        color: Rgb565,
    ) {
        self.pixels_mut().fill(color);
    }

    /// Write one pixel. Out-of-range coordinates are ignored.
    #[inline]
    pub fn set_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: Rgb565,
    ) {
        if let Some((x, y)) = Self::checked(x, y) {
            self.rows[y][x] = color;
        }
    }

    /// Fill a rectangle, clipped to the buffer. Non-positive sizes draw nothing.
    pub fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Rgb565,
    ) {
        if w <= 0 || h <= 0 {
            return;
        }

        // Clamp before building the Rectangle: its corner math is not saturating
        let x0 = x.clamp(0, W as i32);
        let y0 = y.clamp(0, H as i32);
        let x1 = x.saturating_add(w).clamp(0, W as i32);
        let y1 = y.saturating_add(h).clamp(0, H as i32);
        let area = Rectangle::new(Point::new(x0, y0), Size::new((x1 - x0) as u32, (y1 - y0) as u32));
        self.fill_solid(&area, color).ok();
    }

    #[inline]
    fn checked(
        x: i32,
        y: i32,
    ) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|&x| x < W)?;
        let y = usize::try_from(y).ok().filter(|&y| y < H)?;
        Some((x, y))
    }
}

impl<const W: usize, const H: usize> OriginDimensions for Framebuffer<W, H> {
    fn size(&self) -> Size { Size::new(W as u32, H as u32) }
}

impl<const W: usize, const H: usize> DrawTarget for Framebuffer<W, H> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        let (x0, x1) = (area.top_left.x as usize, bottom_right.x as usize);
        for row in &mut self.rows[area.top_left.y as usize..=bottom_right.y as usize] {
            row[x0..=x1].fill(color);
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.pixels_mut().fill(color);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
