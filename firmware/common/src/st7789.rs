//! ST7789 panel driver over a [`Transport`].
//!
//! The driver owns the transport, the reset and backlight lines and a delay
//! source. Rendering happens elsewhere into a [`Framebuffer`]; [`St7789::flush`]
//! streams the finished frame out.
//!
//! # Framing
//!
//! Every command byte and every data block during init and windowing gets its
//! own chip-select frame. A flush is different: after `CASET`/`RASET`/`RAMWR`,
//! chip-select is held low and DC high for the entire pixel burst, and the
//! frame is pushed through a small stack buffer in fixed-size chunks. The
//! controller keeps accumulating across chunk boundaries.
//!
//! # Coordinates
//!
//! The visible glass is smaller than the controller's native grid, so every
//! window is shifted by the panel offsets before it goes on the wire.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::colors::packed;
use crate::framebuffer::Framebuffer;
use crate::transport::Transport;

// ST7789 Commands
pub const SLPOUT: u8 = 0x11;
pub const INVOFF: u8 = 0x20;
pub const INVON: u8 = 0x21;
pub const DISPON: u8 = 0x29;
pub const CASET: u8 = 0x2A;
pub const RASET: u8 = 0x2B;
pub const RAMWR: u8 = 0x2C;
pub const MADCTL: u8 = 0x36;
pub const COLMOD: u8 = 0x3A;

/// COLMOD value for 16 bits per pixel.
pub const COLMOD_RGB565: u8 = 0x55;

// MADCTL flags
const MADCTL_MY: u8 = 0x80; // Row address order
const MADCTL_MX: u8 = 0x40; // Column address order
const MADCTL_MV: u8 = 0x20; // Row/column exchange

/// Landscape orientation of the 1.14" module.
const MADCTL_BASE: u8 = MADCTL_MY | MADCTL_MV;

// Reset timing (datasheet minimums, not tunable)
const RESET_PULSE_MS: u32 = 20;
const RESET_SETTLE_MS: u32 = 120;
const SLEEP_OUT_SETTLE_MS: u32 = 120;

/// Largest chunk the flush buffer can hold (512 bytes on the stack).
pub const MAX_CHUNK_PIXELS: usize = 256;

/// MADCTL byte for the requested orientation.
///
/// Rotating by 180° flips both address orders, so it toggles MY and MX.
#[inline]
pub const fn madctl(rotate_180: bool) -> u8 {
    if rotate_180 { MADCTL_BASE ^ (MADCTL_MY | MADCTL_MX) } else { MADCTL_BASE }
}

// =============================================================================
// Configuration
// =============================================================================

/// Physical panel geometry and init options.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Visible width in pixels.
    pub width: u16,
    /// Visible height in pixels.
    pub height: u16,
    /// Column of the first visible pixel in controller space.
    pub x_offset: u16,
    /// Row of the first visible pixel in controller space.
    pub y_offset: u16,
    pub rotate_180: bool,
    pub invert: bool,
    /// Pixels per flush chunk, clamped to `1..=MAX_CHUNK_PIXELS`.
    pub chunk_pixels: usize,
}

impl PanelConfig {
    /// Waveshare RP2350-GEEK 1.14" 240x135 module.
    pub const GEEK_1IN14: Self = Self {
        width: 240,
        height: 135,
        x_offset: 40,
        y_offset: 52,
        rotate_180: true,
        invert: true,
        chunk_pixels: 128,
    };

    /// Effective chunk size after clamping.
    #[inline]
    pub const fn chunk_len(&self) -> usize {
        if self.chunk_pixels == 0 {
            1
        } else if self.chunk_pixels > MAX_CHUNK_PIXELS {
            MAX_CHUNK_PIXELS
        } else {
            self.chunk_pixels
        }
    }

    /// Controller-space window for a panel-space rectangle.
    pub const fn window(
        &self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
    ) -> AddressWindow {
        let x0 = x + self.x_offset;
        let y0 = y + self.y_offset;
        AddressWindow { x0, y0, x1: x0 + w - 1, y1: y0 + h - 1 }
    }
}

impl Default for PanelConfig {
    fn default() -> Self { Self::GEEK_1IN14 }
}

/// Inclusive controller-space rectangle targeted by the next `RAMWR`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressWindow {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl AddressWindow {
    /// `CASET` payload: start and end column, big-endian.
    #[inline]
    pub const fn column_bytes(&self) -> [u8; 4] { span_bytes(self.x0, self.x1) }

    /// `RASET` payload: start and end row, big-endian.
    #[inline]
    pub const fn row_bytes(&self) -> [u8; 4] { span_bytes(self.y0, self.y1) }
}

#[inline]
const fn span_bytes(
    start: u16,
    end: u16,
) -> [u8; 4] {
    let [s0, s1] = start.to_be_bytes();
    let [e0, e1] = end.to_be_bytes();
    [s0, s1, e0, e1]
}

/// What one flush put on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlushStats {
    pub pixels: usize,
    pub chunks: usize,
}

/// Anything that can present a finished frame.
pub trait FrameSink {
    fn flush<const W: usize, const H: usize>(
        &mut self,
        fb: &Framebuffer<W, H>,
    ) -> FlushStats;
}

// =============================================================================
// Driver
// =============================================================================

pub struct St7789<T, RST, BL, D> {
    transport: T,
    rst: RST,
    bl: BL,
    delay: D,
    config: PanelConfig,
}

impl<T, RST, BL, D> St7789<T, RST, BL, D>
where
    T: Transport,
    RST: OutputPin,
    BL: OutputPin,
    D: DelayNs,
{
    /// Take ownership of the panel lines. Nothing is sent until [`init`](Self::init).
    pub fn new(
        transport: T,
        rst: RST,
        bl: BL,
        delay: D,
        config: PanelConfig,
    ) -> Self {
        Self { transport, rst, bl, delay, config }
    }

    #[inline]
    pub const fn config(&self) -> &PanelConfig { &self.config }

    /// Hardware reset pulse followed by the power-on settle time.
    pub fn reset(&mut self) {
        self.rst.set_low().ok();
        self.delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().ok();
        self.delay.delay_ms(RESET_SETTLE_MS);
    }

    /// Reset and configure the controller, then light the backlight.
    pub fn init(
        &mut self,
        rotate_180: bool,
        invert: bool,
    ) {
        self.reset();

        self.write_command(MADCTL);
        self.write_data(&[madctl(rotate_180)]);

        self.write_command(COLMOD);
        self.write_data(&[COLMOD_RGB565]);

        self.write_command(if invert { INVON } else { INVOFF });

        self.write_command(SLPOUT);
        self.delay.delay_ms(SLEEP_OUT_SETTLE_MS);

        self.set_window(0, 0, self.config.width, self.config.height);
        self.write_command(DISPON);

        // Backlight last so the uninitialized RAM is never visible
        self.set_backlight(true);
    }

    /// Init with the orientation and inversion from the panel config.
    pub fn init_default(&mut self) {
        let PanelConfig { rotate_180, invert, .. } = self.config;
        self.init(rotate_180, invert);
    }

    /// Address a panel-space rectangle and open a pixel write (`RAMWR`).
    ///
    /// `x + w` and `y + h` must stay within the panel; flush always passes
    /// the full extent.
    pub fn set_window(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
    ) -> AddressWindow {
        let window = self.config.window(x, y, w, h);

        self.write_command(CASET);
        self.write_data(&window.column_bytes());

        self.write_command(RASET);
        self.write_data(&window.row_bytes());

        self.write_command(RAMWR);
        window
    }

    /// Stream the whole framebuffer to the panel.
    ///
    /// The framebuffer must match the panel's visible size; the window always
    /// comes from the panel config.
    pub fn flush<const W: usize, const H: usize>(
        &mut self,
        fb: &Framebuffer<W, H>,
    ) -> FlushStats {
        let PanelConfig { width, height, .. } = self.config;
        debug_assert!(
            W == usize::from(width) && H == usize::from(height),
            "framebuffer is {}x{} but the panel is {}x{}",
            W,
            H,
            width,
            height
        );
        self.set_window(0, 0, width, height);

        let chunk_len = self.config.chunk_len();
        let mut buf = [0u8; MAX_CHUNK_PIXELS * 2];
        let mut stats = FlushStats::default();

        self.transport.select(true);
        self.transport.set_data_mode(true);

        for chunk in fb.pixels().chunks(chunk_len) {
            let bytes = &mut buf[..chunk.len() * 2];
            for (out, &color) in bytes.chunks_exact_mut(2).zip(chunk) {
                out.copy_from_slice(&packed(color).to_be_bytes());
            }
            self.transport.write(bytes);
            stats.pixels += chunk.len();
            stats.chunks += 1;
        }

        self.transport.select(false);
        stats
    }

    pub fn set_backlight(
        &mut self,
        on: bool,
    ) {
        if on {
            self.bl.set_high().ok();
        } else {
            self.bl.set_low().ok();
        }
    }

    /// Give back the transport, pins and delay.
    pub fn release(self) -> (T, RST, BL, D) { (self.transport, self.rst, self.bl, self.delay) }

    /// Send a command byte (DC low) in its own CS frame.
    fn write_command(
        &mut self,
        cmd: u8,
    ) {
        self.transport.select(true);
        self.transport.set_data_mode(false);
        self.transport.write(&[cmd]);
        self.transport.select(false);
    }

    /// Send data bytes (DC high) in their own CS frame.
    fn write_data(
        &mut self,
        data: &[u8],
    ) {
        self.transport.select(true);
        self.transport.set_data_mode(true);
        self.transport.write(data);
        self.transport.select(false);
    }
}

impl<T, RST, BL, D> FrameSink for St7789<T, RST, BL, D>
where
    T: Transport,
    RST: OutputPin,
    BL: OutputPin,
    D: DelayNs,
{
    fn flush<const W: usize, const H: usize>(
        &mut self,
        fb: &Framebuffer<W, H>,
    ) -> FlushStats {
        St7789::flush(self, fb)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, rgb565};
    use crate::test_support::{Event, EventLog, MockDelay, MockPin, RecordingTransport, commands};

    type Panel = St7789<RecordingTransport, MockPin, MockPin, MockDelay>;

    fn panel(
        log: &EventLog,
        config: PanelConfig,
    ) -> Panel {
        St7789::new(
            RecordingTransport::new(log),
            MockPin::new("rst", log),
            MockPin::new("bl", log),
            MockDelay::new(log),
            config,
        )
    }

    /// Data writes issued after the last `RAMWR`, i.e. the pixel burst.
    fn pixel_writes(events: &[Event]) -> Vec<Vec<u8>> {
        let ramwr = events
            .iter()
            .rposition(|e| *e == Event::Write(vec![RAMWR]))
            .expect("no RAMWR");
        events[ramwr + 1..]
            .iter()
            .filter_map(|e| match e {
                Event::Write(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_madctl_rotation() {
        assert_eq!(madctl(false), 0xA0);
        assert_eq!(madctl(true), 0x60);
    }

    #[test]
    fn test_reset_sequence() {
        let log = EventLog::new();
        let mut lcd = panel(&log, PanelConfig::GEEK_1IN14);
        lcd.reset();
        assert_eq!(
            log.take(),
            vec![
                Event::Pin("rst", false),
                Event::DelayMs(20),
                Event::Pin("rst", true),
                Event::DelayMs(120),
            ]
        );
    }

    #[test]
    fn test_init_command_order() {
        let log = EventLog::new();
        let mut lcd = panel(&log, PanelConfig::GEEK_1IN14);
        lcd.init(true, true);
        let events = log.take();

        assert_eq!(commands(&events), vec![MADCTL, COLMOD, INVON, SLPOUT, CASET, RASET, RAMWR, DISPON]);

        // Reset completes before the first transport activity
        let first_select = events.iter().position(|e| *e == Event::Select(true)).unwrap();
        assert_eq!(&events[..4], &[
            Event::Pin("rst", false),
            Event::DelayMs(20),
            Event::Pin("rst", true),
            Event::DelayMs(120),
        ]);
        assert_eq!(first_select, 4);

        // MADCTL and COLMOD payloads
        assert!(events.contains(&Event::Write(vec![0x60])));
        assert!(events.contains(&Event::Write(vec![0x55])));

        // 120ms settle directly after SLPOUT's frame closes
        let slpout = events.iter().position(|e| *e == Event::Write(vec![SLPOUT])).unwrap();
        assert_eq!(events[slpout + 1], Event::Select(false));
        assert_eq!(events[slpout + 2], Event::DelayMs(120));

        // Backlight is the very last action
        assert_eq!(events.last(), Some(&Event::Pin("bl", true)));
    }

    #[test]
    fn test_init_without_rotation_or_inversion() {
        let log = EventLog::new();
        let mut lcd = panel(&log, PanelConfig::GEEK_1IN14);
        lcd.init(false, false);
        let events = log.take();

        assert_eq!(commands(&events), vec![MADCTL, COLMOD, INVOFF, SLPOUT, CASET, RASET, RAMWR, DISPON]);
        assert!(events.contains(&Event::Write(vec![0xA0])));
    }

    #[test]
    fn test_each_command_has_own_cs_frame() {
        let log = EventLog::new();
        let mut lcd = panel(&log, PanelConfig::GEEK_1IN14);
        lcd.init(true, true);
        let events = log.take();

        let mut selected = false;
        let mut writes_in_frame = 0;
        for event in &events {
            match event {
                Event::Select(true) => {
                    assert!(!selected);
                    selected = true;
                    writes_in_frame = 0;
                }
                Event::Select(false) => {
                    assert_eq!(writes_in_frame, 1);
                    selected = false;
                }
                Event::Write(_) => {
                    assert!(selected);
                    writes_in_frame += 1;
                }
                _ => {}
            }
        }
        assert!(!selected);
    }

    #[test]
    fn test_set_window_applies_offsets() {
        let log = EventLog::new();
        let mut lcd = panel(&log, PanelConfig::GEEK_1IN14);
        let window = lcd.set_window(0, 0, 240, 135);

        assert_eq!(window, AddressWindow { x0: 40, y0: 52, x1: 279, y1: 186 });

        let writes: Vec<Vec<u8>> = log
            .take()
            .into_iter()
            .filter_map(|e| match e {
                Event::Write(bytes) => Some(bytes),
                _ => None,
            })
            .collect();
        assert_eq!(writes, vec![
            vec![CASET],
            vec![0x00, 40, 0x01, 0x17],
            vec![RASET],
            vec![0x00, 52, 0x00, 186],
            vec![RAMWR],
        ]);
    }

    #[test]
    fn test_flush_chunking() {
        let log = EventLog::new();
        let mut lcd = panel(&log, PanelConfig::GEEK_1IN14);
        let fb = Box::new(Framebuffer::<240, 135>::new(BLACK));

        let stats = lcd.flush(&*fb);
        let events = log.take();

        // 32400 pixels in 128-pixel chunks: 253 full + 16 remaining
        assert_eq!(stats, FlushStats { pixels: 240 * 135, chunks: 254 });

        let writes = pixel_writes(&events);
        assert_eq!(writes.len(), 254);
        assert!(writes[..253].iter().all(|w| w.len() == 256));
        assert_eq!(writes[253].len(), 32);

        // Exactly one window per flush
        assert_eq!(commands(&events), vec![CASET, RASET, RAMWR]);
    }

    #[test]
    fn test_flush_holds_cs_for_whole_burst() {
        let log = EventLog::new();
        let mut lcd = panel(&log, PanelConfig { width: 6, height: 2, chunk_pixels: 4, ..PanelConfig::GEEK_1IN14 });
        let fb = Framebuffer::<6, 2>::new(BLACK);
        lcd.flush(&fb);
        let events = log.take();

        let ramwr = events.iter().position(|e| *e == Event::Write(vec![RAMWR])).unwrap();
        assert_eq!(&events[ramwr + 1..], &[
            Event::Select(false),
            Event::Select(true),
            Event::DataMode(true),
            Event::Write(vec![0; 8]),
            Event::Write(vec![0; 8]),
            Event::Write(vec![0; 8]),
            Event::Select(false),
        ]);
    }

    #[test]
    fn test_flush_is_big_endian_scan_order() {
        let log = EventLog::new();
        let mut lcd = panel(&log, PanelConfig { width: 2, height: 2, ..PanelConfig::GEEK_1IN14 });
        let mut fb = Framebuffer::<2, 2>::new(BLACK);
        fb.set_pixel(1, 0, rgb565(255, 0, 0));
        fb.set_pixel(0, 1, rgb565(0, 0, 255));

        lcd.flush(&fb);

        let writes = pixel_writes(&log.take());
        assert_eq!(writes, vec![vec![0x00, 0x00, 0xF8, 0x00, 0x00, 0x1F, 0x00, 0x00]]);
    }

    #[test]
    fn test_chunk_len_is_clamped() {
        let zero = PanelConfig { chunk_pixels: 0, ..PanelConfig::GEEK_1IN14 };
        let huge = PanelConfig { chunk_pixels: 10_000, ..PanelConfig::GEEK_1IN14 };
        assert_eq!(zero.chunk_len(), 1);
        assert_eq!(huge.chunk_len(), MAX_CHUNK_PIXELS);

        let log = EventLog::new();
        let mut lcd = panel(&log, huge);
        let fb = Box::new(Framebuffer::<240, 135>::new(BLACK));
        let stats = lcd.flush(&*fb);
        assert_eq!(stats.chunks, (240 * 135usize).div_ceil(MAX_CHUNK_PIXELS));
        assert!(pixel_writes(&log.take()).iter().all(|w| w.len() <= MAX_CHUNK_PIXELS * 2));
    }

    #[test]
    fn test_release_returns_parts() {
        let log = EventLog::new();
        let lcd = panel(&log, PanelConfig::GEEK_1IN14);
        let (_transport, _rst, _bl, _delay) = lcd.release();
        assert!(log.take().is_empty());
    }

    #[test]
    fn test_flush_window_comes_from_panel() {
        let log = EventLog::new();
        let mut lcd = panel(&log, PanelConfig { width: 3, height: 2, ..PanelConfig::GEEK_1IN14 });
        lcd.flush(&Framebuffer::<3, 2>::new(BLACK));
        let writes: Vec<Vec<u8>> = log
            .take()
            .into_iter()
            .filter_map(|e| match e {
                Event::Write(bytes) => Some(bytes),
                _ => None,
            })
            .collect();
        assert_eq!(writes[..4], [vec![CASET], vec![0, 40, 0, 42], vec![RASET], vec![0, 52, 0, 53]]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "framebuffer is 4x4 but the panel is 240x135")]
    fn test_flush_rejects_mismatched_framebuffer() {
        let log = EventLog::new();
        let mut lcd = panel(&log, PanelConfig::GEEK_1IN14);
        lcd.flush(&Framebuffer::<4, 4>::new(BLACK));
    }
}
