//! Emulated ST7789 controller.
//!
//! Sits where the SPI transport would be and interprets the byte stream the
//! driver sends: commands on DC low, parameters and pixels on DC high, all
//! ignored unless chip-select is asserted. `RAMWR` pixels land in a
//! [`SimulatorDisplay`] at controller coordinates minus the glass offsets, and
//! every time the write cursor wraps past the end of the window a frame is
//! counted (and optionally saved as a PNG).

use std::path::PathBuf;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettings, OutputSettingsBuilder, SimulatorDisplay};
use geek_lcd_common::PanelConfig;
use geek_lcd_common::st7789::{CASET, COLMOD, DISPON, INVOFF, INVON, MADCTL, RAMWR, RASET, SLPOUT};
use geek_lcd_common::transport::Transport;

/// Controller-space address window, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

pub struct EmulatedPanel {
    display: SimulatorDisplay<Rgb565>,
    x_offset: u16,
    y_offset: u16,

    selected: bool,
    is_data: bool,
    command: Option<u8>,
    params: Vec<u8>,

    window: Window,
    cursor: (u16, u16),
    pending_high: Option<u8>,

    madctl: u8,
    colmod: u8,
    inverted: bool,
    awake: bool,
    display_on: bool,

    frames: u32,
    out_dir: Option<PathBuf>,
    output_settings: OutputSettings,
}

impl EmulatedPanel {
    pub fn new(panel: &PanelConfig) -> Self {
        let x1 = panel.x_offset + panel.width - 1;
        let y1 = panel.y_offset + panel.height - 1;
        Self {
            display: SimulatorDisplay::new(Size::new(u32::from(panel.width), u32::from(panel.height))),
            x_offset: panel.x_offset,
            y_offset: panel.y_offset,
            selected: false,
            is_data: false,
            command: None,
            params: Vec::with_capacity(4),
            window: Window { x0: panel.x_offset, y0: panel.y_offset, x1, y1 },
            cursor: (panel.x_offset, panel.y_offset),
            pending_high: None,
            madctl: 0,
            colmod: 0,
            inverted: false,
            awake: false,
            display_on: false,
            frames: 0,
            out_dir: None,
            output_settings: OutputSettingsBuilder::new().scale(2).build(),
        }
    }

    /// Save every completed frame as `frame_NNNN.png` under `dir`.
    #[must_use]
    pub fn with_png_output(
        mut self,
        dir: PathBuf,
    ) -> Self {
        self.out_dir = Some(dir);
        self
    }

    pub fn frames(&self) -> u32 { self.frames }

    pub fn window(&self) -> Window { self.window }

    pub fn madctl(&self) -> u8 { self.madctl }

    pub fn colmod(&self) -> u8 { self.colmod }

    pub fn is_inverted(&self) -> bool { self.inverted }

    /// Out of sleep and display on.
    pub fn is_running(&self) -> bool { self.awake && self.display_on }

    /// Visible pixel at glass coordinates.
    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Rgb565 {
        self.display.get_pixel(Point::new(x, y))
    }

    fn begin_command(
        &mut self,
        command: u8,
    ) {
        self.command = Some(command);
        self.params.clear();
        self.pending_high = None;

        match command {
            SLPOUT => self.awake = true,
            INVON => self.inverted = true,
            INVOFF => self.inverted = false,
            DISPON => self.display_on = true,
            RAMWR => self.cursor = (self.window.x0, self.window.y0),
            CASET | RASET | MADCTL | COLMOD => {}
            other => log::debug!("Unhandled command 0x{other:02X}"),
        }
    }

    fn data_byte(
        &mut self,
        byte: u8,
    ) {
        match self.command {
            Some(RAMWR) => match self.pending_high.take() {
                None => self.pending_high = Some(byte),
                Some(high) => self.write_pixel(u16::from_be_bytes([high, byte])),
            },
            Some(CASET) => {
                self.params.push(byte);
                if let Some((start, end)) = address_pair(&self.params) {
                    self.window.x0 = start;
                    self.window.x1 = end;
                }
            }
            Some(RASET) => {
                self.params.push(byte);
                if let Some((start, end)) = address_pair(&self.params) {
                    self.window.y0 = start;
                    self.window.y1 = end;
                }
            }
            Some(MADCTL) => self.madctl = byte,
            Some(COLMOD) => self.colmod = byte,
            _ => log::trace!("Stray data byte 0x{byte:02X}"),
        }
    }

    fn write_pixel(
        &mut self,
        raw: u16,
    ) {
        let (cx, cy) = self.cursor;
        let x = i32::from(cx) - i32::from(self.x_offset);
        let y = i32::from(cy) - i32::from(self.y_offset);
        Pixel(Point::new(x, y), Rgb565::from(RawU16::new(raw))).draw(&mut self.display).ok();

        if cx < self.window.x1 {
            self.cursor.0 = cx + 1;
        } else if cy < self.window.y1 {
            self.cursor = (self.window.x0, cy + 1);
        } else {
            self.cursor = (self.window.x0, self.window.y0);
            self.frame_complete();
        }
    }

    fn frame_complete(&mut self) {
        self.frames += 1;
        log::debug!("Frame {} complete", self.frames);

        if let Some(dir) = &self.out_dir {
            let path = dir.join(format!("frame_{:04}.png", self.frames));
            if let Err(e) = self.display.to_rgb_output_image(&self.output_settings).save_png(&path) {
                log::warn!("Failed to save {}: {e}", path.display());
            }
        }
    }
}

/// Big-endian start/end pair once all four parameter bytes are in.
fn address_pair(params: &[u8]) -> Option<(u16, u16)> {
    match params {
        [s0, s1, e0, e1] => Some((u16::from_be_bytes([*s0, *s1]), u16::from_be_bytes([*e0, *e1]))),
        _ => None,
    }
}

impl Transport for EmulatedPanel {
    fn select(
        &mut self,
        active: bool,
    ) {
        self.selected = active;
    }

    fn set_data_mode(
        &mut self,
        is_data: bool,
    ) {
        self.is_data = is_data;
    }

    fn write(
        &mut self,
        bytes: &[u8],
    ) {
        if !self.selected {
            log::trace!("Dropped {} bytes written without chip-select", bytes.len());
            return;
        }
        for &byte in bytes {
            if self.is_data {
                self.data_byte(byte);
            } else {
                self.begin_command(byte);
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use geek_lcd_common::colors::{BLACK, rgb565};
    use geek_lcd_common::st7789::{COLMOD_RGB565, madctl};
    use geek_lcd_common::{LcdFramebuffer, St7789};

    use super::*;
    use crate::hal::{SimClock, SimPin, StdDelay};

    fn driver() -> (St7789<EmulatedPanel, SimPin, SimPin, StdDelay>, SimPin) {
        let panel = PanelConfig::GEEK_1IN14;
        let bl = SimPin::new("BL", false);
        let delay = StdDelay::new(SimClock::new(u32::MAX));
        let lcd = St7789::new(EmulatedPanel::new(&panel), SimPin::new("RST", true), bl.clone(), delay, panel);
        (lcd, bl)
    }

    #[test]
    fn test_init_state() {
        let (mut lcd, bl) = driver();
        lcd.init_default();
        assert!(bl.is_high());

        let (panel, ..) = lcd.release();
        assert!(panel.is_running());
        assert!(panel.is_inverted());
        assert_eq!(panel.madctl(), madctl(true));
        assert_eq!(panel.colmod(), COLMOD_RGB565);
        assert_eq!(panel.window(), Window { x0: 40, y0: 52, x1: 279, y1: 186 });
        assert_eq!(panel.frames(), 0);
    }

    #[test]
    fn test_flush_lands_in_display() {
        let (mut lcd, _) = driver();
        lcd.init_default();

        let marker = rgb565(255, 128, 0);
        let mut fb = Box::new(LcdFramebuffer::new(BLACK));
        fb.set_pixel(0, 0, marker);
        fb.set_pixel(239, 134, marker);
        lcd.flush(&*fb);

        let (panel, ..) = lcd.release();
        assert_eq!(panel.frames(), 1);
        assert_eq!(panel.pixel(0, 0), marker);
        assert_eq!(panel.pixel(239, 134), marker);
        assert_eq!(panel.pixel(120, 60), BLACK);
    }

    #[test]
    fn test_each_flush_counts_one_frame() {
        let (mut lcd, _) = driver();
        lcd.init_default();
        let fb = Box::new(LcdFramebuffer::new(BLACK));
        for _ in 0..3 {
            lcd.flush(&*fb);
        }
        assert_eq!(lcd.release().0.frames(), 3);
    }

    #[test]
    fn test_writes_without_select_are_ignored() {
        let mut panel = EmulatedPanel::new(&PanelConfig::GEEK_1IN14);
        panel.set_data_mode(false);
        panel.write(&[INVON]);
        assert!(!panel.is_inverted());

        panel.select(true);
        panel.write(&[INVON]);
        panel.select(false);
        assert!(panel.is_inverted());
    }

    #[test]
    fn test_address_pair() {
        assert_eq!(address_pair(&[0x00, 0x28, 0x01, 0x17]), Some((40, 279)));
        assert_eq!(address_pair(&[0x00, 0x28]), None);
    }
}
