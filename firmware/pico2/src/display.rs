//! LCD wiring for the RP2350-GEEK 1.14" ST7789 module.
//!
//! The panel hangs off SPI1 (SCK=GPIO10, MOSI=GPIO11) with GPIO chip-select,
//! data/command, reset and backlight lines. With the `bitbang` feature the
//! same two data pins are clocked from software instead.

use embassy_rp::gpio::Output;
#[cfg(not(feature = "bitbang"))]
use embassy_rp::peripherals::SPI1;
#[cfg(not(feature = "bitbang"))]
use embassy_rp::spi::{Blocking, Config as SpiConfig, Spi};
use embassy_time::Delay;
use geek_lcd_common::St7789;
#[cfg(feature = "bitbang")]
use geek_lcd_common::transport::BitBangTransport;
#[cfg(not(feature = "bitbang"))]
use geek_lcd_common::transport::SpiTransport;
#[cfg(not(feature = "bitbang"))]
use geek_lcd_pico2::board::LCD_SPI_FREQUENCY_HZ;

/// Byte transport to the panel.
#[cfg(not(feature = "bitbang"))]
pub type LcdTransport = SpiTransport<Spi<'static, SPI1, Blocking>, Output<'static>, Output<'static>>;

/// Byte transport to the panel (SCK, MOSI, CS, DC).
#[cfg(feature = "bitbang")]
pub type LcdTransport = BitBangTransport<Output<'static>, Output<'static>, Output<'static>, Output<'static>>;

/// Panel driver with its reset and backlight lines.
pub type Lcd = St7789<LcdTransport, Output<'static>, Output<'static>, Delay>;

/// SPI configuration for the ST7789 (mode 0, MSB first).
#[cfg(not(feature = "bitbang"))]
pub fn lcd_spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = LCD_SPI_FREQUENCY_HZ;
    config
}
