//! Display core for the RP2350-GEEK 1.14" LCD.
//!
//! This crate contains platform-agnostic code shared between the simulator
//! and the Pico 2 firmware:
//!
//! - [`colors`]: RGB565 conversion and scene colors
//! - [`transport`]: CS/DC framed byte transport (hardware SPI or bit-banged)
//! - [`st7789`]: panel reset, init, address window and chunked flush
//! - [`framebuffer`]: fixed-size pixel grid with clipped primitives
//! - [`font`]: 5x7 bitmap font at 1x and 2x
//! - [`sprites`]: indexed-palette icon and animation frames
//! - [`scenes`]: the four demo scenes
//! - [`pages`]: page state machine and the cycle that renders it
//! - [`schedule`]: periodic tasks, run modes and the single-loop timer wheel
//! - [`heartbeat`]: status reports
//! - [`status`]: I2C scan, SPI loopback and ADC sample for the heartbeat
//! - [`bootsel`]: console "enter bootloader" trigger
//! - [`config`]: board presets
//!
//! # no_std Compatibility
//!
//! This crate is `no_std` outside of tests. It never allocates, never logs and
//! never blocks except through the [`DelayNs`](embedded_hal::delay::DelayNs)
//! it is handed.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod bootsel;
pub mod colors;
pub mod config;
pub mod font;
pub mod framebuffer;
pub mod heartbeat;
pub mod pages;
pub mod scenes;
pub mod schedule;
pub mod sprites;
pub mod st7789;
pub mod status;
pub mod transport;

#[cfg(test)]
mod test_support;

// Re-export commonly used items
pub use config::{BoardConfig, LCD_HEIGHT, LCD_WIDTH};
pub use framebuffer::Framebuffer;
pub use pages::{Page, PageCycle};
pub use st7789::{FrameSink, PanelConfig, St7789};

/// Framebuffer sized for the 1.14" panel.
pub type LcdFramebuffer = Framebuffer<LCD_WIDTH, LCD_HEIGHT>;
