//! RP2350-GEEK LCD simulator for the desktop.
//!
//! Runs the firmware's page cycle and heartbeats against an emulated ST7789,
//! so the exact byte stream the driver produces is what gets rendered.
//! Completed frames are written as PNGs.
//!
//! ```text
//! simulator [--single-loop] [--pages N] [--time-scale N] [--out DIR] [--no-png]
//!           [--i2c ADDR]... [--no-jumper] [--adc RAW]
//! ```
//!
//! `--i2c` adds a simulated device (hex, e.g. `3c`), `--no-jumper` removes the
//! SPI0 loopback wire and `--adc` sets the raw 12-bit ADC0 reading.
//!
//! Logging goes through `env_logger`; `RUST_LOG=debug` also shows every
//! rendered page and completed frame.

mod bus;
mod hal;
mod panel;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use geek_lcd_common::colors::BLACK;
use geek_lcd_common::schedule::RunMode;
use geek_lcd_common::status::{ADC_FULL_SCALE, I2C_SCAN_END as STATUS_I2C_END, I2C_SCAN_START as STATUS_I2C_START};
use geek_lcd_common::{BoardConfig, LcdFramebuffer, PageCycle, St7789};

use crate::bus::BusSetup;
use crate::hal::{SimClock, SimPin, StdDelay};
use crate::panel::EmulatedPanel;
use crate::runner::{run_concurrent, run_single_loop};

/// Command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Options {
    single_loop: bool,
    pages: u32,
    time_scale: u32,
    out_dir: Option<PathBuf>,
    bus: BusSetup,
}

impl Default for Options {
    fn default() -> Self {
        Self { single_loop: false, pages: 8, time_scale: 1, out_dir: Some(PathBuf::from("frames")), bus: BusSetup::default() }
    }
}

impl Options {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, String> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--single-loop" => options.single_loop = true,
                "--pages" => options.pages = number(&arg, args.next())?,
                "--time-scale" => options.time_scale = number(&arg, args.next())?,
                "--out" => options.out_dir = Some(PathBuf::from(args.next().ok_or("--out needs a directory")?)),
                "--no-png" => options.out_dir = None,
                "--i2c" => options.bus.i2c_devices.push(i2c_address(args.next())?),
                "--no-jumper" => options.bus.spi_jumper = false,
                "--adc" => options.bus.adc_raw = adc_reading(args.next())?,
                other => return Err(format!("Unknown argument: {other}")),
            }
        }
        Ok(options)
    }
}

fn number(
    flag: &str,
    value: Option<String>,
) -> Result<u32, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    value.parse().map_err(|_| format!("{flag}: not a number: {value}"))
}

fn i2c_address(value: Option<String>) -> Result<u8, String> {
    let value = value.ok_or("--i2c needs an address")?;
    let address = u8::from_str_radix(value.trim_start_matches("0x"), 16).map_err(|_| format!("--i2c: not a hex address: {value}"))?;
    if (STATUS_I2C_START..STATUS_I2C_END).contains(&address) {
        Ok(address)
    } else {
        Err(format!("--i2c: 0x{address:02X} is outside 0x{STATUS_I2C_START:02X}..0x{STATUS_I2C_END:02X}"))
    }
}

fn adc_reading(value: Option<String>) -> Result<u16, String> {
    let raw = u16::try_from(number("--adc", value)?).unwrap_or(u16::MAX);
    if raw <= ADC_FULL_SCALE { Ok(raw) } else { Err(format!("--adc: {raw} is above {ADC_FULL_SCALE}")) }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match if options.single_loop { BoardConfig::single_loop() } else { BoardConfig::concurrent() } {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid board configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut panel = EmulatedPanel::new(&config.panel);
    if let Some(dir) = &options.out_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            log::error!("Cannot create {}: {e}", dir.display());
            return ExitCode::FAILURE;
        }
        log::info!("Writing frames to {}", dir.display());
        panel = panel.with_png_output(dir.clone());
    }

    let clock = SimClock::new(options.time_scale);
    let lcd = St7789::new(panel, SimPin::new("RST", true), SimPin::new("BL", false), StdDelay::new(clock), config.panel);
    let fb = Box::new(LcdFramebuffer::new(BLACK));
    let cycle = PageCycle::new(config.banner, config.frame_delay_ms);
    let sampler = options.bus.sampler();

    let summary = match config.mode {
        RunMode::Concurrent => {
            log::info!("Concurrent mode, {} heartbeat(s)", config.heartbeat_count());
            run_concurrent(lcd, fb, cycle, &config.tasks, &sampler, clock, options.pages)
        }
        RunMode::SingleLoop { tick_ms } => {
            log::info!("Single loop, tick {tick_ms} ms");
            run_single_loop(lcd, fb, cycle, &config.tasks, &sampler, tick_ms, clock, options.pages)
        }
    };

    log::info!("Done: {} page(s) rendered, {} frame(s) flushed", summary.pages_rendered, summary.frames_flushed);
    ExitCode::SUCCESS
}

// =============================================================================
// Unit Tests
// =============================================================================
