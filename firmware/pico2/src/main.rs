//! Page-cycle demo firmware for the Waveshare RP2350-GEEK (RP2350).
//!
//! Drives the on-board 1.14" ST7789 LCD through four pages (text, gradient,
//! icon, pulse animation) while heartbeat tasks log status over RTT. Each
//! heartbeat also scans I2C0, runs an SPI0 loopback and reads ADC0.
//!
//! # Architecture
//!
//! Concurrent (default):
//! - Core 0: one heartbeat task per configured entry, plus the UART0 console
//! - Core 1: the page-cycle task alone, sole owner of the panel and framebuffer
//!
//! Single loop (`single-loop` feature): `main` polls a timer wheel and runs
//! heartbeat and page renders in turn; the console task still runs on core 0.
//!
//! # Console
//!
//! Send `BOOTSEL` + Enter on UART0 (GPIO0/1, 115200 8N1) to reboot into the
//! ROM USB bootloader.

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

mod display;
mod status;
mod tasks;

use defmt::{info, warn};
use embassy_executor::{Executor, Spawner};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::multicore::{Stack, spawn_core1};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{self, UartRx};
use embassy_rp::bind_interrupts;
use embassy_time::Delay;
use geek_lcd_common::colors::BLACK;
use geek_lcd_common::schedule::RunMode;
use geek_lcd_common::{LcdFramebuffer, PageCycle, St7789};
use geek_lcd_pico2::board::{CONSOLE_BAUD, board_config, pins};
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use crate::display::{Lcd, LcdTransport};
use crate::status::{StatusPeripherals, install_sampler};
use crate::tasks::{bootsel_task, heartbeat_task, install_led, page_cycle_task, run_single_loop};

bind_interrupts!(struct Irqs {
    UART0_IRQ => uart::InterruptHandler<UART0>;
});

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"geek-lcd"),
    embassy_rp::binary_info::rp_program_description!(c"ST7789 page-cycle demo for the RP2350-GEEK 1.14in LCD"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

/// Core 1 stack.
static CORE1_STACK: ConstStaticCell<Stack<8192>> = ConstStaticCell::new(Stack::new());

/// Core 1 executor (page cycle only).
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

/// Single framebuffer (~64 KB), handed to whichever loop owns the panel.
static FRAMEBUFFER: ConstStaticCell<LcdFramebuffer> = ConstStaticCell::new(LcdFramebuffer::new(BLACK));

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("RP2350-GEEK LCD demo starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());
    let config = board_config().expect("Invalid board configuration");
    info!("Panel: {}", config.panel);

    // Status LED is held on and only sampled by the heartbeats
    install_led(Output::new(p.PIN_25, Level::High));

    // Expansion-header checks shared by the heartbeats
    install_sampler(StatusPeripherals {
        i2c: p.I2C0,
        sda: p.PIN_4,
        scl: p.PIN_5,
        spi: p.SPI0,
        miso: p.PIN_16,
        cs: p.PIN_17,
        sck: p.PIN_18,
        mosi: p.PIN_19,
        adc: p.ADC,
        adc_pin: p.PIN_26,
    })
    .await;
    info!(
        "Status checks: I2C0 (SDA={} SCL={}) SPI0 loopback (MOSI={} MISO={}) ADC0 (GPIO{})",
        pins::I2C0_SDA,
        pins::I2C0_SCL,
        pins::SPI0_MOSI,
        pins::SPI0_MISO,
        pins::ADC0
    );

    // Console on UART0 RX
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = CONSOLE_BAUD;
    let console = UartRx::new(p.UART0, p.PIN_1, Irqs, p.DMA_CH0, uart_config);
    spawner.spawn(bootsel_task(console)).unwrap();

    // LCD: CS idles high, DC low, backlight off until init
    let cs = Output::new(p.PIN_9, Level::High);
    let dc = Output::new(p.PIN_8, Level::Low);

    #[cfg(not(feature = "bitbang"))]
    let transport: LcdTransport = {
        use embassy_rp::spi::Spi;
        use geek_lcd_common::transport::SpiTransport;

        let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, display::lcd_spi_config());
        info!("LCD on SPI1 (SCK={} MOSI={} CS={} DC={})", pins::LCD_SCK, pins::LCD_MOSI, pins::LCD_CS, pins::LCD_DC);
        SpiTransport::new(spi, cs, dc)
    };

    #[cfg(feature = "bitbang")]
    let transport: LcdTransport = {
        use geek_lcd_common::transport::BitBangTransport;

        let sck = Output::new(p.PIN_10, Level::Low);
        let mosi = Output::new(p.PIN_11, Level::Low);
        info!("LCD bit-banged (SCK={} MOSI={} CS={} DC={})", pins::LCD_SCK, pins::LCD_MOSI, pins::LCD_CS, pins::LCD_DC);
        BitBangTransport::new(sck, mosi, cs, dc)
    };

    let rst = Output::new(p.PIN_12, Level::High);
    let bl = Output::new(p.PIN_13, Level::Low);
    let lcd: Lcd = St7789::new(transport, rst, bl, Delay, config.panel);

    let fb = FRAMEBUFFER.take();
    let cycle = PageCycle::new(config.banner, config.frame_delay_ms);

    match config.mode {
        RunMode::Concurrent => {
            for (id, schedule) in config.tasks.heartbeats() {
                spawner.spawn(heartbeat_task(id, schedule)).unwrap();
            }

            let Some(page_task) = config.tasks.page_cycle().copied() else {
                warn!("No page-cycle entry configured; LCD stays dark");
                return;
            };

            spawn_core1(p.CORE1, CORE1_STACK.take(), move || {
                let executor1 = EXECUTOR1.init(Executor::new());
                executor1.run(|spawner| {
                    spawner.spawn(page_cycle_task(lcd, fb, cycle, page_task.schedule)).unwrap();
                });
            });
            info!("Page cycle running on core 1");
        }
        RunMode::SingleLoop { tick_ms } => {
            info!("Single loop, tick {} ms", tick_ms);
            run_single_loop(lcd, fb, cycle, &config.tasks, tick_ms).await;
        }
    }
}
