//! UART0 console listener.
//!
//! Watches for a `BOOTSEL` line and reboots into the ROM USB bootloader so a
//! new image can be dropped on without touching the board's buttons.

use defmt::{info, warn};
use embassy_rp::uart::{Async, UartRx};
use embassy_time::Timer;
use geek_lcd_common::bootsel::BootselDetector;
use geek_lcd_pico2::board::BOOTSEL_REBOOT_DELAY_MS;

/// `reboot()` type flag selecting the BOOTSEL (USB mass storage) target.
const REBOOT_TYPE_BOOTSEL: u32 = 0x0002;

#[embassy_executor::task]
pub async fn bootsel_task(mut rx: UartRx<'static, Async>) {
    info!("Console listening on UART0, send BOOTSEL + Enter to reflash");

    let mut detector = BootselDetector::new();
    let mut byte = [0u8; 1];
    loop {
        if let Err(e) = rx.read(&mut byte).await {
            warn!("Console read error: {}", e);
            continue;
        }
        if detector.feed(byte[0]) {
            info!("BOOTSEL command received; entering ROM USB");
            Timer::after_millis(BOOTSEL_REBOOT_DELAY_MS).await;
            reboot_to_bootsel();
        }
    }
}

fn reboot_to_bootsel() {
    // SAFETY: ROM call that resets the chip; nothing runs after it returns.
    unsafe {
        embassy_rp::rom_data::reboot(REBOOT_TYPE_BOOTSEL, 10, 0, 0);
    }
}
