//! Heartbeat tasks and the shared status they sample.
//!
//! The status LED is owned here once main hands it over; heartbeats only read
//! its level. The page cycle publishes the page it will draw next through
//! [`CURRENT_PAGE`] so the heartbeat line can name it without touching the
//! panel. Bus checks come from the shared sampler in [`crate::status`].

use core::cell::RefCell;
use core::sync::atomic::{AtomicU8, Ordering};

use defmt::info;
use embassy_rp::gpio::Output;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Ticker, Timer};
use geek_lcd_common::Page;
use geek_lcd_common::heartbeat::{Heartbeat, HeartbeatReport};
use geek_lcd_common::schedule::TaskSchedule;
use geek_lcd_pico2::board::HEARTBEAT_POOL_SIZE;

use crate::status::sample_status;

/// Index of the page the cycle will render next.
pub static CURRENT_PAGE: AtomicU8 = AtomicU8::new(0);

static LED: Mutex<CriticalSectionRawMutex, RefCell<Option<Output<'static>>>> = Mutex::new(RefCell::new(None));

/// Hand the status LED over. It keeps whatever level it was created with.
pub fn install_led(led: Output<'static>) {
    LED.lock(|cell| {
        cell.replace(Some(led));
    });
}

/// Current LED output level (`false` if no LED was installed).
pub fn led_on() -> bool { LED.lock(|cell| cell.borrow().as_ref().is_some_and(Output::is_set_high)) }

pub fn log_report(report: &HeartbeatReport) {
    match report.status {
        Some(status) => {
            let centivolts = status.adc_centivolts();
            info!(
                "[heartbeat {}] #{} arch={} led={} i2c_devices={} first={:#04x} spi_loop={} adc={}.{=u32:02}V lcd_page={}",
                report.id,
                report.count,
                report.arch,
                report.led_on as u8,
                status.i2c.devices,
                status.first_i2c_or_zero(),
                status.spi_loop_label(),
                centivolts / 100,
                centivolts % 100,
                report.page.name()
            );
        }
        None => info!(
            "[heartbeat {}] #{} arch={} led={} lcd_page={}",
            report.id,
            report.count,
            report.arch,
            report.led_on as u8,
            report.page.name()
        ),
    }
}

/// One heartbeat: sleep the phase once, then report every period.
#[embassy_executor::task(pool_size = HEARTBEAT_POOL_SIZE)]
pub async fn heartbeat_task(
    id: u8,
    schedule: TaskSchedule,
) {
    info!("Heartbeat {} started (period {} ms, phase {} ms)", id, schedule.period_ms(), schedule.phase_ms());

    if schedule.phase_ms() > 0 {
        Timer::after_millis(u64::from(schedule.phase_ms())).await;
    }

    let mut heartbeat = Heartbeat::new(id);
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(schedule.period_ms())));
    loop {
        let status = sample_status().await;
        let page = Page::from_index(CURRENT_PAGE.load(Ordering::Relaxed));
        log_report(&heartbeat.beat(led_on(), page, status));
        ticker.next().await;
    }
}
