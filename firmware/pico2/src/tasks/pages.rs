//! Page-cycle task.
//!
//! Runs alone on core 1's executor. The animation page sleeps with a blocking
//! delay between frames, which would otherwise stall every other task sharing
//! the executor.

use core::sync::atomic::Ordering;

use defmt::{debug, info};
use embassy_time::{Delay, Duration, Ticker, Timer};
use geek_lcd_common::schedule::TaskSchedule;
use geek_lcd_common::{LcdFramebuffer, PageCycle};

use super::heartbeat::CURRENT_PAGE;
use crate::display::Lcd;

/// Initialize the panel, then render one page per period.
#[embassy_executor::task]
pub async fn page_cycle_task(
    mut lcd: Lcd,
    fb: &'static mut LcdFramebuffer,
    mut cycle: PageCycle,
    schedule: TaskSchedule,
) {
    lcd.init_default();
    info!("LCD initialized: {}", lcd.config());

    if schedule.phase_ms() > 0 {
        Timer::after_millis(u64::from(schedule.phase_ms())).await;
    }

    let mut delay = Delay;
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(schedule.period_ms())));
    loop {
        let page = cycle.render_next(fb, &mut lcd, &mut delay);
        CURRENT_PAGE.store(cycle.current().index(), Ordering::Relaxed);
        debug!("Rendered page {} (render #{})", page.name(), cycle.renders());
        ticker.next().await;
    }
}
