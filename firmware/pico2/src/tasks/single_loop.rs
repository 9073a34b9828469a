//! Cooperative single-loop runner (`single-loop` feature).
//!
//! One loop polls the timer wheel, runs every due activity in order, then
//! sleeps one tick. An animation render blocks the whole loop until its last
//! frame is out; the wheel skips whatever periods that costs.

use core::sync::atomic::Ordering;

use embassy_time::{Delay, Instant, Timer};
use geek_lcd_common::heartbeat::Heartbeat;
use geek_lcd_common::schedule::{Activity, MAX_TASKS, TaskSet, TimerWheel};
use geek_lcd_common::{LcdFramebuffer, PageCycle};
use heapless::Vec;

use super::heartbeat::{CURRENT_PAGE, led_on, log_report};
use crate::display::Lcd;
use crate::status::sample_status;

pub async fn run_single_loop(
    mut lcd: Lcd,
    fb: &'static mut LcdFramebuffer,
    mut cycle: PageCycle,
    tasks: &TaskSet,
    tick_ms: u32,
) -> ! {
    lcd.init_default();
    defmt::info!("LCD initialized: {}", lcd.config());

    let mut heartbeats: Vec<Heartbeat, MAX_TASKS> = tasks.heartbeats().map(|(id, _)| Heartbeat::new(id)).collect();
    let mut wheel = TimerWheel::new(tasks);
    let mut delay = Delay;
    let start = Instant::now();

    loop {
        for activity in wheel.poll(start.elapsed().as_millis()) {
            match activity {
                Activity::Heartbeat(id) => {
                    if let Some(heartbeat) = heartbeats.iter_mut().find(|h| h.id() == id) {
                        let status = sample_status().await;
                        log_report(&heartbeat.beat(led_on(), cycle.current(), status));
                    }
                }
                Activity::PageCycle => {
                    cycle.render_next(fb, &mut lcd, &mut delay);
                    CURRENT_PAGE.store(cycle.current().index(), Ordering::Relaxed);
                }
            }
        }
        Timer::after_millis(u64::from(tick_ms)).await;
    }
}
