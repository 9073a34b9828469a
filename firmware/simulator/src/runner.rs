//! Desktop rendition of the firmware's two run modes.
//!
//! Concurrent mode gives every task-set entry its own thread. The panel and
//! framebuffer are moved into the page-cycle thread, so no lock guards them;
//! heartbeats read the two atomics below and take turns on the shared bus
//! sampler. Single-loop mode drives the same [`TimerWheel`] the firmware uses.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use geek_lcd_common::heartbeat::{Heartbeat, HeartbeatReport};
use geek_lcd_common::schedule::{Activity, TaskSchedule, TaskSet, TimerWheel};
use geek_lcd_common::{LcdFramebuffer, Page, PageCycle, St7789};

use crate::bus::{SharedSampler, sample};
use crate::hal::{SimClock, SimPin, StdDelay};
use crate::panel::EmulatedPanel;

pub type SimLcd = St7789<EmulatedPanel, SimPin, SimPin, StdDelay>;

/// Stand-in for the status LED, held on like the board does.
static LED_ON: AtomicBool = AtomicBool::new(true);

/// Page the cycle will render next.
static CURRENT_PAGE: AtomicU8 = AtomicU8::new(0);

/// What a finished run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_rendered: u32,
    pub frames_flushed: u32,
}

pub fn log_report(report: &HeartbeatReport) { log::info!("{}", report_line(report)) }

fn report_line(report: &HeartbeatReport) -> String {
    let mut line = format!("[heartbeat {}] #{} arch={} led={}", report.id, report.count, report.arch, u8::from(report.led_on));
    if let Some(status) = report.status {
        let centivolts = status.adc_centivolts();
        line.push_str(&format!(
            " i2c_devices={} first=0x{:02X} spi_loop={} adc={}.{:02}V",
            status.i2c.devices,
            status.first_i2c_or_zero(),
            status.spi_loop_label(),
            centivolts / 100,
            centivolts % 100
        ));
    }
    line.push_str(&format!(" lcd_page={}", report.page.name()));
    line
}

fn beat(
    heartbeat: &mut Heartbeat,
    sampler: &SharedSampler,
) -> HeartbeatReport {
    let status = sample(sampler);
    heartbeat.beat(LED_ON.load(Ordering::Relaxed), Page::from_index(CURRENT_PAGE.load(Ordering::Relaxed)), status)
}

fn render(
    lcd: &mut SimLcd,
    fb: &mut LcdFramebuffer,
    cycle: &mut PageCycle,
    delay: &mut StdDelay,
) {
    let page = cycle.render_next(fb, lcd, delay);
    CURRENT_PAGE.store(cycle.current().index(), Ordering::Relaxed);
    log::debug!("Rendered page {} (render #{})", page.name(), cycle.renders());
}

/// One thread per heartbeat plus the page-cycle thread; returns after `pages` renders.
///
/// Heartbeat threads are detached and end with the process.
pub fn run_concurrent(
    mut lcd: SimLcd,
    mut fb: Box<LcdFramebuffer>,
    mut cycle: PageCycle,
    tasks: &TaskSet,
    sampler: &SharedSampler,
    clock: SimClock,
    pages: u32,
) -> RunSummary {
    for (id, schedule) in tasks.heartbeats() {
        let sampler = sampler.clone();
        thread::Builder::new()
            .name(format!("heartbeat-{id}"))
            .spawn(move || heartbeat_loop(id, schedule, &sampler, clock))
            .expect("Failed to spawn heartbeat thread");
    }

    let Some(schedule) = tasks.page_cycle().map(|t| t.schedule) else {
        log::warn!("No page-cycle entry configured; nothing to render");
        return RunSummary { pages_rendered: 0, frames_flushed: 0 };
    };

    let page_thread = thread::Builder::new()
        .name("page-cycle".into())
        .spawn(move || {
            lcd.init_default();
            log::info!("LCD initialized: {:?}", lcd.config());

            let mut delay = StdDelay::new(clock);
            clock.sleep_ms(schedule.phase_ms());
            for _ in 0..pages {
                let started = Instant::now();
                render(&mut lcd, &mut fb, &mut cycle, &mut delay);
                // Fixed-rate like a ticker: the render time counts against the period
                let period = clock.scaled(Duration::from_millis(u64::from(schedule.period_ms())));
                if let Some(rest) = period.checked_sub(started.elapsed()) {
                    thread::sleep(rest);
                }
            }
            RunSummary { pages_rendered: cycle.renders(), frames_flushed: lcd.release().0.frames() }
        })
        .expect("Failed to spawn page-cycle thread");

    page_thread.join().expect("Page-cycle thread panicked")
}

fn heartbeat_loop(
    id: u8,
    schedule: TaskSchedule,
    sampler: &SharedSampler,
    clock: SimClock,
) {
    log::info!("Heartbeat {id} started (period {} ms, phase {} ms)", schedule.period_ms(), schedule.phase_ms());
    clock.sleep_ms(schedule.phase_ms());

    let mut heartbeat = Heartbeat::new(id);
    loop {
        log_report(&beat(&mut heartbeat, sampler));
        clock.sleep_ms(schedule.period_ms());
    }
}

/// Poll the timer wheel every `tick_ms` until `pages` renders are done.
#[allow(clippy::too_many_arguments)]
pub fn run_single_loop(
    mut lcd: SimLcd,
    mut fb: Box<LcdFramebuffer>,
    mut cycle: PageCycle,
    tasks: &TaskSet,
    sampler: &SharedSampler,
    tick_ms: u32,
    clock: SimClock,
    pages: u32,
) -> RunSummary {
    lcd.init_default();
    log::info!("LCD initialized: {:?}", lcd.config());

    let mut heartbeats: Vec<Heartbeat> = tasks.heartbeats().map(|(id, _)| Heartbeat::new(id)).collect();
    let mut wheel = TimerWheel::new(tasks);
    let mut delay = StdDelay::new(clock);
    let mut elapsed_ms: u64 = 0;

    while cycle.renders() < pages {
        for activity in wheel.poll(elapsed_ms) {
            match activity {
                Activity::Heartbeat(id) => {
                    if let Some(heartbeat) = heartbeats.iter_mut().find(|h| h.id() == id) {
                        log_report(&beat(heartbeat, sampler));
                    }
                }
                Activity::PageCycle => render(&mut lcd, &mut fb, &mut cycle, &mut delay),
            }
        }
        clock.sleep_ms(tick_ms);
        // Scheduler time advances in whole ticks, independent of the time scale
        elapsed_ms += u64::from(tick_ms);
    }

    RunSummary { pages_rendered: cycle.renders(), frames_flushed: lcd.release().0.frames() }
}

// =============================================================================
// Unit Tests
// =============================================================================
