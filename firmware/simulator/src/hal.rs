//! Host stand-ins for the board's GPIOs and delay.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

/// Output line whose level can be observed from elsewhere (e.g. the backlight).
#[derive(Debug, Clone)]
pub struct SimPin {
    label: &'static str,
    level: Arc<AtomicBool>,
}

impl SimPin {
    pub fn new(
        label: &'static str,
        high: bool,
    ) -> Self {
        Self { label, level: Arc::new(AtomicBool::new(high)) }
    }

    pub fn is_high(&self) -> bool { self.level.load(Ordering::Relaxed) }

    fn drive(
        &self,
        high: bool,
    ) {
        if self.level.swap(high, Ordering::Relaxed) != high {
            log::trace!("{} -> {}", self.label, if high { "high" } else { "low" });
        }
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

/// Wall-clock time, optionally compressed by an integer factor.
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    time_scale: u32,
}

impl SimClock {
    pub fn new(time_scale: u32) -> Self { Self { time_scale: time_scale.max(1) } }

    pub fn sleep_ms(
        &self,
        ms: u32,
    ) {
        self.sleep(Duration::from_millis(u64::from(ms)));
    }

    pub fn sleep(
        &self,
        duration: Duration,
    ) {
        thread::sleep(self.scaled(duration));
    }

    /// Real time that `duration` of board time takes here.
    pub fn scaled(
        &self,
        duration: Duration,
    ) -> Duration {
        duration / self.time_scale
    }
}

/// `DelayNs` on top of [`SimClock`].
#[derive(Debug, Clone, Copy)]
pub struct StdDelay {
    clock: SimClock,
}

impl StdDelay {
    pub fn new(clock: SimClock) -> Self { Self { clock } }
}

impl DelayNs for StdDelay {
    fn delay_ns(
        &mut self,
        ns: u32,
    ) {
        self.clock.sleep(Duration::from_nanos(u64::from(ns)));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
