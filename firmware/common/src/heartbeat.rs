//! Heartbeat status reports.
//!
//! A heartbeat is a counter plus a snapshot of whatever the board can cheaply
//! report: the CPU architecture it was built for, the status LED level, the
//! page the display is currently on and, when a sampler is wired up, the
//! expansion-header [`StatusSample`]. Each heartbeat instance counts on its own.

use crate::pages::Page;
use crate::status::StatusSample;

/// Instruction set the firmware was compiled for.
pub const ARCH: &str = if cfg!(any(target_arch = "riscv32", target_arch = "riscv64")) { "riscv" } else { "arm" };

/// One periodic status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeartbeatReport {
    pub id: u8,
    /// 1 on the first beat.
    pub count: u32,
    pub arch: &'static str,
    pub led_on: bool,
    pub page: Page,
    /// Missing when no sampler is available to this heartbeat.
    pub status: Option<StatusSample>,
}

/// Per-instance heartbeat counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat {
    id: u8,
    count: u32,
}

impl Heartbeat {
    pub const fn new(id: u8) -> Self { Self { id, count: 0 } }

    #[inline]
    pub const fn id(&self) -> u8 { self.id }

    /// Beats so far.
    #[inline]
    pub const fn count(&self) -> u32 { self.count }

    /// Count one beat and build its report.
    pub fn beat(
        &mut self,
        led_on: bool,
        page: Page,
        status: Option<StatusSample>,
    ) -> HeartbeatReport {
        self.count = self.count.wrapping_add(1);
        HeartbeatReport { id: self.id, count: self.count, arch: ARCH, led_on, page, status }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_beat_counts_one() {
        let mut hb = Heartbeat::new(1);
        let report = hb.beat(true, Page::Text, None);
        assert_eq!(report.id, 1);
        assert_eq!(report.count, 1);
        assert!(report.led_on);
        assert_eq!(report.page, Page::Text);
        assert_eq!(hb.count(), 1);
    }

    #[test]
    fn test_instances_count_independently() {
        let mut a = Heartbeat::new(0);
        let mut b = Heartbeat::new(1);
        a.beat(true, Page::Text, None);
        a.beat(true, Page::Gradient, None);
        let report = b.beat(false, Page::Icon, None);
        assert_eq!(a.count(), 2);
        assert_eq!(report.count, 1);
        assert_eq!(report.page.name(), "icon");
    }

    #[test]
    fn test_arch_matches_host() {
        let report = Heartbeat::new(0).beat(true, Page::Animation, None);
        assert!(report.arch == "arm" || report.arch == "riscv");
        assert_eq!(report.arch, ARCH);
    }

    #[test]
    fn test_report_carries_status_sample() {
        let sample = StatusSample { spi_loopback_ok: true, adc_raw: Some(2048), ..StatusSample::default() };
        let mut hb = Heartbeat::new(0);
        let report = hb.beat(true, Page::Text, Some(sample));
        assert_eq!(report.status, Some(sample));
        assert_eq!(hb.beat(true, Page::Text, None).status, None);
    }
}
