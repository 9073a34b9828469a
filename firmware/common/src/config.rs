//! Board configuration.
//!
//! Everything that differs between the two firmware flavors lives in one
//! [`BoardConfig`] built once at startup: panel geometry and init options,
//! banner text, the periodic task set and how it is run.
//!
//! | Preset            | Heartbeats                       | Page cycle | Run mode            |
//! |-------------------|----------------------------------|------------|---------------------|
//! | `single_loop()`   | #0 every 5000 ms                 | 5000 ms    | one loop, 5000 ms   |
//! | `concurrent()`    | #0 every 5000 ms, #1 phase 2500  | 5000 ms    | one task per entry  |

use crate::scenes::Banner;
use crate::schedule::{Activity, RunMode, ScheduleError, TaskSchedule, TaskSet};
use crate::sprites::PULSE_FRAME_DELAY_MS;
use crate::st7789::PanelConfig;

/// Heartbeat and page period shared by both presets.
pub const HEARTBEAT_PERIOD_MS: u32 = 5000;

/// Startup phase of the second heartbeat in the concurrent preset.
pub const HEARTBEAT_PHASE_MS: u32 = 2500;

/// Panel framebuffer width.
pub const LCD_WIDTH: usize = 240;

/// Panel framebuffer height.
pub const LCD_HEIGHT: usize = 135;

#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub panel: PanelConfig,
    pub banner: Banner,
    pub tasks: TaskSet,
    pub mode: RunMode,
    /// Delay after each animation frame.
    pub frame_delay_ms: u32,
}

impl BoardConfig {
    /// One cooperative loop: heartbeat, page render and console poll each tick.
    pub fn single_loop() -> Result<Self, ScheduleError> {
        let every = TaskSchedule::every(HEARTBEAT_PERIOD_MS)?;
        let tasks = TaskSet::new().with(Activity::Heartbeat(0), every)?.with(Activity::PageCycle, every)?;

        Ok(Self {
            panel: PanelConfig::GEEK_1IN14,
            banner: Banner::BARE_METAL,
            tasks,
            mode: RunMode::SingleLoop { tick_ms: HEARTBEAT_PERIOD_MS },
            frame_delay_ms: PULSE_FRAME_DELAY_MS,
        })
    }

    /// Independent tasks: two interleaved heartbeats and the page cycle.
    pub fn concurrent() -> Result<Self, ScheduleError> {
        let every = TaskSchedule::every(HEARTBEAT_PERIOD_MS)?;
        let phased = TaskSchedule::new(HEARTBEAT_PERIOD_MS, HEARTBEAT_PHASE_MS)?;
        let tasks = TaskSet::new()
            .with(Activity::Heartbeat(0), every)?
            .with(Activity::Heartbeat(1), phased)?
            .with(Activity::PageCycle, every)?;

        Ok(Self {
            panel: PanelConfig::GEEK_1IN14,
            banner: Banner::RTOS,
            tasks,
            mode: RunMode::Concurrent,
            frame_delay_ms: PULSE_FRAME_DELAY_MS,
        })
    }

    /// Override the panel's rotation and inversion.
    #[must_use]
    pub fn with_panel_options(
        mut self,
        rotate_180: bool,
        invert: bool,
    ) -> Self {
        self.panel.rotate_180 = rotate_180;
        self.panel.invert = invert;
        self
    }

    /// Number of heartbeat entries.
    pub fn heartbeat_count(&self) -> usize { self.tasks.heartbeats().count() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_matches_framebuffer_size() {
        let panel = PanelConfig::GEEK_1IN14;
        assert_eq!(panel.width as usize, LCD_WIDTH);
        assert_eq!(panel.height as usize, LCD_HEIGHT);
    }

    #[test]
    fn test_single_loop_preset() {
        let config = BoardConfig::single_loop().unwrap();
        assert_eq!(config.mode, RunMode::SingleLoop { tick_ms: 5000 });
        assert_eq!(config.heartbeat_count(), 1);
        assert_eq!(config.tasks.page_cycle().map(|t| t.schedule.period_ms()), Some(5000));
        assert_eq!(config.banner, Banner::BARE_METAL);
        assert_eq!(config.frame_delay_ms, 160);
    }

    #[test]
    fn test_concurrent_preset() {
        let config = BoardConfig::concurrent().unwrap();
        assert_eq!(config.mode, RunMode::Concurrent);
        assert_eq!(config.heartbeat_count(), 2);

        let phases: Vec<(u8, u32)> = config.tasks.heartbeats().map(|(id, s)| (id, s.phase_ms())).collect();
        assert_eq!(phases, vec![(0, 0), (1, 2500)]);
        assert_eq!(config.banner.lines[1], "Embassy LCD demo");
    }

    #[test]
    fn test_panel_options_override() {
        let config = BoardConfig::single_loop().unwrap().with_panel_options(false, false);
        assert!(!config.panel.rotate_180);
        assert!(!config.panel.invert);
        assert_eq!(config.panel.x_offset, 40);
    }
}
