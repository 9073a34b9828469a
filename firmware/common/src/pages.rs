//! Page cycle for the demo display.
//!
//! Pages advance unconditionally on every render:
//! Text → Gradient → Icon → Animation → Text → ...
//!
//! # Pages
//!
//! - [`Page::Text`]: four-line banner, one flush
//! - [`Page::Gradient`]: RGB ramp with a framed caption card, one flush
//! - [`Page::Icon`]: centered heart icon, one flush
//! - [`Page::Animation`]: pulse animation, one flush per frame
//!
//! A [`PageCycle`] owns the cursor. It is handed the framebuffer and the
//! panel for each render and keeps neither, so whichever task calls
//! [`PageCycle::render_next`] is the only one touching them.

use embedded_hal::delay::DelayNs;

use crate::framebuffer::Framebuffer;
use crate::scenes::{Banner, play_animation, render_gradient, render_icon, render_text};
use crate::sprites::{PULSE, PULSE_FRAME_DELAY_MS};
use crate::st7789::FrameSink;

/// Scenes shown by the page cycle.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Page {
    /// Four lines of 2x caption text on a navy background.
    #[default]
    Text = 0,

    /// Full-panel color ramp behind a white caption card.
    Gradient = 1,

    /// 16x16 heart icon centered on the panel.
    Icon = 2,

    /// Three-frame pulse played below a caption.
    Animation = 3,
}

impl Page {
    /// Number of pages in the cycle.
    pub const COUNT: usize = 4;

    /// All pages in cycle order.
    pub const ALL: [Self; Self::COUNT] = [Self::Text, Self::Gradient, Self::Icon, Self::Animation];

    /// Successor in the cycle.
    #[inline]
    pub const fn next(self) -> Self {
        match self {
            Self::Text => Self::Gradient,
            Self::Gradient => Self::Icon,
            Self::Icon => Self::Animation,
            Self::Animation => Self::Text,
        }
    }

    /// Position in the cycle (0..4).
    #[inline]
    pub const fn index(self) -> u8 { self as u8 }

    /// Page at cycle position `index`, wrapping.
    #[inline]
    pub const fn from_index(index: u8) -> Self { Self::ALL[index as usize % Self::COUNT] }

    /// Short name used in status logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Gradient => "gradient",
            Self::Icon => "icon",
            Self::Animation => "pulse",
        }
    }
}

/// Cursor over [`Page`] plus what the scenes need to render.
#[derive(Clone, Debug)]
pub struct PageCycle {
    current: Page,
    renders: u32,
    banner: Banner,
    frame_delay_ms: u32,
}

impl PageCycle {
    pub const fn new(
        banner: Banner,
        frame_delay_ms: u32,
    ) -> Self {
        Self { current: Page::Text, renders: 0, banner, frame_delay_ms }
    }

    /// Page the next [`render_next`](Self::render_next) will draw.
    #[inline]
    pub const fn current(&self) -> Page { self.current }

    /// Renders completed so far.
    #[inline]
    pub const fn renders(&self) -> u32 { self.renders }

    #[inline]
    pub const fn banner(&self) -> &Banner { &self.banner }

    /// Render the current page, present it, and advance.
    ///
    /// Static pages flush once. The animation flushes once per frame and
    /// sleeps `frame_delay_ms` after each, so this call blocks for the whole
    /// sequence. Returns the page that was rendered.
    pub fn render_next<const W: usize, const H: usize, S, D>(
        &mut self,
        fb: &mut Framebuffer<W, H>,
        sink: &mut S,
        delay: &mut D,
    ) -> Page
    where
        S: FrameSink,
        D: DelayNs,
    {
        let page = self.current;
        match page {
            Page::Text => {
                render_text(fb, &self.banner);
                sink.flush(fb);
            }
            Page::Gradient => {
                render_gradient(fb);
                sink.flush(fb);
            }
            Page::Icon => {
                render_icon(fb);
                sink.flush(fb);
            }
            Page::Animation => {
                play_animation(fb, sink, delay, &PULSE.with_frame_delay(self.frame_delay_ms));
            }
        }

        self.current = page.next();
        self.renders = self.renders.wrapping_add(1);
        page
    }
}

impl Default for PageCycle {
    fn default() -> Self { Self::new(Banner::default(), PULSE_FRAME_DELAY_MS) }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::colors::{BANNER_BG, BLACK, ICON_BG, WHITE};
    use crate::test_support::{Event, EventLog, MockDelay, SnapshotSink};

    type Fb = Framebuffer<240, 135>;

    #[test]
    fn test_page_default() {
        assert_eq!(Page::default(), Page::Text);
        assert_eq!(PageCycle::default().current(), Page::Text);
    }

    #[test]
    fn test_page_next() {
        assert_eq!(Page::Text.next(), Page::Gradient);
        assert_eq!(Page::Gradient.next(), Page::Icon);
        assert_eq!(Page::Icon.next(), Page::Animation);
        assert_eq!(Page::Animation.next(), Page::Text);
    }

    #[test]
    fn test_page_names() {
        let names: Vec<&str> = Page::ALL.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["text", "gradient", "icon", "pulse"]);
    }

    #[test]
    fn test_page_index_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_index(page.index()), page);
        }
        assert_eq!(Page::from_index(5), Page::Gradient);
    }

    #[test]
    fn test_render_next_flush_counts() {
        let log = EventLog::new();
        let mut fb = Fb::new(BLACK);
        let mut sink = SnapshotSink::default();
        let mut delay = MockDelay::new(&log);
        let mut cycle = PageCycle::new(Banner::RTOS, 160);

        let mut flushes = Vec::new();
        for _ in 0..4 {
            let before = sink.frames.len();
            cycle.render_next(&mut fb, &mut sink, &mut delay);
            flushes.push(sink.frames.len() - before);
        }

        assert_eq!(flushes, vec![1, 1, 1, 3]);
        assert_eq!(log.take(), vec![Event::DelayMs(160); 3]);
        assert_eq!(cycle.current(), Page::Text);
        assert_eq!(cycle.renders(), 4);
    }

    #[test]
    fn test_render_next_returns_rendered_page() {
        let log = EventLog::new();
        let mut fb = Fb::new(BLACK);
        let mut sink = SnapshotSink::default();
        let mut delay = MockDelay::new(&log);
        let mut cycle = PageCycle::default();

        let rendered: Vec<Page> = (0..5).map(|_| cycle.render_next(&mut fb, &mut sink, &mut delay)).collect();
        assert_eq!(rendered, vec![Page::Text, Page::Gradient, Page::Icon, Page::Animation, Page::Text]);
    }

    #[test]
    fn test_render_next_presents_each_scene() {
        let log = EventLog::new();
        let mut fb = Fb::new(BLACK);
        let mut sink = SnapshotSink::default();
        let mut delay = MockDelay::new(&log);
        let mut cycle = PageCycle::default();

        for _ in 0..3 {
            cycle.render_next(&mut fb, &mut sink, &mut delay);
        }

        // Corner pixel identifies the scene: navy, ramp origin, icon background
        assert_eq!(sink.frames[0][0], BANNER_BG);
        assert_eq!(sink.frames[1][0], BLACK);
        assert_eq!(sink.frames[1][14 * 240 + 14], WHITE);
        assert_eq!(sink.frames[2][0], ICON_BG);
    }

    #[test]
    fn test_frame_delay_is_configurable() {
        let log = EventLog::new();
        let mut fb = Fb::new(BLACK);
        let mut sink = SnapshotSink::default();
        let mut delay = MockDelay::new(&log);
        let mut cycle = PageCycle::new(Banner::BARE_METAL, 40);

        for _ in 0..4 {
            cycle.render_next(&mut fb, &mut sink, &mut delay);
        }
        assert_eq!(log.take(), vec![Event::DelayMs(40); 3]);
    }

    proptest! {
        #[test]
        fn prop_cycle_position_after_n_steps(start in 0u8..4, n in 0usize..64) {
            let mut page = Page::from_index(start);
            for _ in 0..n {
                page = page.next();
            }
            prop_assert_eq!(page.index() as usize, (start as usize + n) % Page::COUNT);
        }
    }
}
