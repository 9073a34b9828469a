//! Periodic activities and the single-loop timer wheel.
//!
//! Every activity is described by a [`TaskSchedule`]: a period and a one-time
//! startup phase. The same [`TaskSet`] drives both run modes:
//!
//! - [`RunMode::SingleLoop`]: one loop polls a [`TimerWheel`] each tick and runs
//!   whatever is due, in task-set order.
//! - [`RunMode::Concurrent`]: each entry becomes its own task that sleeps
//!   `phase` once, then fires every `period`.
//!
//! At most one [`Activity::PageCycle`] entry is accepted, because the page
//! cycle is the only owner of the framebuffer and panel.

use core::fmt;

use heapless::Vec;

/// Upper bound on entries in a [`TaskSet`].
pub const MAX_TASKS: usize = 8;

/// Invalid schedule or task-set configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// Period of zero milliseconds
    ZeroPeriod,
    /// Phase must be strictly shorter than the period
    PhaseTooLong { phase_ms: u32, period_ms: u32 },
    /// Task set already holds `MAX_TASKS` entries
    TooManyTasks,
    /// A second page-cycle entry would share the panel
    DuplicatePageCycle,
}

impl fmt::Display for ScheduleError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::ZeroPeriod => write!(f, "period must be non-zero"),
            Self::PhaseTooLong { phase_ms, period_ms } => {
                write!(f, "phase {phase_ms} ms is not shorter than period {period_ms} ms")
            }
            Self::TooManyTasks => write!(f, "task set is full ({MAX_TASKS} entries)"),
            Self::DuplicatePageCycle => write!(f, "only one page-cycle task may own the panel"),
        }
    }
}

impl core::error::Error for ScheduleError {}

// =============================================================================
// Schedule
// =============================================================================

/// Period plus initial phase, validated so that `phase < period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskSchedule {
    period_ms: u32,
    phase_ms: u32,
}

impl TaskSchedule {
    pub const fn new(
        period_ms: u32,
        phase_ms: u32,
    ) -> Result<Self, ScheduleError> {
        if period_ms == 0 {
            return Err(ScheduleError::ZeroPeriod);
        }
        if phase_ms >= period_ms {
            return Err(ScheduleError::PhaseTooLong { phase_ms, period_ms });
        }
        Ok(Self { period_ms, phase_ms })
    }

    /// Schedule without a startup phase.
    pub const fn every(period_ms: u32) -> Result<Self, ScheduleError> { Self::new(period_ms, 0) }

    #[inline]
    pub const fn period_ms(&self) -> u32 { self.period_ms }

    /// One-time delay before the first run.
    #[inline]
    pub const fn phase_ms(&self) -> u32 { self.phase_ms }
}

/// What a periodic task does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    /// Status heartbeat with its instance id.
    Heartbeat(u8),
    /// Render and present the next page.
    PageCycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodicTask {
    pub activity: Activity,
    pub schedule: TaskSchedule,
}

impl PeriodicTask {
    pub const fn new(
        activity: Activity,
        schedule: TaskSchedule,
    ) -> Self {
        Self { activity, schedule }
    }
}

/// How the task set is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunMode {
    /// One cooperative loop, sleeping `tick_ms` between polls.
    SingleLoop { tick_ms: u32 },
    /// One independent task per entry.
    Concurrent,
}

// =============================================================================
// Task Set
// =============================================================================

/// Bounded, ordered list of periodic tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskSet {
    tasks: Vec<PeriodicTask, MAX_TASKS>,
}

impl TaskSet {
    pub const fn new() -> Self { Self { tasks: Vec::new() } }

    /// Append a task. Order is preserved and is the single-loop run order.
    pub fn push(
        &mut self,
        task: PeriodicTask,
    ) -> Result<(), ScheduleError> {
        if task.activity == Activity::PageCycle && self.page_cycle().is_some() {
            return Err(ScheduleError::DuplicatePageCycle);
        }
        self.tasks.push(task).map_err(|_| ScheduleError::TooManyTasks)
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(
        mut self,
        activity: Activity,
        schedule: TaskSchedule,
    ) -> Result<Self, ScheduleError> {
        self.push(PeriodicTask::new(activity, schedule))?;
        Ok(self)
    }

    #[inline]
    pub fn len(&self) -> usize { self.tasks.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.tasks.is_empty() }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, PeriodicTask> { self.tasks.iter() }

    /// The page-cycle entry, if any.
    pub fn page_cycle(&self) -> Option<&PeriodicTask> {
        self.tasks.iter().find(|t| t.activity == Activity::PageCycle)
    }

    /// Heartbeat entries with their ids, in order.
    pub fn heartbeats(&self) -> impl Iterator<Item = (u8, TaskSchedule)> + '_ {
        self.tasks.iter().filter_map(|t| match t.activity {
            Activity::Heartbeat(id) => Some((id, t.schedule)),
            Activity::PageCycle => None,
        })
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a PeriodicTask;
    type IntoIter = core::slice::Iter<'a, PeriodicTask>;

    fn into_iter(self) -> Self::IntoIter { self.tasks.iter() }
}

// =============================================================================
// Timer Wheel
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct Slot {
    activity: Activity,
    period_ms: u64,
    next_due_ms: u64,
}

/// Software timer wheel for [`RunMode::SingleLoop`].
///
/// Time is a caller-supplied monotonic millisecond counter whose zero is the
/// moment the wheel was built. Each slot fires at most once per [`poll`], and a
/// slot that fell more than one period behind skips the missed runs rather
/// than replaying them.
///
/// [`poll`]: TimerWheel::poll
#[derive(Debug, Clone)]
pub struct TimerWheel {
    slots: Vec<Slot, MAX_TASKS>,
}

impl TimerWheel {
    pub fn new(tasks: &TaskSet) -> Self {
        let mut slots = Vec::new();
        for task in tasks {
            // Same capacity as the task set, cannot overflow
            let _ = slots.push(Slot {
                activity: task.activity,
                period_ms: task.schedule.period_ms() as u64,
                next_due_ms: task.schedule.phase_ms() as u64,
            });
        }
        Self { slots }
    }

    /// Activities due at `now_ms`, in task-set order.
    pub fn poll(
        &mut self,
        now_ms: u64,
    ) -> Vec<Activity, MAX_TASKS> {
        let mut due = Vec::new();
        for slot in &mut self.slots {
            if now_ms < slot.next_due_ms {
                continue;
            }
            let _ = due.push(slot.activity);

            let missed = (now_ms - slot.next_due_ms) / slot.period_ms;
            slot.next_due_ms += (missed + 1) * slot.period_ms;
        }
        due
    }

    /// Earliest time at which [`poll`](Self::poll) will return something.
    pub fn next_deadline(&self) -> Option<u64> { self.slots.iter().map(|s| s.next_due_ms).min() }
}

// =============================================================================
// Unit Tests
// =============================================================================
