//! Refresh timing and the Idle → Sampling → Idle cycle.
//!
//! A pass runs to completion on the caller's thread; input that arrives in
//! the meantime waits in the terminal's queue.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::app::App;
use crate::error::SampleError;
use crate::system::collector::Collector;
use crate::system::users::UserLookup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Sampling,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// Periodic timer fired
    Tick,
    /// User asked for an immediate refresh
    Refresh,
    Quit,
}

pub struct Scheduler {
    state: SchedulerState,
    interval: Duration,
    next_tick: Instant,
}

impl Scheduler {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            state: SchedulerState::Idle,
            interval,
            next_tick: now + interval,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state == SchedulerState::Terminated
    }

    /// Has the timer fired?
    pub fn due(&self, now: Instant) -> bool {
        now >= self.next_tick
    }

    /// How long input polling may block before the next tick
    pub fn time_until_tick(&self, now: Instant) -> Duration {
        self.next_tick.saturating_duration_since(now)
    }

    /// Feed an event. Returns true when a sampling pass must run now.
    pub fn begin(&mut self, event: SchedulerEvent) -> bool {
        match (self.state, event) {
            (SchedulerState::Terminated, _) => false,
            (_, SchedulerEvent::Quit) => {
                self.state = SchedulerState::Terminated;
                false
            }
            (SchedulerState::Idle, SchedulerEvent::Tick | SchedulerEvent::Refresh) => {
                self.state = SchedulerState::Sampling;
                true
            }
            (SchedulerState::Sampling, _) => false,
        }
    }

    /// Mark the running pass done and arm the timer for the next one.
    pub fn complete(&mut self, now: Instant) {
        if self.state == SchedulerState::Sampling {
            self.state = SchedulerState::Idle;
        }
        self.next_tick = now + self.interval;
    }

    /// Route one event through a full cycle: sample, publish rows to `app`,
    /// re-arm. Timer ticks are swallowed while the app is paused.
    pub fn dispatch<U: UserLookup>(
        &mut self,
        event: SchedulerEvent,
        collector: &mut Collector<U>,
        app: &mut App,
        now: Instant,
    ) -> Result<(), SampleError> {
        if event == SchedulerEvent::Tick && app.paused {
            self.next_tick = now + self.interval;
            return Ok(());
        }
        if !self.begin(event) {
            return Ok(());
        }
        let snapshot = collector.refresh()?;
        app.apply_snapshot(&snapshot);
        debug!(?event, rows = app.rows.len(), "published snapshot");
        self.complete(Instant::now());
        Ok(())
    }
}
