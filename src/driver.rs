//! Tick scheduling
//!
//! The core never owns a clock. Whoever hosts a session (animation frames in
//! the browser, a plain loop in the headless runner, a test) implements
//! [`Scheduler`] and [`run`] feeds it one tick at a time.

use crate::sim::{Session, TickReport, tick};

/// Source of frames for a running session
pub trait Scheduler {
    /// Called after every completed tick; return `false` to stop
    fn frame(&mut self, session: &Session, report: &TickReport) -> bool;
}

impl<F> Scheduler for F
where
    F: FnMut(&Session, &TickReport) -> bool,
{
    fn frame(&mut self, session: &Session, report: &TickReport) -> bool {
        self(session, report)
    }
}

/// Headless scheduler: stops after `max_ticks` frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBudget {
    pub max_ticks: u64,
    pub ticks: u64,
}

impl FrameBudget {
    pub fn new(max_ticks: u64) -> Self {
        Self {
            max_ticks,
            ticks: 0,
        }
    }

    pub fn exhausted(&self) -> bool {
        self.ticks >= self.max_ticks
    }
}

impl Scheduler for FrameBudget {
    fn frame(&mut self, _session: &Session, _report: &TickReport) -> bool {
        self.ticks += 1;
        !self.exhausted()
    }
}

/// Tick `session` while it is running and the scheduler wants more frames
///
/// Returns the number of ticks performed.
pub fn run<S: Scheduler + ?Sized>(session: &mut Session, scheduler: &mut S) -> u64 {
    let mut ticks = 0;
    while session.is_running() {
        let report = tick(session);
        ticks += 1;
        if !scheduler.frame(session, &report) {
            break;
        }
    }
    log::debug!(
        "driver stopped after {} ticks in state {}",
        ticks,
        session.state().as_str()
    );
    ticks
}
