use std::time::Duration;

use tracing::trace;

use crate::error::Rejected;

/// Round lengths offered on the setup screen.
pub const ROUND_DURATIONS: [u32; 3] = [60, 90, 120];
pub const DEFAULT_ROUND_SECS: u32 = 60;

const ONE_SECOND: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    Ticked(u32),
    Expired,
}

/// Countdown for a single round.
///
/// `remaining` never exceeds `duration`. While running, wall time fed in via
/// [`RoundClock::advance`] is converted into whole-second ticks; the partial
/// second carried between calls is the scheduled next tick and is dropped
/// whenever the clock stops, so a stale partial second can never fire.
#[derive(Debug, Clone)]
pub struct RoundClock {
    duration: u32,
    remaining: u32,
    running: bool,
    carry: Duration,
}

impl RoundClock {
    pub fn new(duration: u32) -> Result<Self, Rejected> {
        if duration == 0 {
            return Err(Rejected::InvalidDuration(duration));
        }
        Ok(Self {
            duration,
            remaining: duration,
            running: false,
            carry: Duration::ZERO,
        })
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = self.remaining > 0;
        self.carry = Duration::ZERO;
    }

    pub fn pause(&mut self) {
        self.running = false;
        self.carry = Duration::ZERO;
    }

    pub fn resume(&mut self) {
        self.start();
    }

    /// Stops and refills to the configured duration.
    pub fn reset(&mut self) {
        self.pause();
        self.remaining = self.duration;
    }

    pub fn reconfigure(&mut self, duration: u32) -> Result<(), Rejected> {
        if duration == 0 {
            return Err(Rejected::InvalidDuration(duration));
        }
        self.duration = duration;
        self.reset();
        Ok(())
    }

    /// One elapsed second. Reports `Expired` exactly once, on the tick that
    /// reaches zero; a stopped clock ignores ticks.
    pub fn tick(&mut self) -> Option<ClockEvent> {
        if !self.running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        trace!(remaining = self.remaining, "clock tick");
        if self.remaining == 0 {
            self.pause();
            return Some(ClockEvent::Expired);
        }
        Some(ClockEvent::Ticked(self.remaining))
    }

    /// Feeds wall time into the clock and fires any whole seconds it covers.
    pub fn advance(&mut self, elapsed: Duration) -> Option<ClockEvent> {
        if !self.running {
            return None;
        }
        self.carry += elapsed;

        let mut last = None;
        while self.running && self.carry >= ONE_SECOND {
            self.carry -= ONE_SECOND;
            last = self.tick();
        }
        last
    }
}

impl Default for RoundClock {
    fn default() -> Self {
        Self {
            duration: DEFAULT_ROUND_SECS,
            remaining: DEFAULT_ROUND_SECS,
            running: false,
            carry: Duration::ZERO,
        }
    }
}
