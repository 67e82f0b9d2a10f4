#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deferred level transition that follows a win.
//!
//! After [`Event::LevelWon`] the system waits for a configurable delay of
//! simulated time and then requests the following level. A restart or level
//! change observed before the delay elapses cancels the pending transition, so
//! a stale transition never fires against a different level.

use std::time::Duration;

use unblock_jam_core::{Command, Event, LevelIndex};

/// Default pause between a win and the next level.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_secs(1);

/// Configuration parameters required to construct the auto-advance system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    delay: Duration,
}

impl Config {
    /// Creates a new configuration using the provided delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_ADVANCE_DELAY)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingAdvance {
    won_level: LevelIndex,
    remaining: Duration,
}

/// Pure system that turns a win into a delayed level change.
#[derive(Debug)]
pub struct AutoAdvance {
    delay: Duration,
    pending: Option<PendingAdvance>,
}

impl AutoAdvance {
    /// Creates a new auto-advance system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            delay: config.delay,
            pending: None,
        }
    }

    /// Consumes world events and emits the level change once the delay elapses.
    ///
    /// Events are processed in order, so a cancellation that precedes a tick
    /// in the same batch suppresses the transition.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::LevelWon { level, .. } => {
                    self.pending = Some(PendingAdvance {
                        won_level: *level,
                        remaining: self.delay,
                    });
                    if self.delay.is_zero() {
                        self.fire(out);
                    }
                }
                Event::LevelChanged { .. } | Event::LevelRestarted { .. } => {
                    self.pending = None;
                }
                Event::TimeAdvanced { dt } => {
                    if let Some(pending) = self.pending.as_mut() {
                        pending.remaining = pending.remaining.saturating_sub(*dt);
                        if pending.remaining.is_zero() {
                            self.fire(out);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Time left before the pending transition fires, if one is scheduled.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.pending.map(|pending| pending.remaining)
    }

    /// Drops any pending transition.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    fn fire(&mut self, out: &mut Vec<Command>) {
        if let Some(pending) = self.pending.take() {
            out.push(Command::ChangeLevel {
                level: pending.won_level.next(),
            });
        }
    }
}

impl Default for AutoAdvance {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
