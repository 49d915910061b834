//! Countdown and interval timer
//!
//! A plan is a number of work rounds with an optional rest between them.
//! The timer is driven by elapsed time rather than by a clock of its own,
//! so the caller decides how often to tick.

use crate::constants::{COUNTDOWN_MAX_MINUTES, COUNTDOWN_MIN_MINUTES, REST_MAX_MINUTES, ROUNDS_MAX};
use anyhow::{bail, Result};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    Rest,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Work => f.write_str("work"),
            Phase::Rest => f.write_str("rest"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalPlan {
    pub work: Duration,
    pub rest: Duration,
    pub rounds: u32,
}

impl IntervalPlan {
    /// A single countdown with no rest
    pub fn countdown(length: Duration) -> Self {
        Self {
            work: length,
            rest: Duration::ZERO,
            rounds: 1,
        }
    }

    /// Build a plan from user-supplied minute counts, rejecting anything
    /// outside the limits the config file is clamped to
    pub fn from_minutes(work: u64, rest: u64, rounds: u32) -> Result<Self> {
        if !(COUNTDOWN_MIN_MINUTES..=COUNTDOWN_MAX_MINUTES).contains(&work) {
            bail!(
                "Work length must be {}-{} minutes, got {}",
                COUNTDOWN_MIN_MINUTES,
                COUNTDOWN_MAX_MINUTES,
                work
            );
        }
        if rest > REST_MAX_MINUTES {
            bail!("Rest must be 0-{} minutes, got {}", REST_MAX_MINUTES, rest);
        }
        if !(1..=ROUNDS_MAX).contains(&rounds) {
            bail!("Rounds must be 1-{}, got {}", ROUNDS_MAX, rounds);
        }
        Ok(Self {
            work: Duration::from_secs(work * 60),
            rest: Duration::from_secs(rest * 60),
            rounds,
        })
    }

    /// Total running time of the plan, saturating at `Duration::MAX`
    pub fn total(&self) -> Duration {
        if self.rounds == 0 {
            return Duration::ZERO;
        }
        self.work
            .saturating_mul(self.rounds)
            .saturating_add(self.rest.saturating_mul(self.rounds - 1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    PhaseStarted { phase: Phase, round: u32 },
    Finished,
}

#[derive(Debug, Clone)]
pub struct IntervalTimer {
    plan: IntervalPlan,
    phase: Phase,
    round: u32,
    remaining: Duration,
    running: bool,
    finished: bool,
}

impl IntervalTimer {
    pub fn new(plan: IntervalPlan) -> Self {
        Self {
            plan,
            phase: Phase::Work,
            round: 1,
            remaining: plan.work,
            running: false,
            finished: plan.rounds == 0,
        }
    }

    pub fn plan(&self) -> &IntervalPlan {
        &self.plan
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current round, starting at 1
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Time left in the current phase
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn start(&mut self) {
        if !self.finished {
            self.running = true;
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.plan);
    }

    /// Move the timer forward by `elapsed`, reporting every phase change.
    /// A paused or finished timer ignores the call.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        if !self.running || self.finished {
            return events;
        }

        let mut left = elapsed;
        loop {
            if left < self.remaining {
                self.remaining -= left;
                break;
            }
            left -= self.remaining;
            self.remaining = Duration::ZERO;

            match self.next_phase() {
                Some(event) => events.push(event),
                None => {
                    self.running = false;
                    self.finished = true;
                    events.push(TimerEvent::Finished);
                    break;
                }
            }
        }
        events
    }

    fn next_phase(&mut self) -> Option<TimerEvent> {
        match self.phase {
            Phase::Work if self.round >= self.plan.rounds => return None,
            Phase::Work if !self.plan.rest.is_zero() => {
                self.phase = Phase::Rest;
                self.remaining = self.plan.rest;
            }
            Phase::Work | Phase::Rest => {
                self.phase = Phase::Work;
                self.round += 1;
                self.remaining = self.plan.work;
            }
        }
        Some(TimerEvent::PhaseStarted {
            phase: self.phase,
            round: self.round,
        })
    }
}

/// `mm:ss`, or `h:mm:ss` past an hour
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}
