use crate::constants::{MINUTES_PER_DIAL, MINUTES_PER_STEP};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two concentric zones on the exam clock face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ring {
    Inner,
    Outer,
}

impl Ring {
    /// Column of this ring in the gauge table
    pub fn index(self) -> usize {
        match self {
            Ring::Inner => 0,
            Ring::Outer => 1,
        }
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ring::Inner => f.write_str("inner"),
            Ring::Outer => f.write_str("outer"),
        }
    }
}

impl FromStr for Ring {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "inner" | "i" => Ok(Ring::Inner),
            "outer" | "o" => Ok(Ring::Outer),
            other => bail!("Unknown ring '{}', expected 'inner' or 'outer'", other),
        }
    }
}

/// A reserved arc of minutes on one ring of the dial.
///
/// The dial is circular: a slice starting at 50 with a duration of 20
/// covers minutes 50-59 and 0-9.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlice {
    pub start_minute: u32,
    pub duration: u32,
    pub ring: Ring,
    #[serde(default)]
    pub name: String,
}

impl TimeSlice {
    pub fn new(start_minute: u32, duration: u32, ring: Ring, name: impl Into<String>) -> Self {
        Self {
            start_minute: start_minute % MINUTES_PER_DIAL,
            duration: duration.min(MINUTES_PER_DIAL),
            ring,
            name: name.into(),
        }
    }

    /// First minute past the slice, wrapped onto the dial
    pub fn end_minute(&self) -> u32 {
        (self.start_minute + self.duration) % MINUTES_PER_DIAL
    }

    /// Whether the slice lines up with the dial steps
    pub fn is_aligned(&self) -> bool {
        self.start_minute < MINUTES_PER_DIAL
            && self.start_minute % MINUTES_PER_STEP == 0
            && self.duration > 0
            && self.duration <= MINUTES_PER_DIAL
            && self.duration % MINUTES_PER_STEP == 0
    }

    pub fn is_within_time_slice(&self, minute: u32, ring: Ring) -> bool {
        ring == self.ring && arc_contains(self.start_minute, self.duration, minute)
    }

    /// Whether an arc of `duration` minutes from `start` on `ring` shares
    /// any minute with this slice
    pub fn would_overlap_with(&self, start: u32, duration: u32, ring: Ring) -> bool {
        if ring != self.ring || duration == 0 || self.duration == 0 {
            return false;
        }
        arc_contains(self.start_minute, self.duration, start)
            || arc_contains(start, duration, self.start_minute)
    }

    pub fn overlaps(&self, other: &TimeSlice) -> bool {
        self.would_overlap_with(other.start_minute, other.duration, other.ring)
    }

    /// The minutes covered, in dial order from the start
    pub fn minutes(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.duration).map(move |offset| (self.start_minute + offset) % MINUTES_PER_DIAL)
    }
}

impl fmt::Display for TimeSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ":{:02}-:{:02} {} ({} min) {}",
            self.start_minute,
            self.end_minute(),
            self.ring,
            self.duration,
            self.name
        )
    }
}

/// Circular containment of `minute` in `[start, start + duration)`
fn arc_contains(start: u32, duration: u32, minute: u32) -> bool {
    if duration >= MINUTES_PER_DIAL {
        return true;
    }
    let start = start % MINUTES_PER_DIAL;
    let minute = minute % MINUTES_PER_DIAL;
    let offset = (minute + MINUTES_PER_DIAL - start) % MINUTES_PER_DIAL;
    offset < duration
}
