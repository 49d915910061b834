//! The exam clock gauge table
//!
//! A fixed `minute x ring` table maps every cell of the dial to the slice
//! that owns it. Slices live in an arena; a removed slice frees its slot
//! for the next one created.

use super::slice::{Ring, TimeSlice};
use crate::constants::{
    KEY_CLOCK_SLICES, MINUTES_PER_DIAL, MINUTES_PER_STEP, RING_COUNT, STEPS_PER_DIAL,
};
use crate::settings::SettingsStore;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fmt;

const DIAL_CELLS: usize = MINUTES_PER_DIAL as usize;

/// Arena slot of a time slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliceId(usize);

impl SliceId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 + 1)
    }
}

/// Result of a primary click on the dial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The cell was empty and a one-step slice was created there
    Created(SliceId),
    /// The cell already belonged to this slice
    Existing(SliceId),
}

impl ClickOutcome {
    pub fn id(self) -> SliceId {
        match self {
            ClickOutcome::Created(id) | ClickOutcome::Existing(id) => id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GaugeArray {
    cells: [[Option<SliceId>; RING_COUNT]; DIAL_CELLS],
    slots: Vec<Option<TimeSlice>>,
}

impl Default for GaugeArray {
    fn default() -> Self {
        Self::new()
    }
}

impl GaugeArray {
    pub fn new() -> Self {
        Self {
            cells: [[None; RING_COUNT]; DIAL_CELLS],
            slots: Vec::new(),
        }
    }

    /// Rebuild the table from stored slices.
    ///
    /// Slices that are not step-aligned or that overlap an earlier slice
    /// on the same ring are skipped.
    pub fn from_slices<I: IntoIterator<Item = TimeSlice>>(slices: I) -> Self {
        let mut gauge = Self::new();
        for slice in slices {
            let label = slice.to_string();
            if gauge.insert(slice).is_none() {
                warn!("Skipping stored time slice {}", label);
            }
        }
        gauge
    }

    pub fn load(store: &SettingsStore) -> Self {
        match store.get::<Vec<TimeSlice>>(KEY_CLOCK_SLICES) {
            Some(slices) => {
                let gauge = Self::from_slices(slices);
                debug!("Loaded {} time slices", gauge.len());
                gauge
            }
            None => Self::new(),
        }
    }

    pub fn save(&self, store: &SettingsStore) -> Result<()> {
        store
            .set(KEY_CLOCK_SLICES, &self.to_vec())
            .context("Failed to save exam clock slices")
    }

    /// Add a slice if it is aligned and its cells are free
    pub fn insert(&mut self, slice: TimeSlice) -> Option<SliceId> {
        if !slice.is_aligned() {
            return None;
        }
        if slice.minutes().any(|m| self.cell(m, slice.ring).is_some()) {
            return None;
        }

        let id = self.allocate();
        for minute in slice.minutes() {
            self.cells[minute as usize][slice.ring.index()] = Some(id);
        }
        self.slots[id.0] = Some(slice);
        Some(id)
    }

    /// Primary click: select the slice under the pointer, or create a
    /// one-step slice when the cell is empty
    pub fn click(&mut self, minute: u32, ring: Ring, name: impl Into<String>) -> ClickOutcome {
        let minute = minute % MINUTES_PER_DIAL;
        if let Some(id) = self.cell(minute, ring) {
            return ClickOutcome::Existing(id);
        }

        let start = minute - minute % MINUTES_PER_STEP;
        let slice = TimeSlice::new(start, MINUTES_PER_STEP, ring, name);
        let id = self.allocate();
        self.fill_step(start / MINUTES_PER_STEP, ring, id);
        info!("Created time slice {} {}", id, slice);
        self.slots[id.0] = Some(slice);
        ClickOutcome::Created(id)
    }

    /// Grow slice `id` by one step toward the cell under the pointer.
    ///
    /// Only the step directly after the slice's end or directly before its
    /// start qualifies. Returns false, leaving the slice unchanged, when the
    /// pointer is on the other ring, the step belongs to another slice, or
    /// the slice already covers the dial.
    pub fn extend_time_slice(&mut self, id: SliceId, minute: u32, ring: Ring) -> bool {
        let Some(slice) = self.get(id) else {
            return false;
        };
        if slice.ring != ring {
            debug!("Not extending {} across rings", id);
            return false;
        }
        if slice.duration >= MINUTES_PER_DIAL {
            return false;
        }

        let target = (minute % MINUTES_PER_DIAL) / MINUTES_PER_STEP;
        let start_step = slice.start_minute / MINUTES_PER_STEP;
        let len_steps = slice.duration / MINUTES_PER_STEP;
        let after_end = (start_step + len_steps) % STEPS_PER_DIAL;
        let before_start = (start_step + STEPS_PER_DIAL - 1) % STEPS_PER_DIAL;

        let forward = target == after_end;
        if !forward && target != before_start {
            return false;
        }
        if !self.step_free_for(target, ring, id) {
            debug!("Step {} on {} ring is taken, not extending {}", target, ring, id);
            return false;
        }

        self.fill_step(target, ring, id);
        if let Some(slice) = self.slots[id.0].as_mut() {
            if !forward {
                slice.start_minute = target * MINUTES_PER_STEP;
            }
            slice.duration += MINUTES_PER_STEP;
        }
        true
    }

    /// Secondary click: delete the slice under the pointer
    pub fn remove_at(&mut self, minute: u32, ring: Ring) -> Option<TimeSlice> {
        let id = self.cell(minute, ring)?;
        self.remove(id)
    }

    pub fn remove(&mut self, id: SliceId) -> Option<TimeSlice> {
        let slice = self.slots.get_mut(id.0)?.take()?;
        for minute in slice.minutes() {
            self.cells[minute as usize][slice.ring.index()] = None;
        }
        info!("Removed time slice {} {}", id, slice);
        Some(slice)
    }

    pub fn rename(&mut self, id: SliceId, name: impl Into<String>) -> bool {
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(slice) => {
                slice.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.cells = [[None; RING_COUNT]; DIAL_CELLS];
        self.slots.clear();
    }

    /// Owner of the cell at `minute` on `ring`
    pub fn cell(&self, minute: u32, ring: Ring) -> Option<SliceId> {
        self.cells[(minute % MINUTES_PER_DIAL) as usize][ring.index()]
    }

    pub fn slice_at(&self, minute: u32, ring: Ring) -> Option<&TimeSlice> {
        self.cell(minute, ring).and_then(|id| self.get(id))
    }

    pub fn get(&self, id: SliceId) -> Option<&TimeSlice> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn slices(&self) -> impl Iterator<Item = (SliceId, &TimeSlice)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (SliceId(i), s)))
    }

    /// Live slices ordered by ring, then start minute
    pub fn to_vec(&self) -> Vec<TimeSlice> {
        let mut slices: Vec<TimeSlice> = self.slices().map(|(_, s)| s.clone()).collect();
        slices.sort_by_key(|s| (s.ring.index(), s.start_minute));
        slices
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn allocate(&mut self) -> SliceId {
        match self.slots.iter().position(Option::is_none) {
            Some(i) => SliceId(i),
            None => {
                self.slots.push(None);
                SliceId(self.slots.len() - 1)
            }
        }
    }

    fn step_minutes(step: u32) -> std::ops::Range<u32> {
        let first = (step % STEPS_PER_DIAL) * MINUTES_PER_STEP;
        first..first + MINUTES_PER_STEP
    }

    fn step_free_for(&self, step: u32, ring: Ring, id: SliceId) -> bool {
        Self::step_minutes(step).all(|m| self.cell(m, ring).map_or(true, |owner| owner == id))
    }

    fn fill_step(&mut self, step: u32, ring: Ring, id: SliceId) {
        for minute in Self::step_minutes(step) {
            self.cells[minute as usize][ring.index()] = Some(id);
        }
    }
}
