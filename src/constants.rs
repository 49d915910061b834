//! Centralized constants for Teacher Toolbox
//!
//! This module contains all configurable numerical values used throughout
//! the application. Each constant includes documentation on its purpose,
//! unit, and recommended value range.

// ============================================================================
// EXAM CLOCK DIAL
// ============================================================================

/// Minutes shown around the exam clock face.
/// Unit: minutes
/// Range: Fixed, the dial is one hour
pub const MINUTES_PER_DIAL: u32 = 60;

/// Granularity of a time slice; slices start and grow in whole steps.
/// Unit: minutes
/// Range: Fixed, must divide MINUTES_PER_DIAL
pub const MINUTES_PER_STEP: u32 = 5;

/// Number of steps around the dial (60 / 5 = 12).
/// Unit: steps
pub const STEPS_PER_DIAL: u32 = MINUTES_PER_DIAL / MINUTES_PER_STEP;

/// Number of concentric rings on the dial (inner and outer).
pub const RING_COUNT: usize = 2;

/// Fraction of the dial radius covered by the inner ring.
/// Unit: ratio of radius
/// Recommended range: 0.4-0.7
pub const INNER_RING_FRACTION: f64 = 0.55;

// ============================================================================
// INTERVAL TIMER
// ============================================================================

/// Default countdown length for a work phase.
/// Unit: minutes
/// Recommended range: 1-60
pub const COUNTDOWN_DEFAULT_MINUTES: u64 = 5;

/// Minimum countdown length accepted from config or environment.
/// Unit: minutes
pub const COUNTDOWN_MIN_MINUTES: u64 = 1;

/// Maximum countdown length accepted from config or environment.
/// Unit: minutes
/// Range: Fixed maximum (3 hours)
pub const COUNTDOWN_MAX_MINUTES: u64 = 180;

/// Default rest between rounds (0 = no rest phase).
/// Unit: minutes
pub const REST_DEFAULT_MINUTES: u64 = 1;

/// Maximum rest between rounds.
/// Unit: minutes
pub const REST_MAX_MINUTES: u64 = 60;

/// Default number of work rounds.
pub const ROUNDS_DEFAULT: u32 = 1;

/// Maximum number of work rounds.
pub const ROUNDS_MAX: u32 = 20;

/// Interval between timer ticks in the CLI.
/// Unit: milliseconds
pub const TIMER_TICK_MS: u64 = 1000;

// ============================================================================
// ROSTERS
// ============================================================================

/// Days in the class list week (Monday through Sunday).
pub const DAYS_PER_WEEK: usize = 7;

/// Maximum number of names printed by a single `pick` invocation.
pub const PICK_MAX_COUNT: usize = 50;

// ============================================================================
// SETTINGS STORE KEYS
// ============================================================================

/// Settings key holding the per-weekday class lists.
pub const KEY_STUDENT_CLASSES: &str = "StudentClassSelector";

/// Settings key holding the exam clock slices.
pub const KEY_CLOCK_SLICES: &str = "ExamClockSlices";

// ============================================================================
// FILES
// ============================================================================

/// Directory name under the platform config directory.
pub const APP_DIR: &str = "teacher-toolbox";

/// TOML configuration file name.
pub const CONFIG_FILENAME: &str = "config.toml";

/// JSON settings store file name.
pub const SETTINGS_FILENAME: &str = "settings.json";
