//! Class rosters and the random name picker
//!
//! - **student**: one roster line, with its optional weighting suffix
//! - **class**: a roster file and the weighted, recency-aware picker
//! - **selector**: per-weekday class lists persisted in the settings store

pub mod class;
pub mod selector;
pub mod student;

pub use class::StudentClass;
pub use selector::StudentClassSelector;
pub use student::Student;
