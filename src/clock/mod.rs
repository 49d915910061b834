//! Exam clock time-slice model
//!
//! - **slice**: a coloured arc on one ring, with circular containment and overlap
//! - **gauge**: the 60 x 2 cell table the pointer gestures mutate
//! - **dial**: pointer position to (minute, ring)

pub mod dial;
pub mod gauge;
pub mod slice;

pub use dial::DialGeometry;
pub use gauge::{ClickOutcome, GaugeArray, SliceId};
pub use slice::{Ring, TimeSlice};
