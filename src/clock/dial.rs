use super::slice::Ring;
use crate::constants::{INNER_RING_FRACTION, MINUTES_PER_DIAL};
use std::f64::consts::TAU;

/// Maps pointer positions on the clock face to dial cells.
/// Screen coordinates, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialGeometry {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub inner_fraction: f64,
}

impl DialGeometry {
    pub fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius,
            inner_fraction: INNER_RING_FRACTION,
        }
    }

    /// Minute and ring under the pointer, or `None` outside the face.
    /// Minute 0 is at twelve o'clock and minutes run clockwise.
    pub fn locate(&self, x: f64, y: f64) -> Option<(u32, Ring)> {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        let distance = dx.hypot(dy);
        if !distance.is_finite() || distance > self.radius {
            return None;
        }

        let angle = dx.atan2(-dy).rem_euclid(TAU);
        let minute = ((angle / TAU) * f64::from(MINUTES_PER_DIAL)).floor() as u32 % MINUTES_PER_DIAL;

        let ring = if distance <= self.radius * self.inner_fraction {
            Ring::Inner
        } else {
            Ring::Outer
        };
        Some((minute, ring))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dial() -> DialGeometry {
        DialGeometry::new(100.0, 100.0, 100.0)
    }

    #[test]
    fn test_cardinal_points() {
        let d = dial();
        // Slightly clockwise of each quarter so the cell is unambiguous
        assert_eq!(d.locate(101.0, 5.0), Some((0, Ring::Outer)));
        assert_eq!(d.locate(195.0, 101.0), Some((15, Ring::Outer)));
        assert_eq!(d.locate(99.0, 195.0), Some((30, Ring::Outer)));
        assert_eq!(d.locate(5.0, 99.0), Some((45, Ring::Outer)));
    }

    #[test]
    fn test_inner_ring() {
        let d = dial();
        assert_eq!(d.locate(120.0, 101.0), Some((15, Ring::Inner)));
    }

    #[test]
    fn test_just_before_twelve() {
        let d = dial();
        let (minute, _) = d.locate(99.0, 10.0).unwrap();
        assert_eq!(minute, 59);
    }

    #[test]
    fn test_outside_face() {
        assert_eq!(dial().locate(250.0, 100.0), None);
        assert_eq!(dial().locate(f64::NAN, 100.0), None);
    }
}
