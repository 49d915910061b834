use teacher_toolbox::clock::{ClickOutcome, DialGeometry, GaugeArray, Ring, TimeSlice};
use teacher_toolbox::constants::{MINUTES_PER_STEP, STEPS_PER_DIAL};
use teacher_toolbox::settings::SettingsStore;
use tempfile::TempDir;

#[test]
fn test_wraparound_slice_membership() {
    let slice = TimeSlice::new(50, 20, Ring::Inner, "Section A");
    assert!(slice.is_within_time_slice(55, Ring::Inner));
    assert!(!slice.is_within_time_slice(30, Ring::Inner));
    assert!(slice.is_within_time_slice(9, Ring::Inner));
    assert!(!slice.is_within_time_slice(10, Ring::Inner));
}

#[test]
fn test_overlap_symmetric_on_same_ring() {
    for a_start in (0..60).step_by(5) {
        for a_len in (5..=55).step_by(5) {
            let a = TimeSlice::new(a_start, a_len, Ring::Outer, "");
            for b_start in (0..60).step_by(5) {
                for b_len in (5..=55).step_by(5) {
                    let b = TimeSlice::new(b_start, b_len, Ring::Outer, "");
                    assert_eq!(
                        a.would_overlap_with(b.start_minute, b.duration, b.ring),
                        b.would_overlap_with(a.start_minute, a.duration, a.ring),
                        "{} / {}",
                        a,
                        b
                    );
                }
            }
        }
    }
}

#[test]
fn test_overlap_matches_shared_minutes() {
    let a = TimeSlice::new(45, 25, Ring::Inner, "");
    for start in (0..60).step_by(5) {
        let b = TimeSlice::new(start, 10, Ring::Inner, "");
        let shared = a.minutes().any(|m| b.is_within_time_slice(m, Ring::Inner));
        assert_eq!(a.overlaps(&b), shared, "start {}", start);
    }
}

#[test]
fn test_extend_into_other_slice_is_noop() {
    let mut gauge = GaugeArray::new();
    let first = gauge.click(10, Ring::Inner, "first").id();
    let second = gauge.click(15, Ring::Inner, "second").id();
    let before_first = gauge.get(first).cloned();
    let before_second = gauge.get(second).cloned();

    // first ends where second starts, and second starts where first ends
    assert!(!gauge.extend_time_slice(first, 16, Ring::Inner));
    assert!(!gauge.extend_time_slice(second, 12, Ring::Inner));

    assert_eq!(gauge.get(first).cloned(), before_first);
    assert_eq!(gauge.get(second).cloned(), before_second);
    assert!((15..20).all(|m| gauge.cell(m, Ring::Inner) == Some(second)));
}

#[test]
fn test_extend_across_rings_is_noop() {
    let mut gauge = GaugeArray::new();
    let id = gauge.click(30, Ring::Outer, "").id();
    let before = gauge.get(id).cloned();

    assert!(!gauge.extend_time_slice(id, 35, Ring::Inner));
    assert!(!gauge.extend_time_slice(id, 25, Ring::Inner));

    assert_eq!(gauge.get(id).cloned(), before);
    assert!(gauge.cell(35, Ring::Inner).is_none());
    assert!(gauge.cell(25, Ring::Inner).is_none());
}

#[test]
fn test_extend_wraps_past_the_hour() {
    let mut gauge = GaugeArray::new();
    let id = gauge.click(50, Ring::Inner, "").id();
    for minute in [55, 0, 5] {
        assert!(gauge.extend_time_slice(id, minute, Ring::Inner), "minute {}", minute);
    }

    let slice = gauge.get(id).unwrap().clone();
    assert_eq!(slice.start_minute, 50);
    assert_eq!(slice.duration, 20);
    assert!(slice.is_within_time_slice(9, Ring::Inner));
    assert!(!slice.is_within_time_slice(10, Ring::Inner));
}

#[test]
fn test_extension_stops_at_neighbour_around_the_dial() {
    let mut gauge = GaugeArray::new();
    let blocker = gauge.click(0, Ring::Outer, "blocker").id();
    let id = gauge.click(5, Ring::Outer, "grower").id();

    let mut grown = 0;
    for step in 2..STEPS_PER_DIAL + 2 {
        if gauge.extend_time_slice(id, (step % STEPS_PER_DIAL) * MINUTES_PER_STEP, Ring::Outer) {
            grown += 1;
        }
    }

    // Everything except the blocker's step
    assert_eq!(grown, STEPS_PER_DIAL - 2);
    assert_eq!(gauge.get(id).unwrap().duration, 55);
    assert_eq!(gauge.get(blocker).unwrap().duration, 5);
}

#[test]
fn test_slices_persist_through_settings_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    let mut gauge = GaugeArray::new();
    let id = gauge.click(50, Ring::Inner, "Reading time").id();
    gauge.extend_time_slice(id, 55, Ring::Inner);
    gauge.click(20, Ring::Outer, "Questions");
    gauge.save(&SettingsStore::open(&path)).unwrap();

    let loaded = GaugeArray::load(&SettingsStore::open(&path));
    assert_eq!(loaded.to_vec(), gauge.to_vec());
    assert_eq!(
        loaded.slice_at(57, Ring::Inner).map(|s| s.name.as_str()),
        Some("Reading time")
    );
}

#[test]
fn test_pointer_to_click() {
    let dial = DialGeometry::new(200.0, 200.0, 100.0);
    let mut gauge = GaugeArray::new();

    // Right of centre near the rim: quarter past, outer ring
    let (minute, ring) = dial.locate(290.0, 201.0).unwrap();
    assert_eq!(ring, Ring::Outer);
    let outcome = gauge.click(minute, ring, "");
    assert!(matches!(outcome, ClickOutcome::Created(_)));
    assert_eq!(gauge.get(outcome.id()).unwrap().start_minute, 15);
}
