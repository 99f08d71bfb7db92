//! Tests for note-to-sample association

use super::*;
use crate::app::services::stream_validator::notes::associate_notes;
use crate::app::services::stream_validator::report::FindingCategory;

#[test]
fn test_note_inside_window_binds_to_containing_focal() {
    let records = vec![
        header(2, "09:00:00", "09:10:00", "UJU"),
        note(3, "09:05:00", "vocalizing"),
    ];

    let bindings = associate_notes(&records);
    assert_eq!(bindings.bound.get(&3), Some(&2));
    assert!(bindings.is_contained(3));
    assert!(bindings.deferred_by_header.is_empty());
    assert!(bindings.findings.is_empty());
}

#[test]
fn test_note_in_nested_windows_binds_to_most_recent_start() {
    let records = vec![
        header(2, "09:00:00", "09:30:00", "UJU"),
        header(3, "09:05:00", "09:15:00", "VEE"),
        note(4, "09:06:00", "grooming nearby"),
    ];

    let bindings = associate_notes(&records);
    assert_eq!(bindings.bound.get(&4), Some(&3));
}

#[test]
fn test_note_after_inner_window_falls_back_to_outer() {
    let records = vec![
        header(2, "09:00:00", "10:00:00", "UJU"),
        header(3, "09:05:00", "09:15:00", "VEE"),
        note(4, "09:10:00", "with the inner focal"),
        note(5, "09:20:00", "back on the outer focal"),
        note(6, "10:30:00", "after both"),
    ];

    let bindings = associate_notes(&records);
    assert_eq!(bindings.bound.get(&4), Some(&3));
    assert_eq!(bindings.bound.get(&5), Some(&2));
    assert_eq!(bindings.unbound, vec![6]);
}

#[test]
fn test_note_between_focals_defers_to_next() {
    let records = vec![
        header(2, "09:00:00", "09:10:00", "UJU"),
        note(3, "09:12:00", "group moving"),
        header(4, "09:20:00", "09:30:00", "VEE"),
    ];

    let bindings = associate_notes(&records);
    assert_eq!(bindings.bound.get(&3), Some(&4));
    assert!(!bindings.is_contained(3));
    assert_eq!(bindings.deferred_by_header.get(&4), Some(&vec![3]));
}

#[test]
fn test_note_before_first_focal_defers() {
    let records = vec![
        note(2, "08:00:00", "arrived at group"),
        header(3, "09:00:00", "09:10:00", "UJU"),
    ];

    let bindings = associate_notes(&records);
    assert_eq!(bindings.bound.get(&2), Some(&3));
    assert_eq!(bindings.deferred_by_header.get(&3), Some(&vec![2]));
}

#[test]
fn test_deferred_notes_keep_time_order() {
    let records = vec![
        note(2, "08:05:00", "second in file, first in time"),
        note(3, "08:01:00", "first in time"),
        header(4, "09:00:00", "09:10:00", "UJU"),
    ];

    let bindings = associate_notes(&records);
    assert_eq!(bindings.deferred_by_header.get(&4), Some(&vec![3, 2]));
}

#[test]
fn test_note_after_last_focal_is_unbound() {
    let records = vec![
        header(2, "09:00:00", "09:10:00", "UJU"),
        note(3, "09:30:00", "leaving group"),
    ];

    let bindings = associate_notes(&records);
    assert!(bindings.bound.is_empty());
    assert_eq!(bindings.unbound, vec![3]);
    assert_eq!(bindings.findings.len(), 1);
    assert_eq!(
        bindings.findings[0].category,
        FindingCategory::NotesAfterLastFocal
    );
}

#[test]
fn test_note_on_day_without_focals() {
    let records = vec![note(2, "09:00:00", "no focals today")];

    let bindings = associate_notes(&records);
    assert_eq!(bindings.unbound, vec![2]);
    assert_eq!(
        bindings.findings[0].category,
        FindingCategory::NotesOnDaysWithoutFocals
    );
}

#[test]
fn test_association_is_deterministic() {
    let records = vec![
        header(2, "09:00:00", "09:10:00", "UJU"),
        note(3, "09:05:00", "inside"),
        note(4, "09:12:00", "between"),
        header(5, "09:20:00", "09:30:00", "VEE"),
        note(6, "09:35:00", "after"),
    ];

    let first = associate_notes(&records);
    let second = associate_notes(&records);
    assert_eq!(first.bound, second.bound);
    assert_eq!(first.deferred_by_header, second.deferred_by_header);
    assert_eq!(first.unbound, second.unbound);
}
