//! Tests for the export selection and selection files.

use std::io::Write;

use courtreel::events::{CameraAngle, TimestampEntry};
use courtreel::selection::{SelectionSet, parse_selection_file};
use courtreel::timestamp::Timestamp;
use tempfile::NamedTempFile;

fn entry(secs: u64, angle: CameraAngle) -> TimestampEntry {
    TimestampEntry::new(Timestamp::from_seconds(secs), angle)
}

#[test]
fn test_sorted_by_time_is_stable_across_angles() {
    let mut sel = SelectionSet::new();
    sel.toggle(entry(30, CameraAngle::Two));
    sel.toggle(entry(10, CameraAngle::One));
    sel.toggle(entry(30, CameraAngle::One));
    sel.toggle(entry(10, CameraAngle::Two));

    assert_eq!(
        sel.sorted_by_time(),
        vec![
            entry(10, CameraAngle::One),
            entry(10, CameraAngle::Two),
            entry(30, CameraAngle::Two),
            entry(30, CameraAngle::One),
        ]
    );
}

#[test]
fn test_toggle_off_then_on_moves_to_end() {
    let mut sel = SelectionSet::new();
    sel.toggle(entry(10, CameraAngle::One));
    sel.toggle(entry(10, CameraAngle::Two));
    sel.toggle(entry(10, CameraAngle::One));
    sel.toggle(entry(10, CameraAngle::One));

    assert_eq!(
        sel.sorted_by_time(),
        vec![entry(10, CameraAngle::Two), entry(10, CameraAngle::One)]
    );
}

#[test]
fn test_clear_empties_selection() {
    let mut sel: SelectionSet = [entry(1, CameraAngle::One), entry(2, CameraAngle::One)]
        .into_iter()
        .collect();
    assert_eq!(sel.len(), 2);
    sel.clear();
    assert!(sel.is_empty());
    assert!(sel.sorted_by_time().is_empty());
}

#[test]
fn test_selection_file_with_utf8_bom() {
    let csv_content = "\u{FEFF}Timestamp,Camera angle,Note\n1:26,1,and-one\n00:05,2,\n";

    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    file.write_all(csv_content.as_bytes()).unwrap();
    file.flush().unwrap();

    let sel = parse_selection_file(file.path()).unwrap();

    assert_eq!(
        sel.entries(),
        &[entry(86, CameraAngle::One), entry(5, CameraAngle::Two)]
    );
}

#[test]
fn test_selection_file_trims_fields() {
    let csv_content = "Timestamp , Camera angle\n 0:10 , 2 \n";

    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    file.write_all(csv_content.as_bytes()).unwrap();
    file.flush().unwrap();

    let sel = parse_selection_file(file.path()).unwrap();
    assert_eq!(sel.entries(), &[entry(10, CameraAngle::Two)]);
}

#[test]
fn test_selection_file_rejects_unknown_angle() {
    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    file.write_all(b"Timestamp,Camera angle\n0:10,3\n").unwrap();
    file.flush().unwrap();

    assert!(parse_selection_file(file.path()).is_err());
}

#[test]
fn test_missing_selection_file() {
    let result = parse_selection_file(std::path::Path::new("/nonexistent/selection.csv"));
    assert!(matches!(
        result,
        Err(courtreel::Error::SelectionParseFailed { .. })
    ));
}
