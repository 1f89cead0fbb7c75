//! Integration tests for VersionWindow

use schemata_rules::VersionWindow;
use schemata_schema::Options;
use schemata_schema::options::{FIELD_SINCE, FIELD_UNTIL};

#[test]
fn unbounded_windows_keep_everything() {
    let window = VersionWindow::unbounded();
    assert!(window.is_unbounded());
    assert!(window.is_retained(Some("99"), Some("100")));
}

#[test]
fn versions_compare_numerically() {
    let window = VersionWindow::new(Some("1.10"), None, None).unwrap();
    assert!(window.is_retained(None, Some("1.11")));
    assert!(!window.is_retained(None, Some("1.9")));
    assert!(!window.is_retained(None, Some("1.10")));
}

#[test]
fn only_pins_one_version() {
    let window = VersionWindow::new(None, None, Some("2")).unwrap();
    assert!(window.is_retained(Some("1"), Some("3")));
    assert!(window.is_retained(Some("2"), None));
    assert!(!window.is_retained(Some("3"), None));
    assert!(!window.is_retained(None, Some("2")));
}

#[test]
fn metadata_is_read_from_options() {
    let window = VersionWindow::new(Some("2"), Some("4"), None).unwrap();
    let added_late = Options::new().with(FIELD_SINCE, "5");
    let removed_early = Options::new().with(FIELD_UNTIL, "1");
    let current = Options::new().with(FIELD_SINCE, "1").with(FIELD_UNTIL, "3");

    assert!(!window.is_retained_version(&added_late, FIELD_SINCE, FIELD_UNTIL));
    assert!(!window.is_retained_version(&removed_early, FIELD_SINCE, FIELD_UNTIL));
    assert!(window.is_retained_version(&current, FIELD_SINCE, FIELD_UNTIL));
    assert!(window.is_retained_version(&Options::new(), FIELD_SINCE, FIELD_UNTIL));
}
