//! Integration tests for Version ordering

use schemata_foundation::Version;

#[test]
fn sorting_uses_numeric_segments() {
    let mut versions: Vec<Version> = ["1.10", "1.2", "1.9.1", "0.9", "1.9"].into_iter().map(Version::from).collect();
    versions.sort();
    let sorted: Vec<&str> = versions.iter().map(Version::as_str).collect();
    assert_eq!(sorted, vec!["0.9", "1.2", "1.9", "1.9.1", "1.10"]);
}

#[test]
fn qualifiers_are_ordered() {
    assert!(Version::from("2.0-alpha") < Version::from("2.0-beta"));
    assert!(Version::from("2.0-rc9") < Version::from("2.0-rc10"));
}

#[test]
fn display_keeps_the_written_form() {
    assert_eq!(Version::from("1.01").to_string(), "1.01");
    assert_eq!(Version::from("1.01"), Version::from("1.1"));
}
