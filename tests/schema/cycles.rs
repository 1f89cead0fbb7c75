//! Integration tests for package cycle detection

use schemata_foundation::{ErrorKind, TypeName};
use schemata_schema::{Field, Linker, MessageType, ProtoFile, Schema, check_package_cycles, package_cycles};

fn t(s: &str) -> TypeName {
    TypeName::parse(s).unwrap()
}

fn message(name: &str, refs: &[&str]) -> MessageType {
    refs.iter()
        .zip(1..)
        .fold(MessageType::new(t(name)), |m, (r, tag)| m.with_field(Field::new(format!("f{tag}"), tag, t(r))))
}

/// Packages `a -> b -> c -> a`, plus `d -> a` outside the cycle.
fn triangle() -> Schema {
    Linker::new()
        .add_file(ProtoFile::new("a.proto").with_package("a").with_import("b.proto").with_declaration(message("a.A", &["b.B"])))
        .add_file(ProtoFile::new("b.proto").with_package("b").with_import("c.proto").with_declaration(message("b.B", &["c.C"])))
        .add_file(ProtoFile::new("c.proto").with_package("c").with_import("a.proto").with_declaration(message("c.C", &["a.A"])))
        .add_file(ProtoFile::new("d.proto").with_package("d").with_import("a.proto").with_declaration(message("d.D", &["a.A"])))
        .link()
        .unwrap()
}

#[test]
fn cycles_list_their_packages() {
    let cycles = package_cycles(&triangle());
    assert_eq!(cycles.len(), 1);
    let mut members = cycles[0].clone();
    members.sort();
    assert_eq!(members, vec!["a", "b", "c"]);
}

#[test]
fn cycles_are_errors_unless_permitted() {
    let err = check_package_cycles(&triangle(), false).unwrap_err();
    match err.kind {
        ErrorKind::PackageCycle(cycles) => assert_eq!(cycles[0].len(), 3),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(check_package_cycles(&triangle(), true).unwrap().len(), 1);
}

#[test]
fn references_within_a_package_are_not_cycles() {
    let schema = Linker::new()
        .add_file(ProtoFile::new("p1.proto").with_package("p").with_import("p2.proto").with_declaration(message("p.One", &["p.Two"])))
        .add_file(ProtoFile::new("p2.proto").with_package("p").with_import("p1.proto").with_declaration(message("p.Two", &["p.One"])))
        .link()
        .unwrap();
    assert!(package_cycles(&schema).is_empty());
}
