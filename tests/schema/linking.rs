//! Integration tests for the Linker

use schemata_foundation::{ErrorKind, ScalarType, TypeName};
use schemata_schema::{
    EnumType, Extend, Field, Label, Linker, MessageType, OneOf, ProtoFile, Rpc, Service, Syntax,
    builtin,
};

fn t(s: &str) -> TypeName {
    TypeName::parse(s).unwrap()
}

fn link_errors(files: Vec<ProtoFile>) -> Vec<String> {
    let err = Linker::new().add_files(files).link().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Aggregate { operation: "link", .. }));
    err.messages()
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn relative_names_resolve_innermost_first() {
    let schema = Linker::new()
        .add_file(
            ProtoFile::new("a.proto")
                .with_package("a.b")
                .with_declaration(MessageType::new(t("a.b.Item")))
                .with_declaration(
                    MessageType::new(t("a.b.Outer"))
                        .with_nested(MessageType::new(t("a.b.Outer.Item")))
                        .with_field(Field::new("inner", 1, t("Item")))
                        .with_field(Field::new("outer", 2, t(".a.b.Item")))
                        .with_field(Field::new("qualified", 3, t("b.Item"))),
                ),
        )
        .link()
        .unwrap();
    let outer = schema.get_message(&t("a.b.Outer")).unwrap();
    assert_eq!(outer.field("inner").unwrap().type_name, t("a.b.Outer.Item"));
    assert_eq!(outer.field("outer").unwrap().type_name, t("a.b.Item"));
    assert_eq!(outer.field("qualified").unwrap().type_name, t("a.b.Item"));
}

#[test]
fn map_values_resolve() {
    let map = TypeName::map(ScalarType::String, t("Value")).unwrap();
    let schema = Linker::new()
        .add_file(
            ProtoFile::new("m.proto")
                .with_package("m")
                .with_declaration(MessageType::new(t("m.Value")))
                .with_declaration(MessageType::new(t("m.Holder")).with_field(Field::new("values", 1, map))),
        )
        .link()
        .unwrap();
    let field = schema.get_message(&t("m.Holder")).unwrap().field("values").unwrap().clone();
    assert_eq!(field.type_name.referenced_named(), Some(&t("m.Value")));
}

#[test]
fn public_imports_are_transitively_visible() {
    let schema = Linker::new()
        .add_file(ProtoFile::new("base.proto").with_package("base").with_declaration(MessageType::new(t("base.B"))))
        .add_file(ProtoFile::new("reexport.proto").with_public_import("base.proto"))
        .add_file(
            ProtoFile::new("user.proto")
                .with_package("user")
                .with_import("reexport.proto")
                .with_declaration(MessageType::new(t("user.U")).with_field(Field::new("b", 1, t("base.B")))),
        )
        .link();
    assert!(schema.is_ok());
}

#[test]
fn builtins_are_linked_automatically() {
    let schema = Linker::new().link().unwrap();
    assert!(schema.file(builtin::DESCRIPTOR_PATH).is_some());
    assert!(schema.file(builtin::EXTENSIONS_PATH).is_some());
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn every_problem_is_reported_together() {
    let messages = link_errors(vec![
        ProtoFile::new("a.proto")
            .with_package("a")
            .with_import("nowhere.proto")
            .with_declaration(
                MessageType::new(t("a.M"))
                    .with_field(Field::new("missing", 1, t("Missing")))
                    .with_field(Field::new("clash", 1, TypeName::STRING)),
            ),
    ]);
    assert_eq!(messages.len(), 3, "{messages:?}");
    assert!(messages.iter().any(|m| m.contains("imports unknown file nowhere.proto")));
    assert!(messages.iter().any(|m| m.contains("unable to resolve Missing (referenced from a.M#missing)")));
    assert!(messages.iter().any(|m| m.contains("tag 1 is used by both missing and clash")));
}

#[test]
fn invisible_types_are_rejected() {
    let messages = link_errors(vec![
        ProtoFile::new("hidden.proto").with_package("h").with_declaration(MessageType::new(t("h.Hidden"))),
        ProtoFile::new("user.proto")
            .with_package("u")
            .with_declaration(MessageType::new(t("u.U")).with_field(Field::new("h", 1, t("h.Hidden")))),
    ]);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("which user.proto does not import"));
}

#[test]
fn duplicate_types_name_both_files() {
    let messages = link_errors(vec![
        ProtoFile::new("one.proto").with_package("p").with_declaration(MessageType::new(t("p.Same"))),
        ProtoFile::new("two.proto").with_package("p").with_declaration(EnumType::new(t("p.Same")).with_constant("A", 0)),
    ]);
    assert_eq!(messages, vec!["duplicate type p.Same declared in one.proto and two.proto".to_string()]);
}

#[test]
fn proto3_rules_are_enforced() {
    let messages = link_errors(vec![
        ProtoFile::new("p3.proto")
            .with_package("p3")
            .with_syntax(Syntax::Proto3)
            .with_declaration(EnumType::new(t("p3.E")).with_constant("ONE", 1))
            .with_declaration(
                MessageType::new(t("p3.M"))
                    .with_field(Field::new("r", 1, TypeName::STRING).with_label(Label::Required)),
            ),
    ]);
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().any(|m| m.contains("must start with a zero constant")));
    assert!(messages.iter().any(|m| m.contains("required fields are not allowed in proto3")));
}

#[test]
fn map_fields_cannot_be_in_one_ofs() {
    let map = TypeName::map(ScalarType::Int32, TypeName::STRING).unwrap();
    let messages = link_errors(vec![
        ProtoFile::new("m.proto").with_package("m").with_declaration(
            MessageType::new(t("m.M")).with_one_of(OneOf::new("choice").with_field(Field::new("map", 1, map))),
        ),
    ]);
    assert!(messages[0].contains("map fields cannot be repeated or part of a one-of"));
}

#[test]
fn services_are_not_field_types_and_rpcs_need_messages() {
    let messages = link_errors(vec![
        ProtoFile::new("s.proto")
            .with_package("s")
            .with_declaration(EnumType::new(t("s.Kind")).with_constant("K", 0))
            .with_declaration(MessageType::new(t("s.M")).with_field(Field::new("api", 1, t("s.Api"))))
            .with_service(Service::new(t("s.Api")).with_rpc(Rpc::new("Get", t("s.Kind"), t("s.M")))),
    ]);
    assert_eq!(messages.len(), 2, "{messages:?}");
    assert!(messages.iter().any(|m| m.contains("s.Api is a service")));
    assert!(messages.iter().any(|m| m.contains("s.Kind is not a message")));
}

#[test]
fn extensions_must_use_declared_ranges() {
    let messages = link_errors(vec![
        ProtoFile::new("x.proto")
            .with_package("x")
            .with_declaration(MessageType::new(t("x.Base")).with_extension_range(schemata_schema::TagRange::new(100, 199)))
            .with_extend(Extend::new(t("Base")).with_field(Field::new("ok", 100, TypeName::STRING)))
            .with_extend(Extend::new(t("Base")).with_field(Field::new("bad", 200, TypeName::STRING))),
    ]);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("extension bad uses tag 200 outside the extension ranges of x.Base"));
}
