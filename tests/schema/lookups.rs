//! Integration tests for Schema lookups

use schemata_foundation::TypeName;
use schemata_schema::{
    EnumType, Extend, Field, Linker, MessageType, OptionsKind, ProtoFile, Rpc, Schema, Service,
};

fn t(s: &str) -> TypeName {
    TypeName::parse(s).unwrap()
}

fn schema() -> Schema {
    Linker::new()
        .add_file(
            ProtoFile::new("shop/order.proto")
                .with_package("shop")
                .with_import("common/money.proto")
                .with_declaration(
                    MessageType::new(t("shop.Order"))
                        .with_nested(EnumType::new(t("shop.Order.Status")).with_constant("OPEN", 0))
                        .with_field(Field::new("total", 1, t("common.Money")))
                        .with_field(Field::new("status", 2, t("Status"))),
                )
                .with_service(Service::new(t("shop.Orders")).with_rpc(Rpc::new("Get", t("Order"), t("Order")))),
        )
        .add_file(
            ProtoFile::new("common/money.proto")
                .with_package("common")
                .with_import("google/protobuf/descriptor.proto")
                .with_declaration(MessageType::new(t("common.Money")))
                .with_extend(
                    Extend::new(t("google.protobuf.FieldOptions"))
                        .with_field(Field::new("currency", 60_000, TypeName::STRING)),
                ),
        )
        .link()
        .unwrap()
}

#[test]
fn types_map_to_files_and_packages() {
    let schema = schema();
    assert_eq!(schema.path_of(&t("shop.Order.Status")), Some("shop/order.proto"));
    assert_eq!(schema.package_of(&t("common.Money")), Some("common"));
    assert!(schema.get_enum(&t("shop.Order.Status")).is_some());
    assert!(schema.get_message(&t("shop.Order.Status")).is_none());
    assert!(schema.get_service(&t("shop.Orders")).is_some());
    assert!(schema.contains_type(&t("shop.Orders")));
    assert!(!schema.contains_type(&t("shop.Nope")));
}

#[test]
fn options_resolve_to_standard_fields_and_extensions() {
    let schema = schema();
    let field_options = OptionsKind::Field.type_name();

    let deprecated = schema.resolve_option(&field_options, "deprecated").unwrap();
    assert_eq!(deprecated.field().tag, 3);
    assert!(deprecated.extension_path().is_none());

    let currency = schema.resolve_option(&field_options, "(common.currency)").unwrap();
    assert_eq!(currency.extension_path(), Some("common/money.proto"));
    assert_eq!(currency.member_name().to_string(), "google.protobuf.FieldOptions#common.currency");

    assert!(schema.resolve_option(&field_options, "common.nothing").is_none());
}

#[test]
fn extensions_are_listed_by_extendee() {
    let schema = schema();
    let names: Vec<String> = schema
        .extensions_of(&OptionsKind::Field.type_name())
        .into_iter()
        .map(|ext| ext.qualified_name)
        .collect();
    assert!(names.contains(&"common.currency".to_string()));
    assert!(names.contains(&"schemata.since".to_string()));
}

#[test]
fn file_dependencies_follow_references() {
    let schema = schema();
    let order = schema.file("shop/order.proto").unwrap();
    let dependencies: Vec<String> = schema.file_dependencies(order).into_iter().collect();
    assert_eq!(dependencies, vec!["common/money.proto".to_string()]);
}

#[test]
fn visible_paths_include_self_and_imports() {
    let schema = schema();
    let visible = schema.visible_paths("shop/order.proto");
    assert!(visible.contains("shop/order.proto"));
    assert!(visible.contains("common/money.proto"));
    assert!(!visible.contains("google/protobuf/descriptor.proto"));
}
