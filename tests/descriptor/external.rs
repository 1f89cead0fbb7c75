//! Descriptor output checked with an independent decoder
//!
//! `prost-types` decodes the bytes into its own `FileDescriptorProto`, so a
//! mistake shared by the crate's writer and reader still shows up here.

use prost::Message;
use prost_types::field_descriptor_proto::{Label as ProtoLabel, Type};
use prost_types::file_options::OptimizeMode;
use prost_types::{DescriptorProto, FileDescriptorProto};
use schemata_descriptor::SchemaEncoder;
use schemata_foundation::TypeName;
use schemata_schema::{
    EnumConstant, EnumType, Field, Label, Linker, MessageType, OneOf, ProtoFile, Rpc, Schema, Service, Syntax,
};

fn t(s: &str) -> TypeName {
    TypeName::parse(s).unwrap()
}

fn schema() -> Schema {
    Linker::new()
        .add_file(
            ProtoFile::new("store/catalog.proto")
                .with_package("store")
                .with_syntax(Syntax::Proto3)
                .with_import("common.proto")
                .with_public_import("shared.proto")
                .with_option("java_package", "com.example.store")
                .with_option("optimize_for", "CODE_SIZE")
                .with_declaration(
                    EnumType::new(t("store.Shelf"))
                        .with_constant("SHELF_UNKNOWN", 0)
                        .with_enum_constant(EnumConstant::new("SHELF_RETIRED", -1).with_option("deprecated", "true")),
                )
                .with_declaration(
                    MessageType::new(t("store.Product"))
                        .with_field(Field::new("sku", 1, t("common.Sku")).with_label(Label::Implicit))
                        .with_field(Field::new("stock_levels", 2, t("map<string, int64>")))
                        .with_field(Field::new("nickname", 3, TypeName::STRING))
                        .with_field(Field::new("tags", 4, TypeName::STRING).with_label(Label::Repeated))
                        .with_field(Field::new("shelf", 5, t("store.Shelf")).with_label(Label::Implicit))
                        .with_one_of(
                            OneOf::new("price")
                                .with_field(Field::new("cents", 6, TypeName::INT64).with_label(Label::OneOf))
                                .with_field(Field::new("free", 7, TypeName::BOOL).with_label(Label::OneOf)),
                        )
                        .with_nested(MessageType::new(t("store.Product.Variant"))),
                )
                .with_service(
                    Service::new(t("store.Catalog"))
                        .with_rpc(Rpc::new("Get", t("common.Sku"), t("store.Product")))
                        .with_rpc(Rpc::new("Watch", t("common.Sku"), t("store.Product")).with_streaming(false, true)),
                ),
        )
        .add_file(
            ProtoFile::new("common.proto")
                .with_package("common")
                .with_declaration(MessageType::new(t("common.Sku"))),
        )
        .add_file(ProtoFile::new("shared.proto").with_package("shared"))
        .link()
        .unwrap()
}

fn decode(schema: &Schema, path: &str) -> (Vec<u8>, FileDescriptorProto) {
    let bytes = SchemaEncoder::new(schema).encode_file(path).unwrap();
    let file = FileDescriptorProto::decode(bytes.as_slice()).unwrap();
    (bytes, file)
}

fn product(file: &FileDescriptorProto) -> &DescriptorProto {
    file.message_type.iter().find(|m| m.name() == "Product").unwrap()
}

#[test]
fn file_level_fields_decode() {
    let schema = schema();
    let (_, file) = decode(&schema, "store/catalog.proto");
    assert_eq!(file.name(), "store/catalog.proto");
    assert_eq!(file.package(), "store");
    assert_eq!(file.syntax(), "proto3");
    assert_eq!(file.dependency, vec!["common.proto", "shared.proto"]);
    assert_eq!(file.public_dependency, vec![1]);

    let options = file.options.as_ref().unwrap();
    assert_eq!(options.java_package(), "com.example.store");
    assert_eq!(options.optimize_for(), OptimizeMode::CodeSize);

    let service = &file.service[0];
    assert_eq!(service.name(), "Catalog");
    assert_eq!(service.method[0].input_type(), ".common.Sku");
    assert_eq!(service.method[0].output_type(), ".store.Product");
    assert!(!service.method[0].server_streaming());
    assert!(service.method[1].server_streaming());
    assert!(!service.method[1].client_streaming());
}

#[test]
fn fields_decode_with_types_and_labels() {
    let schema = schema();
    let (_, file) = decode(&schema, "store/catalog.proto");
    let product = product(&file);

    let summary: Vec<(&str, i32, ProtoLabel, Type)> = product
        .field
        .iter()
        .map(|f| (f.name(), f.number(), f.label(), f.r#type()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("sku", 1, ProtoLabel::Optional, Type::Message),
            ("stock_levels", 2, ProtoLabel::Repeated, Type::Message),
            ("nickname", 3, ProtoLabel::Optional, Type::String),
            ("tags", 4, ProtoLabel::Repeated, Type::String),
            ("shelf", 5, ProtoLabel::Optional, Type::Enum),
            ("cents", 6, ProtoLabel::Optional, Type::Int64),
            ("free", 7, ProtoLabel::Optional, Type::Bool),
        ]
    );
    assert_eq!(product.field[0].type_name(), ".common.Sku");
    assert_eq!(product.field[1].json_name(), "stockLevels");
    assert_eq!(product.field[4].type_name(), ".store.Shelf");
}

#[test]
fn map_entries_and_nested_types_decode() {
    let schema = schema();
    let (_, file) = decode(&schema, "store/catalog.proto");
    let product = product(&file);

    let nested: Vec<&str> = product.nested_type.iter().map(DescriptorProto::name).collect();
    assert_eq!(nested, vec!["Variant", "StockLevelsEntry"]);
    assert_eq!(product.field[1].type_name(), ".store.Product.StockLevelsEntry");

    let entry = &product.nested_type[1];
    assert_eq!(entry.options.as_ref().and_then(|o| o.map_entry), Some(true));
    assert_eq!(entry.field[0].name(), "key");
    assert_eq!(entry.field[0].r#type(), Type::String);
    assert_eq!(entry.field[1].name(), "value");
    assert_eq!(entry.field[1].number(), 2);
    assert_eq!(entry.field[1].r#type(), Type::Int64);
    assert!(product.nested_type[0].options.is_none());
}

#[test]
fn one_ofs_and_proto3_optional_decode() {
    let schema = schema();
    let (_, file) = decode(&schema, "store/catalog.proto");
    let product = product(&file);

    let one_ofs: Vec<&str> = product.oneof_decl.iter().map(|o| o.name()).collect();
    assert_eq!(one_ofs, vec!["price", "_nickname"]);

    let by_name = |name: &str| product.field.iter().find(|f| f.name() == name).unwrap();
    assert_eq!(by_name("nickname").proto3_optional, Some(true));
    assert_eq!(by_name("nickname").oneof_index, Some(1));
    assert_eq!(by_name("cents").oneof_index, Some(0));
    assert_eq!(by_name("free").oneof_index, Some(0));
    assert_eq!(by_name("cents").proto3_optional, None);
    assert_eq!(by_name("stock_levels").oneof_index, None);
    assert_eq!(by_name("tags").oneof_index, None);
}

#[test]
fn enums_decode_with_negative_numbers_and_options() {
    let schema = schema();
    let (_, file) = decode(&schema, "store/catalog.proto");
    let shelf = &file.enum_type[0];
    assert_eq!(shelf.name(), "Shelf");
    let values: Vec<(&str, i32)> = shelf.value.iter().map(|v| (v.name(), v.number())).collect();
    assert_eq!(values, vec![("SHELF_UNKNOWN", 0), ("SHELF_RETIRED", -1)]);
    assert_eq!(shelf.value[1].options.as_ref().and_then(|o| o.deprecated), Some(true));
}

#[test]
fn reencoding_reproduces_the_same_bytes() {
    let schema = schema();
    for path in ["store/catalog.proto", "common.proto", "shared.proto"] {
        let (bytes, file) = decode(&schema, path);
        assert_eq!(file.encode_to_vec(), bytes, "{path}");
    }
}
