//! Integration tests for file-level descriptor output

use schemata_descriptor::{SchemaEncoder, tags};
use schemata_foundation::{ErrorKind, TypeName};
use schemata_schema::{
    EnumType, Field, Label, Linker, MessageType, ProtoFile, Rpc, Schema, Service, Syntax, builtin,
};

use crate::decode::{messages, named, strings, tags as field_tags, varints};

fn t(s: &str) -> TypeName {
    TypeName::parse(s).unwrap()
}

fn schema() -> Schema {
    Linker::new()
        .add_file(
            ProtoFile::new("api/user.proto")
                .with_package("api")
                .with_syntax(Syntax::Proto3)
                .with_import("common.proto")
                .with_public_import("shared.proto")
                .with_option("java_package", "com.example.api")
                .with_option("optimize_for", "CODE_SIZE")
                .with_declaration(EnumType::new(t("api.Role")).with_constant("ROLE_UNKNOWN", 0))
                .with_declaration(
                    MessageType::new(t("api.User"))
                        .with_field(Field::new("id", 1, t("common.Id")).with_label(Label::Implicit))
                        .with_field(Field::new("role", 2, t("api.Role")).with_label(Label::Implicit)),
                )
                .with_service(
                    Service::new(t("api.Users"))
                        .with_rpc(Rpc::new("Get", t("common.Id"), t("api.User")))
                        .with_rpc(Rpc::new("Watch", t("common.Id"), t("api.User")).with_streaming(false, true)),
                ),
        )
        .add_file(
            ProtoFile::new("common.proto")
                .with_package("common")
                .with_declaration(MessageType::new(t("common.Id"))),
        )
        .add_file(
            ProtoFile::new("shared.proto")
                .with_package("shared")
                .with_declaration(MessageType::new(t("shared.Unused"))),
        )
        .link()
        .unwrap()
}

#[test]
fn file_fields_are_written_in_tag_order() {
    let schema = schema();
    let bytes = SchemaEncoder::new(&schema).encode_file("api/user.proto").unwrap();
    let order = field_tags(&bytes);
    let mut sorted = order.clone();
    sorted.sort_unstable();
    assert_eq!(order, sorted);

    use tags::file;
    assert_eq!(strings(&bytes, file::NAME), vec!["api/user.proto"]);
    assert_eq!(strings(&bytes, file::PACKAGE), vec!["api"]);
    assert_eq!(strings(&bytes, file::DEPENDENCY), vec!["common.proto", "shared.proto"]);
    assert_eq!(varints(&bytes, file::PUBLIC_DEPENDENCY), vec![1]);
    assert_eq!(strings(&bytes, file::SYNTAX), vec!["proto3"]);
    assert_eq!(messages(&bytes, file::MESSAGE_TYPE).len(), 1);
    assert_eq!(messages(&bytes, file::ENUM_TYPE).len(), 1);
}

#[test]
fn file_options_are_typed() {
    let schema = schema();
    let bytes = SchemaEncoder::new(&schema).encode_file("api/user.proto").unwrap();
    let options = messages(&bytes, tags::file::OPTIONS);
    assert_eq!(options.len(), 1);
    assert_eq!(strings(options[0], 1), vec!["com.example.api"]);
    assert_eq!(varints(options[0], 9), vec![2]);
}

#[test]
fn field_types_distinguish_enums_and_messages() {
    let schema = schema();
    let bytes = SchemaEncoder::new(&schema).encode_file("api/user.proto").unwrap();
    let user = named(&bytes, tags::file::MESSAGE_TYPE, "User");

    let id = named(user, tags::message::FIELD, "id");
    assert_eq!(varints(id, tags::field::TYPE), vec![tags::field::kind::MESSAGE]);
    assert_eq!(strings(id, tags::field::TYPE_NAME), vec![".common.Id"]);
    assert!(varints(id, tags::field::ONEOF_INDEX).is_empty());

    let role = named(user, tags::message::FIELD, "role");
    assert_eq!(varints(role, tags::field::TYPE), vec![tags::field::kind::ENUM]);
    assert_eq!(strings(role, tags::field::TYPE_NAME), vec![".api.Role"]);
}

#[test]
fn services_list_methods_with_streaming_flags() {
    let schema = schema();
    let bytes = SchemaEncoder::new(&schema).encode_file("api/user.proto").unwrap();
    let service = named(&bytes, tags::file::SERVICE, "Users");
    let get = named(service, tags::service::METHOD, "Get");
    assert_eq!(strings(get, tags::method::INPUT_TYPE), vec![".common.Id"]);
    assert_eq!(strings(get, tags::method::OUTPUT_TYPE), vec![".api.User"]);
    assert!(varints(get, tags::method::SERVER_STREAMING).is_empty());

    let watch = named(service, tags::service::METHOD, "Watch");
    assert_eq!(varints(watch, tags::method::SERVER_STREAMING), vec![1]);
}

#[test]
fn every_file_is_encoded() {
    let schema = schema();
    let encoded = SchemaEncoder::new(&schema).encode_all().unwrap();
    assert_eq!(encoded.len(), schema.file_count());
    assert!(encoded.contains_key(builtin::DESCRIPTOR_PATH));
    assert!(encoded.contains_key("shared.proto"));
}

#[test]
fn missing_files_are_errors() {
    let schema = schema();
    let err = SchemaEncoder::new(&schema).encode_file("nope.proto").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedType { .. }));
}
