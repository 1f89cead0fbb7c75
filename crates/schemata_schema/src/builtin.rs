//! Built-in files every schema links against.
//!
//! `google/protobuf/descriptor.proto` declares the options messages whose
//! fields give option keys their types. `schemata/extensions.proto` declares
//! the version metadata options consulted by version gating.

use schemata_foundation::TypeName;

use crate::declaration::{EnumType, Field, MessageType, TagRange};
use crate::file::{Extend, ProtoFile};
use crate::options::{
    CONSTANT_SINCE, CONSTANT_UNTIL, FIELD_SINCE, FIELD_UNTIL, MESSAGE_SINCE, MESSAGE_UNTIL,
};

/// Path of the built-in descriptor options file.
pub const DESCRIPTOR_PATH: &str = "google/protobuf/descriptor.proto";

/// Path of the built-in version metadata options file.
pub const EXTENSIONS_PATH: &str = "schemata/extensions.proto";

/// Returns every built-in file.
#[must_use]
pub fn files() -> Vec<ProtoFile> {
    vec![descriptor_file(), extensions_file()]
}

/// Returns true if the path names a built-in file.
#[must_use]
pub fn is_builtin(path: &str) -> bool {
    path == DESCRIPTOR_PATH || path == EXTENSIONS_PATH
}

fn t(name: &str) -> TypeName {
    TypeName::Named(name.into())
}

fn options_message(name: &str, fields: &[(&str, u32, TypeName)]) -> MessageType {
    fields.iter().fold(
        MessageType::new(t(name)).with_extension_range(TagRange::new(1000, TagRange::MAX_TAG)),
        |message, (field, tag, type_name)| message.with_field(Field::new(*field, *tag, type_name.clone())),
    )
}

/// Builds the subset of `google/protobuf/descriptor.proto` that defines options.
#[must_use]
pub fn descriptor_file() -> ProtoFile {
    let optimize_mode = EnumType::new(t("google.protobuf.FileOptions.OptimizeMode"))
        .with_constant("SPEED", 1)
        .with_constant("CODE_SIZE", 2)
        .with_constant("LITE_RUNTIME", 3);
    let file_options = options_message(
        "google.protobuf.FileOptions",
        &[
            ("java_package", 1, TypeName::STRING),
            ("java_outer_classname", 8, TypeName::STRING),
            ("optimize_for", 9, t("google.protobuf.FileOptions.OptimizeMode")),
            ("java_multiple_files", 10, TypeName::BOOL),
            ("go_package", 11, TypeName::STRING),
            ("cc_generic_services", 16, TypeName::BOOL),
            ("java_generic_services", 17, TypeName::BOOL),
            ("py_generic_services", 18, TypeName::BOOL),
            ("deprecated", 23, TypeName::BOOL),
            ("java_string_check_utf8", 27, TypeName::BOOL),
            ("cc_enable_arenas", 31, TypeName::BOOL),
            ("objc_class_prefix", 36, TypeName::STRING),
            ("csharp_namespace", 37, TypeName::STRING),
            ("swift_prefix", 39, TypeName::STRING),
            ("php_class_prefix", 40, TypeName::STRING),
            ("php_namespace", 41, TypeName::STRING),
            ("php_metadata_namespace", 44, TypeName::STRING),
            ("ruby_package", 45, TypeName::STRING),
        ],
    )
    .with_nested(optimize_mode);

    let message_options = options_message(
        "google.protobuf.MessageOptions",
        &[
            ("message_set_wire_format", 1, TypeName::BOOL),
            ("no_standard_descriptor_accessor", 2, TypeName::BOOL),
            ("deprecated", 3, TypeName::BOOL),
            ("map_entry", 7, TypeName::BOOL),
        ],
    );

    let c_type = EnumType::new(t("google.protobuf.FieldOptions.CType"))
        .with_constant("STRING", 0)
        .with_constant("CORD", 1)
        .with_constant("STRING_PIECE", 2);
    let js_type = EnumType::new(t("google.protobuf.FieldOptions.JSType"))
        .with_constant("JS_NORMAL", 0)
        .with_constant("JS_STRING", 1)
        .with_constant("JS_NUMBER", 2);
    let field_options = options_message(
        "google.protobuf.FieldOptions",
        &[
            ("ctype", 1, t("google.protobuf.FieldOptions.CType")),
            ("packed", 2, TypeName::BOOL),
            ("deprecated", 3, TypeName::BOOL),
            ("lazy", 5, TypeName::BOOL),
            ("jstype", 6, t("google.protobuf.FieldOptions.JSType")),
            ("weak", 10, TypeName::BOOL),
            ("unverified_lazy", 15, TypeName::BOOL),
            ("debug_redact", 16, TypeName::BOOL),
        ],
    )
    .with_nested(c_type)
    .with_nested(js_type);

    let oneof_options = options_message("google.protobuf.OneofOptions", &[]);

    let enum_options = options_message(
        "google.protobuf.EnumOptions",
        &[("allow_alias", 2, TypeName::BOOL), ("deprecated", 3, TypeName::BOOL)],
    );

    let enum_value_options = options_message(
        "google.protobuf.EnumValueOptions",
        &[("deprecated", 1, TypeName::BOOL), ("debug_redact", 3, TypeName::BOOL)],
    );

    let service_options =
        options_message("google.protobuf.ServiceOptions", &[("deprecated", 33, TypeName::BOOL)]);

    let idempotency = EnumType::new(t("google.protobuf.MethodOptions.IdempotencyLevel"))
        .with_constant("IDEMPOTENCY_UNKNOWN", 0)
        .with_constant("NO_SIDE_EFFECTS", 1)
        .with_constant("IDEMPOTENT", 2);
    let method_options = options_message(
        "google.protobuf.MethodOptions",
        &[
            ("deprecated", 33, TypeName::BOOL),
            ("idempotency_level", 34, t("google.protobuf.MethodOptions.IdempotencyLevel")),
        ],
    )
    .with_nested(idempotency);

    ProtoFile::new(DESCRIPTOR_PATH)
        .with_package("google.protobuf")
        .with_option("java_package", "com.google.protobuf")
        .with_option("optimize_for", "SPEED")
        .with_declaration(file_options)
        .with_declaration(message_options)
        .with_declaration(field_options)
        .with_declaration(oneof_options)
        .with_declaration(enum_options)
        .with_declaration(enum_value_options)
        .with_declaration(service_options)
        .with_declaration(method_options)
}

fn version_pair(extendee: &str, since: &str, until: &str) -> Extend {
    let simple = |key: &str| key.rsplit('.').next().unwrap_or(key).to_string();
    Extend::new(t(extendee))
        .with_field(Field::new(simple(since), 1076, TypeName::STRING))
        .with_field(Field::new(simple(until), 1077, TypeName::STRING))
}

/// Builds `schemata/extensions.proto`, declaring the version metadata options.
#[must_use]
pub fn extensions_file() -> ProtoFile {
    ProtoFile::new(EXTENSIONS_PATH)
        .with_package("schemata")
        .with_import(DESCRIPTOR_PATH)
        .with_extend(version_pair("google.protobuf.FieldOptions", FIELD_SINCE, FIELD_UNTIL))
        .with_extend(version_pair(
            "google.protobuf.EnumValueOptions",
            CONSTANT_SINCE,
            CONSTANT_UNTIL,
        ))
        .with_extend(version_pair(
            "google.protobuf.MessageOptions",
            MESSAGE_SINCE,
            MESSAGE_UNTIL,
        ))
}
