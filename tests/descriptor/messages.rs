//! Integration tests for message-level descriptor output

use schemata_descriptor::{SchemaEncoder, tags};
use schemata_foundation::TypeName;
use schemata_schema::{Field, Label, Linker, MessageType, OneOf, ProtoFile, Schema, Syntax};

use crate::decode::{messages, named, strings, varints};

fn t(s: &str) -> TypeName {
    TypeName::parse(s).unwrap()
}

fn encode_message(file: ProtoFile, name: &str) -> Vec<u8> {
    let path = file.path.clone();
    let schema: Schema = Linker::new().add_file(file).link().unwrap();
    let bytes = SchemaEncoder::new(&schema).encode_file(&path).unwrap();
    named(&bytes, tags::file::MESSAGE_TYPE, name).to_vec()
}

#[test]
fn maps_get_synthesized_entries() {
    let file = ProtoFile::new("m.proto").with_package("m").with_syntax(Syntax::Proto3).with_declaration(
        MessageType::new(t("m.Inventory"))
            .with_field(Field::new("stock_levels", 1, t("map<string, int64>")))
            .with_nested(MessageType::new(t("m.Inventory.Item"))),
    );
    let inventory = encode_message(file, "Inventory");

    let field = named(&inventory, tags::message::FIELD, "stock_levels");
    assert_eq!(varints(field, tags::field::LABEL), vec![tags::field::label::REPEATED]);
    assert_eq!(strings(field, tags::field::TYPE_NAME), vec![".m.Inventory.StockLevelsEntry"]);
    assert_eq!(strings(field, tags::field::JSON_NAME), vec!["stockLevels"]);
    assert!(varints(field, tags::field::PROTO3_OPTIONAL).is_empty());

    let nested: Vec<&str> = messages(&inventory, tags::message::NESTED_TYPE)
        .into_iter()
        .flat_map(|m| strings(m, tags::message::NAME))
        .collect();
    assert_eq!(nested, vec!["Item", "StockLevelsEntry"]);

    let entry = named(&inventory, tags::message::NESTED_TYPE, "StockLevelsEntry");
    let key = named(entry, tags::message::FIELD, "key");
    assert_eq!(varints(key, tags::field::TYPE), vec![tags::field::kind::STRING]);
    let value = named(entry, tags::message::FIELD, "value");
    assert_eq!(varints(value, tags::field::TYPE), vec![tags::field::kind::INT64]);
    let options = messages(entry, tags::message::OPTIONS);
    assert_eq!(varints(options[0], tags::MAP_ENTRY_OPTION), vec![1]);
    assert!(messages(&inventory, tags::message::ONEOF_DECL).is_empty());
}

#[test]
fn proto3_optional_fields_follow_declared_one_ofs() {
    let file = ProtoFile::new("p.proto").with_package("p").with_syntax(Syntax::Proto3).with_declaration(
        MessageType::new(t("p.Profile"))
            .with_field(Field::new("name", 1, TypeName::STRING).with_label(Label::Implicit))
            .with_field(Field::new("nickname", 2, TypeName::STRING))
            .with_one_of(
                OneOf::new("contact")
                    .with_field(Field::new("email", 3, TypeName::STRING).with_label(Label::OneOf)),
            ),
    );
    let profile = encode_message(file, "Profile");

    let field_names: Vec<&str> = messages(&profile, tags::message::FIELD)
        .into_iter()
        .flat_map(|f| strings(f, tags::field::NAME))
        .collect();
    assert_eq!(field_names, vec!["name", "nickname", "email"]);

    let nickname = named(&profile, tags::message::FIELD, "nickname");
    assert_eq!(varints(nickname, tags::field::ONEOF_INDEX), vec![1]);
    assert_eq!(varints(nickname, tags::field::PROTO3_OPTIONAL), vec![1]);
    let email = named(&profile, tags::message::FIELD, "email");
    assert_eq!(varints(email, tags::field::ONEOF_INDEX), vec![0]);

    let one_ofs: Vec<&str> = messages(&profile, tags::message::ONEOF_DECL)
        .into_iter()
        .flat_map(|o| strings(o, tags::oneof::NAME))
        .collect();
    assert_eq!(one_ofs, vec!["contact", "_nickname"]);
}

#[test]
fn proto2_optional_fields_are_plain() {
    let file = ProtoFile::new("q.proto").with_package("q").with_declaration(
        MessageType::new(t("q.Legacy")).with_field(Field::new("value", 1, TypeName::INT32).with_default("7")),
    );
    let legacy = encode_message(file, "Legacy");
    let value = named(&legacy, tags::message::FIELD, "value");
    assert_eq!(varints(value, tags::field::LABEL), vec![tags::field::label::OPTIONAL]);
    assert_eq!(strings(value, tags::field::DEFAULT_VALUE), vec!["7"]);
    assert!(messages(&legacy, tags::message::ONEOF_DECL).is_empty());
}
