//! Serializing linked files as `FileDescriptorProto` messages.
//!
//! Output follows `google/protobuf/descriptor.proto` field numbering, with
//! fields of each message written in ascending tag order. Two kinds of
//! declarations are synthesized:
//!
//! - a map field becomes a repeated reference to a nested `<Name>Entry`
//!   message with `key` (1) and `value` (2) fields and `map_entry` set;
//! - a proto3 `optional` field is placed in its own one-of named `_<name>`,
//!   appended after the declared one-ofs, with `proto3_optional` set.
//!
//! Within a message, regular fields are written in declaration order,
//! followed by the members of each one-of in one-of order. Field numbers and
//! `oneof_index` values are unaffected by this ordering.
//!
//! Option values that fail to encode do not stop the walk: every failure in
//! a file is collected and reported as one aggregated error.

use std::cell::RefCell;
use std::collections::BTreeMap;

use schemata_foundation::{Error, ErrorContext, Result, ScalarType, TypeName};
use schemata_schema::{
    Declaration, EnumType, Field, Label, MessageType, Options, OptionsKind, ProtoFile, Reserved,
    Rpc, Schema, Service, Syntax, TagRange,
};
use tracing::debug;

use crate::options::encode_options;
use crate::tags;
use crate::writer::ProtoWriter;

// =============================================================================
// Naming
// =============================================================================

/// Returns the default JSON name of a field: underscores removed and the
/// following letter upper-cased.
#[must_use]
pub fn json_name(field_name: &str) -> String {
    camel(field_name, false)
}

/// Returns the name of the synthetic entry message for a map field.
#[must_use]
pub fn map_entry_name(field_name: &str) -> String {
    let mut name = camel(field_name, true);
    name.push_str("Entry");
    name
}

fn camel(name: &str, capitalize_first: bool) -> String {
    let mut out = String::with_capacity(name.len());
    let mut capitalize = capitalize_first;
    for c in name.chars() {
        if c == '_' {
            capitalize = true;
        } else if capitalize {
            out.extend(c.to_uppercase());
            capitalize = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn absolute(name: &TypeName) -> String {
    format!(".{name}")
}

fn scalar_kind(scalar: ScalarType) -> u64 {
    use tags::field::kind;
    match scalar {
        ScalarType::Bool => kind::BOOL,
        ScalarType::Bytes => kind::BYTES,
        ScalarType::Double => kind::DOUBLE,
        ScalarType::Float => kind::FLOAT,
        ScalarType::Fixed32 => kind::FIXED32,
        ScalarType::Fixed64 => kind::FIXED64,
        ScalarType::Int32 => kind::INT32,
        ScalarType::Int64 => kind::INT64,
        ScalarType::Sfixed32 => kind::SFIXED32,
        ScalarType::Sfixed64 => kind::SFIXED64,
        ScalarType::Sint32 => kind::SINT32,
        ScalarType::Sint64 => kind::SINT64,
        ScalarType::String => kind::STRING,
        ScalarType::Uint32 => kind::UINT32,
        ScalarType::Uint64 => kind::UINT64,
    }
}

// =============================================================================
// SchemaEncoder
// =============================================================================

/// Encodes files of a linked schema as descriptor bytes.
#[derive(Debug, Clone, Copy)]
pub struct SchemaEncoder<'a> {
    schema: &'a Schema,
}

impl<'a> SchemaEncoder<'a> {
    /// Creates an encoder over `schema`.
    #[must_use]
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Encodes the file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if no such file exists or an option cannot be encoded.
    pub fn encode_file(&self, path: &str) -> Result<Vec<u8>> {
        let file = self
            .schema
            .file(path)
            .ok_or_else(|| Error::unresolved_type(path, "descriptor encoding"))?;
        self.encode(file)
    }

    /// Encodes one file.
    ///
    /// # Errors
    ///
    /// Fails if an option key is unknown or a value does not fit its field.
    /// The error aggregates every such problem in the file.
    pub fn encode(&self, file: &ProtoFile) -> Result<Vec<u8>> {
        let encoder = FileEncoder {
            schema: self.schema,
            file,
            errors: RefCell::new(Vec::new()),
        };
        let out = encoder.file();
        Error::aggregate("encode", encoder.errors.into_inner())?;
        let bytes = out.into_bytes();
        debug!(path = %file.path, bytes = bytes.len(), "encoded descriptor");
        Ok(bytes)
    }

    /// Encodes every file, keyed by path.
    ///
    /// # Errors
    ///
    /// Returns one aggregated error listing every problem, each prefixed
    /// with the path of its file.
    pub fn encode_all(&self) -> Result<BTreeMap<String, Vec<u8>>> {
        let mut encoded = BTreeMap::new();
        let mut errors = Vec::new();
        for file in self.schema.files() {
            match self.encode(file) {
                Ok(bytes) => {
                    encoded.insert(file.path.clone(), bytes);
                }
                Err(e) => errors.extend(e.messages().into_iter().map(|m| format!("{}: {m}", file.path))),
            }
        }
        Error::aggregate("encode", errors)?;
        Ok(encoded)
    }
}

// =============================================================================
// FileEncoder
// =============================================================================

struct FileEncoder<'a> {
    schema: &'a Schema,
    file: &'a ProtoFile,
    /// Option failures seen so far, one message per failing key.
    errors: RefCell<Vec<String>>,
}

impl FileEncoder<'_> {
    fn file(&self) -> ProtoWriter {
        use tags::file as tag;

        let file = self.file;
        let mut out = ProtoWriter::new();
        out.string(tag::NAME, &file.path);
        if let Some(package) = &file.package {
            out.string(tag::PACKAGE, package);
        }
        for import in file.all_imports() {
            out.string(tag::DEPENDENCY, import);
        }
        for declaration in file.declarations.iter().filter(|d| d.as_enum().is_none()) {
            out.message(tag::MESSAGE_TYPE, &self.message_declaration(declaration));
        }
        for enum_type in file.declarations.iter().filter_map(Declaration::as_enum) {
            out.message(tag::ENUM_TYPE, &self.enum_type(enum_type));
        }
        for service in &file.services {
            out.message(tag::SERVICE, &self.service(service));
        }
        for extend in &file.extends {
            for field in &extend.fields {
                let owner = file.extension_name(field);
                out.message(tag::EXTENSION, &self.field(field, Some(&extend.extendee), None, &owner));
            }
        }
        self.write_options(&mut out, tag::OPTIONS, OptionsKind::File, &file.options, &file.path);
        for index in file.imports.len()..file.imports.len() + file.public_imports.len() {
            out.uint64(tag::PUBLIC_DEPENDENCY, index as u64);
        }
        if file.syntax == Syntax::Proto3 {
            out.string(tag::SYNTAX, "proto3");
        }
        out
    }

    /// Writes `options` under `tag`, recording a failure against `owner`
    /// instead of returning it.
    fn write_options(&self, out: &mut ProtoWriter, tag: u32, kind: OptionsKind, options: &Options, owner: &str) {
        if options.is_empty() {
            return;
        }
        match encode_options(self.schema, &kind.type_name(), options) {
            Ok(encoded) => out.message(tag, &encoded),
            Err(e) => {
                let context = ErrorContext::new().with_file(&self.file.path).with_frame(owner);
                debug!(error = %e, %context, "option encoding failed");
                let mut errors = self.errors.borrow_mut();
                errors.extend(e.messages().into_iter().map(|m| format!("{m} in {owner}")));
            }
        }
    }

    fn message_declaration(&self, declaration: &Declaration) -> ProtoWriter {
        match declaration {
            Declaration::Message(message) => self.message(message),
            Declaration::Enum(enum_type) => self.enum_type(enum_type),
            Declaration::Enclosing(enclosing) => {
                let mut out = ProtoWriter::new();
                out.string(tags::message::NAME, enclosing.name.simple_name());
                self.nested(&mut out, &enclosing.nested, &[]);
                out
            }
        }
    }

    /// Writes nested messages (declared, then map entries) and nested enums.
    fn nested(&self, out: &mut ProtoWriter, nested: &[Declaration], map_entries: &[ProtoWriter]) {
        use tags::message as tag;
        for declaration in nested.iter().filter(|d| d.as_enum().is_none()) {
            out.message(tag::NESTED_TYPE, &self.message_declaration(declaration));
        }
        for entry in map_entries {
            out.message(tag::NESTED_TYPE, entry);
        }
        for enum_type in nested.iter().filter_map(Declaration::as_enum) {
            out.message(tag::ENUM_TYPE, &self.enum_type(enum_type));
        }
    }

    fn message(&self, message: &MessageType) -> ProtoWriter {
        use tags::message as tag;

        let owner = message.name.to_string();
        let declared_one_ofs = message.one_ofs.len();
        let synthetic: Vec<&Field> = if self.file.syntax == Syntax::Proto3 {
            message.fields.iter().filter(|f| f.label == Label::Optional && !f.is_map()).collect()
        } else {
            Vec::new()
        };

        let mut out = ProtoWriter::new();
        out.string(tag::NAME, message.name.simple_name());

        let mut map_entries = Vec::new();
        for field in &message.fields {
            let one_of = synthetic
                .iter()
                .position(|s| std::ptr::eq(*s, field))
                .map(|i| declared_one_ofs + i);
            let mut encoded = self.field(field, None, one_of, &owner);
            if one_of.is_some() {
                encoded.bool(tags::field::PROTO3_OPTIONAL, true);
            }
            out.message(tag::FIELD, &encoded);
            if let TypeName::Map { key, value } = &field.type_name {
                map_entries.push(self.map_entry(&field.name, *key, value));
            }
        }
        for (index, one_of) in message.one_ofs.iter().enumerate() {
            for field in &one_of.fields {
                out.message(tag::FIELD, &self.field(field, None, Some(index), &owner));
            }
        }

        self.nested(&mut out, &message.nested, &map_entries);

        for range in &message.extension_ranges {
            out.message(tag::EXTENSION_RANGE, &range_message(*range, 1));
        }
        self.write_options(&mut out, tag::OPTIONS, OptionsKind::Message, &message.options, &owner);
        for one_of in &message.one_ofs {
            let mut encoded = ProtoWriter::new();
            encoded.string(tags::oneof::NAME, &one_of.name);
            self.write_options(&mut encoded, tags::oneof::OPTIONS, OptionsKind::OneOf, &one_of.options, &owner);
            out.message(tag::ONEOF_DECL, &encoded);
        }
        for field in &synthetic {
            let mut encoded = ProtoWriter::new();
            encoded.string(tags::oneof::NAME, &format!("_{}", field.name));
            out.message(tag::ONEOF_DECL, &encoded);
        }
        write_reserved(&mut out, &message.reserved, tag::RESERVED_RANGE, tag::RESERVED_NAME, 1);
        out
    }

    /// Encodes a field. `owner` names the message, or the qualified
    /// extension name when `extendee` is set.
    fn field(
        &self,
        field: &Field,
        extendee: Option<&TypeName>,
        one_of: Option<usize>,
        owner: &str,
    ) -> ProtoWriter {
        use tags::field as tag;
        use tags::field::label;

        let mut out = ProtoWriter::new();
        out.string(tag::NAME, &field.name);
        if let Some(extendee) = extendee {
            out.string(tag::EXTENDEE, &absolute(extendee));
        }
        out.uint64(tag::NUMBER, u64::from(field.tag));
        let field_label = match field.label {
            _ if field.is_map() => label::REPEATED,
            Label::Optional | Label::OneOf | Label::Implicit => label::OPTIONAL,
            Label::Required => label::REQUIRED,
            Label::Repeated => label::REPEATED,
        };
        out.uint64(tag::LABEL, field_label);
        match &field.type_name {
            TypeName::Scalar(scalar) => out.uint64(tag::TYPE, scalar_kind(*scalar)),
            TypeName::Named(_) => {
                out.uint64(tag::TYPE, self.named_kind(&field.type_name));
                out.string(tag::TYPE_NAME, &absolute(&field.type_name));
            }
            TypeName::Map { .. } => {
                out.uint64(tag::TYPE, tags::field::kind::MESSAGE);
                out.string(tag::TYPE_NAME, &format!(".{owner}.{}", map_entry_name(&field.name)));
            }
        }
        if let Some(default) = &field.default {
            out.string(tag::DEFAULT_VALUE, default);
        }
        let frame = match extendee {
            Some(_) => owner.to_string(),
            None => format!("{owner}.{}", field.name),
        };
        self.write_options(&mut out, tag::OPTIONS, OptionsKind::Field, &field.options, &frame);
        if let Some(index) = one_of {
            out.uint64(tag::ONEOF_INDEX, index as u64);
        }
        let json = field.json_name.clone().unwrap_or_else(|| json_name(&field.name));
        out.string(tag::JSON_NAME, &json);
        out
    }

    fn named_kind(&self, type_name: &TypeName) -> u64 {
        if self.schema.get_enum(type_name).is_some() {
            tags::field::kind::ENUM
        } else {
            tags::field::kind::MESSAGE
        }
    }

    fn map_entry(&self, field_name: &str, key: ScalarType, value: &TypeName) -> ProtoWriter {
        use tags::field as tag;

        let mut out = ProtoWriter::new();
        out.string(tags::message::NAME, &map_entry_name(field_name));

        let mut key_field = ProtoWriter::new();
        key_field.string(tag::NAME, "key");
        key_field.uint64(tag::NUMBER, 1);
        key_field.uint64(tag::LABEL, tag::label::OPTIONAL);
        key_field.uint64(tag::TYPE, scalar_kind(key));
        key_field.string(tag::JSON_NAME, "key");
        out.message(tags::message::FIELD, &key_field);

        let mut value_field = ProtoWriter::new();
        value_field.string(tag::NAME, "value");
        value_field.uint64(tag::NUMBER, 2);
        value_field.uint64(tag::LABEL, tag::label::OPTIONAL);
        match value {
            TypeName::Scalar(scalar) => value_field.uint64(tag::TYPE, scalar_kind(*scalar)),
            _ => {
                value_field.uint64(tag::TYPE, self.named_kind(value));
                value_field.string(tag::TYPE_NAME, &absolute(value));
            }
        }
        value_field.string(tag::JSON_NAME, "value");
        out.message(tags::message::FIELD, &value_field);

        let mut options = ProtoWriter::new();
        options.bool(tags::MAP_ENTRY_OPTION, true);
        out.message(tags::message::OPTIONS, &options);
        out
    }

    fn enum_type(&self, enum_type: &EnumType) -> ProtoWriter {
        use tags::enumeration as tag;

        let owner = enum_type.name.to_string();
        let mut out = ProtoWriter::new();
        out.string(tag::NAME, enum_type.name.simple_name());
        for constant in &enum_type.constants {
            let mut value = ProtoWriter::new();
            value.string(tags::enum_value::NAME, &constant.name);
            value.int32(tags::enum_value::NUMBER, constant.tag);
            let frame = format!("{owner}.{}", constant.name);
            self.write_options(&mut value, tags::enum_value::OPTIONS, OptionsKind::EnumValue, &constant.options, &frame);
            out.message(tag::VALUE, &value);
        }
        self.write_options(&mut out, tag::OPTIONS, OptionsKind::Enum, &enum_type.options, &owner);
        write_reserved(&mut out, &enum_type.reserved, tag::RESERVED_RANGE, tag::RESERVED_NAME, 0);
        out
    }

    fn service(&self, service: &Service) -> ProtoWriter {
        use tags::service as tag;

        let owner = service.name.to_string();
        let mut out = ProtoWriter::new();
        out.string(tag::NAME, service.name.simple_name());
        for rpc in &service.rpcs {
            out.message(tag::METHOD, &self.method(rpc, &owner));
        }
        self.write_options(&mut out, tag::OPTIONS, OptionsKind::Service, &service.options, &owner);
        out
    }

    fn method(&self, rpc: &Rpc, owner: &str) -> ProtoWriter {
        use tags::method as tag;

        let mut out = ProtoWriter::new();
        out.string(tag::NAME, &rpc.name);
        out.string(tag::INPUT_TYPE, &absolute(&rpc.request));
        out.string(tag::OUTPUT_TYPE, &absolute(&rpc.response));
        let frame = format!("{owner}#{}", rpc.name);
        self.write_options(&mut out, tag::OPTIONS, OptionsKind::Method, &rpc.options, &frame);
        if rpc.request_streaming {
            out.bool(tag::CLIENT_STREAMING, true);
        }
        if rpc.response_streaming {
            out.bool(tag::SERVER_STREAMING, true);
        }
        out
    }
}

/// Encodes an inclusive range; `end_offset` is 1 where the descriptor's end
/// is exclusive.
fn range_message(range: TagRange, end_offset: i32) -> ProtoWriter {
    let mut out = ProtoWriter::new();
    out.int32(tags::message::range::START, range.start);
    out.int32(tags::message::range::END, range.end.saturating_add(end_offset));
    out
}

fn write_reserved(out: &mut ProtoWriter, reserved: &Reserved, range_tag: u32, name_tag: u32, end_offset: i32) {
    for range in &reserved.ranges {
        out.message(range_tag, &range_message(*range, end_offset));
    }
    for name in &reserved.names {
        out.string(name_tag, name);
    }
}
