//! Converting string-keyed option bags into typed option messages.
//!
//! Each key is resolved against the options message (or, for nested message
//! values, against the field's message type) and its text is parsed according
//! to the field's declared type.

use std::str::FromStr;

use schemata_foundation::{Error, ErrorKind, Result, ScalarType, TypeName};
use schemata_schema::{Field, Label, OptionField, OptionValue, Options, Schema};

use crate::writer::ProtoWriter;

/// Encodes `options` as an instance of `options_type`.
///
/// Every key is checked. A single failure is returned as is; several are
/// aggregated.
pub(crate) fn encode_options(schema: &Schema, options_type: &TypeName, options: &Options) -> Result<ProtoWriter> {
    let mut failures = Vec::new();
    let mut resolved: Vec<(OptionField<'_>, &OptionValue)> = Vec::with_capacity(options.len());
    for (key, value) in options.iter() {
        match schema.resolve_option(options_type, key) {
            Some(field) => resolved.push((field, value)),
            None => failures.push(Error::new(ErrorKind::UnknownOption {
                key: key.to_string(),
                options_type: options_type.to_string(),
            })),
        }
    }
    resolved.sort_by_key(|(field, _)| field.field().tag);

    let mut writer = ProtoWriter::new();
    for (field, value) in resolved {
        let label = field.member_name().to_string();
        if let Err(e) = write_value(schema, &label, field.field(), value, &mut writer) {
            failures.push(e);
        }
    }

    if failures.len() == 1 {
        return Err(failures.remove(0));
    }
    Error::aggregate("encode", failures.iter().flat_map(Error::messages).collect())?;
    Ok(writer)
}

fn write_value(schema: &Schema, label: &str, field: &Field, value: &OptionValue, out: &mut ProtoWriter) -> Result<()> {
    match value {
        OptionValue::List(items) => {
            if field.label != Label::Repeated {
                return Err(Error::unexpected_value_type(label, field.type_name.to_string()));
            }
            for item in items {
                if matches!(item, OptionValue::List(_)) {
                    return Err(Error::unexpected_value_type(label, field.type_name.to_string()));
                }
                write_value(schema, label, field, item, out)?;
            }
            Ok(())
        }
        OptionValue::Message(nested) => {
            if schema.get_message(&field.type_name).is_none() {
                return Err(Error::unexpected_value_type(label, field.type_name.to_string()));
            }
            let inner = encode_options(schema, &field.type_name, nested)?;
            out.message(field.tag, &inner);
            Ok(())
        }
        OptionValue::Scalar(text) => write_scalar(schema, label, field, text, out),
    }
}

fn parse<T: FromStr>(label: &str, expected: &TypeName, text: &str) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| Error::unexpected_value_type(label, expected.to_string()))
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

fn write_scalar(schema: &Schema, label: &str, field: &Field, text: &str, out: &mut ProtoWriter) -> Result<()> {
    let expected = &field.type_name;
    let tag = field.tag;
    match expected {
        TypeName::Scalar(scalar) => match scalar {
            ScalarType::Bool => match text.trim() {
                "true" => out.bool(tag, true),
                "false" => out.bool(tag, false),
                _ => return Err(Error::unexpected_value_type(label, expected.to_string())),
            },
            ScalarType::Int32 => out.int32(tag, parse(label, expected, text)?),
            ScalarType::Int64 => out.int64(tag, parse(label, expected, text)?),
            ScalarType::Uint32 => out.uint64(tag, u64::from(parse::<u32>(label, expected, text)?)),
            ScalarType::Uint64 => out.uint64(tag, parse(label, expected, text)?),
            ScalarType::Sint32 => out.sint32(tag, parse(label, expected, text)?),
            ScalarType::Sint64 => out.sint64(tag, parse(label, expected, text)?),
            ScalarType::Fixed32 => out.fixed32(tag, parse(label, expected, text)?),
            ScalarType::Fixed64 => out.fixed64(tag, parse(label, expected, text)?),
            #[allow(clippy::cast_sign_loss)]
            ScalarType::Sfixed32 => out.fixed32(tag, parse::<i32>(label, expected, text)? as u32),
            #[allow(clippy::cast_sign_loss)]
            ScalarType::Sfixed64 => out.fixed64(tag, parse::<i64>(label, expected, text)? as u64),
            ScalarType::Float => out.float(tag, parse(label, expected, text)?),
            ScalarType::Double => out.double(tag, parse(label, expected, text)?),
            ScalarType::String => out.string(tag, unquote(text)),
            ScalarType::Bytes => out.bytes(tag, unquote(text).as_bytes()),
        },
        TypeName::Named(_) => {
            let Some(enum_type) = schema.get_enum(expected) else {
                return Err(Error::unexpected_value_type(label, expected.to_string()));
            };
            let constant = enum_type
                .constant(text.trim())
                .ok_or_else(|| Error::unexpected_value_type(label, expected.to_string()))?;
            out.int32(tag, constant.tag);
        }
        TypeName::Map { .. } => return Err(Error::unexpected_value_type(label, expected.to_string())),
    }
    Ok(())
}
