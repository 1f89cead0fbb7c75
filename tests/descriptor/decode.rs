//! Helpers for picking descriptor bytes apart

use schemata_descriptor::{FieldValue, ProtoReader};
use schemata_foundation::Result;

pub fn fields(bytes: &[u8]) -> Vec<(u32, FieldValue<'_>)> {
    ProtoReader::new(bytes).collect::<Result<_>>().unwrap()
}

pub fn tags(bytes: &[u8]) -> Vec<u32> {
    fields(bytes).into_iter().map(|(tag, _)| tag).collect()
}

pub fn strings(bytes: &[u8], tag: u32) -> Vec<&str> {
    fields(bytes)
        .into_iter()
        .filter(|(t, _)| *t == tag)
        .filter_map(|(_, v)| v.as_str())
        .collect()
}

pub fn messages(bytes: &[u8], tag: u32) -> Vec<&[u8]> {
    fields(bytes)
        .into_iter()
        .filter(|(t, _)| *t == tag)
        .filter_map(|(_, v)| v.as_bytes())
        .collect()
}

pub fn varints(bytes: &[u8], tag: u32) -> Vec<u64> {
    fields(bytes)
        .into_iter()
        .filter(|(t, _)| *t == tag)
        .filter_map(|(_, v)| v.as_varint())
        .collect()
}

/// Finds the nested message whose `name` (field 1) is `name`.
pub fn named<'a>(bytes: &'a [u8], tag: u32, name: &str) -> &'a [u8] {
    messages(bytes, tag)
        .into_iter()
        .find(|m| strings(m, 1).first() == Some(&name))
        .unwrap_or_else(|| panic!("no {name} under tag {tag}"))
}
