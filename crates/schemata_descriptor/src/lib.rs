//! Descriptor encoding for Schemata.
//!
//! This crate provides:
//! - [`SchemaEncoder`] - Serializes linked files as `FileDescriptorProto` bytes
//! - [`ProtoWriter`] / [`ProtoReader`] - Low-level wire format primitives
//! - [`tags`] - Field numbers of `google/protobuf/descriptor.proto`
//!
//! Map fields and proto3 `optional` fields have no direct descriptor form;
//! the encoder synthesizes map entry messages and `_name` one-ofs for them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod encoder;
mod options;
pub mod reader;
pub mod tags;
pub mod writer;

pub use encoder::{SchemaEncoder, json_name, map_entry_name};
pub use reader::{FieldValue, ProtoReader};
pub use writer::{ProtoWriter, WireType};
