//! Schema model, linking, and structural validation for Schemata.
//!
//! This crate provides:
//! - [`ProtoFile`], [`Declaration`], [`Service`] - The declaration model
//! - [`Options`] - String-keyed option bags attached to declarations
//! - [`Linker`] - Resolves raw declarations into a closed, validated [`Schema`]
//! - [`Schema`] - Immutable lookup from type names to files and declarations
//! - [`package_cycles`] - Detects reference cycles between packages

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtin;
pub mod cycles;
pub mod declaration;
pub mod file;
pub mod linker;
pub mod options;
pub mod references;
pub mod schema;
pub mod service;
#[cfg(feature = "serde")]
pub mod snapshot;

pub use cycles::{check_package_cycles, package_cycles};
pub use declaration::{
    Declaration, EnclosingType, EnumConstant, EnumType, Field, Label, MessageType, OneOf,
    Reserved, TagRange,
};
pub use file::{Extend, ProtoFile, Syntax};
pub use linker::Linker;
pub use options::{OptionValue, Options, OptionsKind};
pub use schema::{ExtensionField, OptionField, Schema};
pub use service::{Rpc, Service};
