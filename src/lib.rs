//! Schemata - schema compiler core for protobuf-style schemas
//!
//! This crate re-exports all layers of the Schemata system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: schemata_compiler    — CompilerConfig, CompileSession, manifest runs
//! Layer 3: schemata_transform   — Pruning, type relocation, emit target planning
//!          schemata_descriptor  — Descriptor encoding, wire format primitives
//! Layer 2: schemata_rules       — Emitting/pruning rules, version windows, manifests
//! Layer 1: schemata_schema      — Declaration model, linker, Schema, package cycles
//! Layer 0: schemata_foundation  — TypeName, MemberName, Version, SCC, Error
//! ```

pub use schemata_compiler as compiler;
pub use schemata_descriptor as descriptor;
pub use schemata_foundation as foundation;
pub use schemata_rules as rules;
pub use schemata_schema as schema;
pub use schemata_transform as transform;
