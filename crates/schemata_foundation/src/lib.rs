//! Core identities, version ordering, and graph algorithms for Schemata.
//!
//! This crate provides:
//! - [`TypeName`] - Canonical identity of a scalar, named, or map type
//! - [`MemberName`] - A type plus a field, method, or wildcard member path
//! - [`enclosing`] - One-step generalization of a rule identifier
//! - [`Version`] - Dotted-numeric version ordering used by version gating
//! - [`strongly_connected_components`] - Iterative Tarjan SCC discovery
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod graph;
pub mod name;
pub mod version;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use graph::strongly_connected_components;
pub use name::{MemberName, MemberPath, ScalarType, TypeName, enclosing};
pub use version::Version;
