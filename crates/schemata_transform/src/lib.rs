//! Schema transformations for Schemata.
//!
//! This crate provides:
//! - [`prune`] - Tree-shaking from roots, honoring prunes and version windows
//! - [`TypeMover`] - Relocates top-level types between files and repairs imports
//! - [`plan_targets`] - Assigns types to ordered code generation targets
//!
//! Every transformation takes a [`schemata_schema::Schema`] by reference and
//! returns a new one.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod mover;
pub mod pruner;
pub mod targets;

pub use mover::{Move, TypeMover};
pub use pruner::prune;
pub use targets::{EmitTarget, TargetPlan, plan_targets};
