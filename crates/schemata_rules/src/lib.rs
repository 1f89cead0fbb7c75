//! Rule matching and module manifests for Schemata.
//!
//! This crate provides:
//! - [`EmittingRules`] - Decides which types a code generation target receives
//! - [`PruningRules`] - Roots and prunes that seed and cut tree-shaking
//! - [`VersionWindow`] - `since`/`until`/`only` gating of versioned declarations
//! - [`Manifest`] - Named modules with dependencies, roots, and prunes
//!
//! Both rule sets share one matcher: an identifier is generalized one level at
//! a time (see [`schemata_foundation::enclosing`]) and the first level present
//! in either set decides the verdict.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod emitting;
pub mod manifest;
pub mod pruning;
mod rule_set;
pub mod window;

pub use emitting::{EmittingRules, EmittingRulesBuilder};
pub use manifest::{Manifest, Module};
pub use pruning::{PruningRules, PruningRulesBuilder};
pub use rule_set::Verdict;
pub use window::VersionWindow;
