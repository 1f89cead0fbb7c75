//! Compile pipeline for Schemata.
//!
//! This crate provides:
//! - [`CompilerConfig`] - Roots, prunes, version bounds, moves, and switches
//! - [`CompileSession`] - Runs prune, diagnostics, cycle check, moves, and
//!   encoding over a linked schema
//! - [`compile_manifest`] - Runs a session per manifest module, dependencies first

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod session;

pub use config::CompilerConfig;
pub use session::{CompileOutput, CompileSession, Diagnostics, compile_manifest};
