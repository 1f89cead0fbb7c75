//! Integration tests for schemata_transform
//!
//! Tests for tree-shaking, type relocation, and emit target planning.

mod moving;
mod pruning;
mod targets;
