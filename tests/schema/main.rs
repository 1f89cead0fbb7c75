//! Integration tests for Layer 1: Schema
//!
//! Tests for linking, lookups, package cycles, and snapshots.

mod cycles;
mod linking;
mod lookups;
mod snapshots;
