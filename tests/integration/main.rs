//! End-to-end tests through the `schemata` facade crate
//!
//! These link a schema, run the full compile pipeline, and inspect the
//! emitted descriptors.

mod manifests;
