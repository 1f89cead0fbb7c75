//! Package-level cycle detection.

use std::collections::{BTreeMap, BTreeSet};

use schemata_foundation::{Error, ErrorKind, Result, strongly_connected_components};
use tracing::info;

use crate::schema::Schema;

/// Returns the package cycles of a schema.
///
/// Packages are graph nodes; a package points at every other package that
/// declares a type one of its files references. Each cycle lists its packages
/// in discovery order, starting from the alphabetically first package visited.
#[must_use]
pub fn package_cycles(schema: &Schema) -> Vec<Vec<String>> {
    let mut edges: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for file in schema.files() {
        let from = file.package_name().to_string();
        let targets = edges.entry(from.clone()).or_default();
        for reference in file.external_references() {
            if let Some(to) = schema.package_of(&reference) {
                if to != from {
                    targets.insert(to.to_string());
                }
            }
        }
    }

    let nodes: Vec<String> = edges.keys().cloned().collect();
    strongly_connected_components(nodes, |package: &String| {
        edges
            .get(package)
            .map(|targets| targets.iter().cloned().collect::<Vec<_>>())
            .unwrap_or_default()
    })
}

/// Fails if the schema has package cycles, unless `permit` is set.
///
/// # Errors
///
/// Returns [`ErrorKind::PackageCycle`] listing every cycle.
pub fn check_package_cycles(schema: &Schema, permit: bool) -> Result<Vec<Vec<String>>> {
    let cycles = package_cycles(schema);
    if cycles.is_empty() {
        return Ok(cycles);
    }
    if permit {
        for cycle in &cycles {
            info!(packages = %cycle.join(" -> "), "permitted package cycle");
        }
        return Ok(cycles);
    }
    Err(Error::new(ErrorKind::PackageCycle(cycles)))
}
