//! Module manifests.
//!
//! A manifest is a YAML mapping from module name to its dependencies, roots,
//! and prunes:
//!
//! ```yaml
//! common:
//!   roots: [shared.*]
//! api:
//!   dependencies: [common]
//!   roots: [api.v1.*]
//!   prunes: [api.v1.Legacy]
//! ```
//!
//! Unknown keys, entries repeated within one list, dependencies on undeclared
//! modules, and dependency cycles are rejected. Modules may be declared in any
//! order.

use std::collections::{BTreeMap, BTreeSet};

use schemata_foundation::{Error, ErrorKind, Result, strongly_connected_components};
use serde::Deserialize;
use tracing::debug;

use crate::pruning::PruningRules;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawModule {
    dependencies: Vec<String>,
    roots: Vec<String>,
    prunes: Vec<String>,
}

/// A named set of roots and prunes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    /// Module name.
    pub name: String,
    /// Modules that must be processed first.
    pub dependencies: BTreeSet<String>,
    /// Root patterns.
    pub roots: BTreeSet<String>,
    /// Prune patterns.
    pub prunes: BTreeSet<String>,
}

impl Module {
    /// Builds the pruning rules for this module.
    ///
    /// # Errors
    ///
    /// Fails if the patterns are malformed or conflict.
    pub fn pruning_rules(&self) -> Result<PruningRules> {
        PruningRules::builder()
            .add_roots(self.roots.iter().cloned())
            .add_prunes(self.prunes.iter().cloned())
            .build()
    }
}

/// A parsed and validated manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    modules: BTreeMap<String, Module>,
}

fn manifest_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Manifest(message.into()))
}

/// Collects `items` into a set, recording every entry listed more than once.
fn distinct(module: &str, list: &str, items: Vec<String>, duplicates: &mut Vec<String>) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    for item in items {
        if set.contains(&item) {
            duplicates.push(format!("module {module} lists {item} twice in {list}"));
        } else {
            set.insert(item);
        }
    }
    set
}

impl Manifest {
    /// Parses manifest YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Manifest`] for malformed YAML, unknown keys,
    /// repeated entries within a list, undeclared dependencies, and
    /// dependency cycles.
    pub fn parse(text: &str) -> Result<Self> {
        let raw: BTreeMap<String, Option<RawModule>> =
            serde_yaml::from_str(text).map_err(|e| manifest_error(e.to_string()))?;

        let mut duplicates = Vec::new();
        let mut modules = BTreeMap::new();
        for (name, module) in raw {
            let module = module.unwrap_or_default();
            let parsed = Module {
                dependencies: distinct(&name, "dependencies", module.dependencies, &mut duplicates),
                roots: distinct(&name, "roots", module.roots, &mut duplicates),
                prunes: distinct(&name, "prunes", module.prunes, &mut duplicates),
                name: name.clone(),
            };
            modules.insert(name, parsed);
        }
        if !duplicates.is_empty() {
            return Err(manifest_error(duplicates.join("; ")));
        }

        let mut missing = Vec::new();
        for module in modules.values() {
            for dependency in &module.dependencies {
                if !modules.contains_key(dependency) {
                    missing.push(format!("{} depends on undeclared module {dependency}", module.name));
                }
            }
        }
        if !missing.is_empty() {
            return Err(manifest_error(missing.join("; ")));
        }

        let cycles = strongly_connected_components(modules.keys().cloned(), |name: &String| {
            modules
                .get(name)
                .map(|m| m.dependencies.iter().cloned().collect::<Vec<_>>())
                .unwrap_or_default()
        });
        if !cycles.is_empty() {
            let described: Vec<String> = cycles.iter().map(|c| format!("[{}]", c.join(", "))).collect();
            return Err(manifest_error(format!(
                "dependency cycle between modules {}",
                described.join(", ")
            )));
        }

        debug!(modules = modules.len(), "parsed manifest");
        Ok(Self { modules })
    }

    /// Looks up a module by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Iterates over modules in name order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Returns the number of modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if the manifest declares no modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Returns modules so that each comes after all of its dependencies.
    ///
    /// Ties are broken by name.
    #[must_use]
    pub fn order(&self) -> Vec<&Module> {
        let mut ordered = Vec::with_capacity(self.modules.len());
        let mut placed = BTreeSet::new();
        for name in self.modules.keys() {
            self.place(name, &mut placed, &mut ordered);
        }
        ordered
    }

    fn place<'a>(&'a self, name: &str, placed: &mut BTreeSet<&'a str>, ordered: &mut Vec<&'a Module>) {
        let Some(module) = self.modules.get(name) else {
            return;
        };
        if !placed.insert(module.name.as_str()) {
            return;
        }
        for dependency in &module.dependencies {
            self.place(dependency, placed, ordered);
        }
        ordered.push(module);
    }
}
