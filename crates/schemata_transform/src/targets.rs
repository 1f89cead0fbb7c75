//! Assigning types to code generation targets.
//!
//! Targets are consulted in order. A type goes to every target whose rules
//! include it, unless an earlier exclusive target already claimed it. Nested
//! types travel with their top-level parent, so only top-level declarations
//! and services are assigned. Built-in files are never emitted.

use std::collections::HashSet;

use schemata_foundation::TypeName;
use schemata_rules::EmittingRules;
use schemata_schema::{Schema, builtin};
use tracing::debug;

/// A named code generation target.
#[derive(Clone, Debug)]
pub struct EmitTarget {
    /// Target name, used in diagnostics.
    pub name: String,
    /// Which types the target receives.
    pub rules: EmittingRules,
    /// Whether types given to this target are withheld from later targets.
    pub exclusive: bool,
}

impl EmitTarget {
    /// Creates an exclusive target.
    #[must_use]
    pub fn new(name: impl Into<String>, rules: EmittingRules) -> Self {
        Self {
            name: name.into(),
            rules,
            exclusive: true,
        }
    }

    /// Sets whether the target claims its types.
    #[must_use]
    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }
}

/// The types assigned to one target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetPlan {
    /// Target name.
    pub target: String,
    /// Assigned types, in file and declaration order.
    pub types: Vec<TypeName>,
    /// Include patterns that matched nothing.
    pub unused_includes: Vec<String>,
    /// Exclude patterns that matched nothing.
    pub unused_excludes: Vec<String>,
}

/// Assigns every top-level type of `schema` to the ordered `targets`.
#[must_use]
pub fn plan_targets(schema: &Schema, targets: &[EmitTarget]) -> Vec<TargetPlan> {
    let candidates: Vec<TypeName> = schema
        .files()
        .filter(|f| !builtin::is_builtin(&f.path))
        .flat_map(|f| {
            f.declarations
                .iter()
                .map(|d| d.name().clone())
                .chain(f.services.iter().map(|s| s.name.clone()))
        })
        .collect();

    let mut claimed: HashSet<TypeName> = HashSet::new();
    let mut plans = Vec::with_capacity(targets.len());
    for target in targets {
        // A fresh copy, so usage recorded by earlier plans does not leak in.
        let rules = target.rules.clone();
        let mut types = Vec::new();
        for name in &candidates {
            if claimed.contains(name) || !rules.includes_type(name) {
                continue;
            }
            types.push(name.clone());
        }
        if target.exclusive {
            claimed.extend(types.iter().cloned());
        }
        debug!(target = %target.name, types = types.len(), "planned emit target");
        plans.push(TargetPlan {
            target: target.name.clone(),
            types,
            unused_includes: rules.unused_includes(),
            unused_excludes: rules.unused_excludes(),
        });
    }
    plans
}
