//! Running the compile pipeline over a linked schema.
//!
//! Phases run in a fixed order, each inside its own span:
//!
//! 1. build rules and parse moves (configuration errors fail here)
//! 2. prune
//! 3. unused-rule diagnostics (fatal in strict mode)
//! 4. package cycle check (fatal unless permitted)
//! 5. moves
//! 6. emit target planning
//! 7. descriptor encoding (when enabled)

use std::collections::BTreeMap;

use schemata_descriptor::SchemaEncoder;
use schemata_foundation::{Error, ErrorKind, Result};
use schemata_rules::Manifest;
use schemata_schema::{Schema, check_package_cycles};
use schemata_transform::{TargetPlan, TypeMover, plan_targets, prune};
use tracing::{debug, info_span, warn};

use crate::config::CompilerConfig;

/// Conditions worth reporting that did not stop compilation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Root patterns that matched nothing.
    pub unused_roots: Vec<String>,
    /// Prune patterns that matched nothing.
    pub unused_prunes: Vec<String>,
    /// Package cycles found while cycles were permitted.
    pub package_cycles: Vec<Vec<String>>,
}

impl Diagnostics {
    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unused_roots.is_empty() && self.unused_prunes.is_empty() && self.package_cycles.is_empty()
    }
}

/// The result of a compile run.
#[derive(Clone, Debug)]
pub struct CompileOutput {
    /// The pruned and relocated schema.
    pub schema: Schema,
    /// Descriptor bytes by file path; empty when encoding is disabled.
    pub descriptors: BTreeMap<String, Vec<u8>>,
    /// Type assignments, one per configured emit target.
    pub plans: Vec<TargetPlan>,
    /// Non-fatal findings.
    pub diagnostics: Diagnostics,
}

/// Runs the pipeline with one configuration.
#[derive(Clone, Debug, Default)]
pub struct CompileSession {
    config: CompilerConfig,
}

impl CompileSession {
    /// Creates a session.
    #[must_use]
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compiles `schema`.
    ///
    /// # Errors
    ///
    /// Fails on configuration errors, unused rules in strict mode, package
    /// cycles unless permitted, invalid moves, and unencodable options.
    pub fn run(&self, schema: &Schema) -> Result<CompileOutput> {
        let config = &self.config;
        let (rules, moves) = {
            let _span = info_span!("schemata.rules").entered();
            (config.pruning_rules()?, config.type_moves()?)
        };

        let pruned = {
            let _span = info_span!("schemata.prune").entered();
            prune(schema, &rules)
        };

        let mut diagnostics = Diagnostics {
            unused_roots: rules.unused_roots(),
            unused_prunes: rules.unused_prunes(),
            package_cycles: Vec::new(),
        };
        {
            let _span = info_span!("schemata.diagnostics").entered();
            let unused = !diagnostics.unused_roots.is_empty() || !diagnostics.unused_prunes.is_empty();
            if unused && config.strict_rules {
                return Err(Error::new(ErrorKind::UnusedRules {
                    roots: diagnostics.unused_roots,
                    prunes: diagnostics.unused_prunes,
                }));
            }
            for pattern in &diagnostics.unused_roots {
                warn!(%pattern, "unused root");
            }
            for pattern in &diagnostics.unused_prunes {
                warn!(%pattern, "unused prune");
            }
        }

        diagnostics.package_cycles = {
            let _span = info_span!("schemata.cycles").entered();
            check_package_cycles(&pruned, config.permit_package_cycles)?
        };

        let moved = {
            let _span = info_span!("schemata.move", moves = moves.len()).entered();
            TypeMover::new(&pruned).add_moves(moves).apply()?
        };

        let plans = {
            let _span = info_span!("schemata.targets").entered();
            let plans = plan_targets(&moved, &config.targets);
            for plan in &plans {
                for pattern in plan.unused_includes.iter().chain(&plan.unused_excludes) {
                    warn!(target = %plan.target, %pattern, "unused emit rule");
                }
            }
            plans
        };

        let descriptors = if config.encode_descriptors {
            let _span = info_span!("schemata.encode").entered();
            SchemaEncoder::new(&moved).encode_all()?
        } else {
            BTreeMap::new()
        };

        debug!(
            files = moved.file_count(),
            descriptors = descriptors.len(),
            "compile finished"
        );
        Ok(CompileOutput {
            schema: moved,
            descriptors,
            plans,
            diagnostics,
        })
    }
}

/// Compiles `schema` once per manifest module, dependencies first.
///
/// Each module's roots and prunes are added to a copy of `base`.
///
/// # Errors
///
/// Fails with the first module that fails; the module becomes the outermost
/// frame of the error context.
pub fn compile_manifest(
    manifest: &Manifest,
    schema: &Schema,
    base: &CompilerConfig,
) -> Result<Vec<(String, CompileOutput)>> {
    let mut outputs = Vec::with_capacity(manifest.len());
    for module in manifest.order() {
        let _span = info_span!("schemata.module", module = %module.name).entered();
        let config = base
            .clone()
            .with_roots(module.roots.iter().cloned())
            .with_prunes(module.prunes.iter().cloned());
        let output = CompileSession::new(config).run(schema).map_err(|mut e| {
            let mut context = e.context.take().unwrap_or_default();
            context.stack.insert(0, format!("module {}", module.name));
            e.with_context(context)
        })?;
        outputs.push((module.name.clone(), output));
    }
    Ok(outputs)
}
