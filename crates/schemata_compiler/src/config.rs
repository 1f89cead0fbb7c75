//! Compiler configuration.

use schemata_foundation::{Result, TypeName};
use schemata_rules::{EmittingRules, Module, PruningRules};
use schemata_transform::{EmitTarget, Move};

/// Everything a [`crate::CompileSession`] needs besides the schema.
#[derive(Clone, Debug)]
pub struct CompilerConfig {
    /// Root patterns; empty means every declaration is a root.
    pub roots: Vec<String>,
    /// Prune patterns.
    pub prunes: Vec<String>,
    /// Keep only elements that exist in this version or later.
    pub since: Option<String>,
    /// Keep only elements that exist before this version.
    pub until: Option<String>,
    /// Keep only elements that exist in exactly this version.
    pub only: Option<String>,
    /// Relocations as `(type, target path)` pairs.
    pub moves: Vec<(String, String)>,
    /// Emit targets, consulted in order.
    pub targets: Vec<EmitTarget>,
    /// Treat rules that match nothing as errors.
    pub strict_rules: bool,
    /// Report package cycles instead of failing on them.
    pub permit_package_cycles: bool,
    /// Produce descriptor bytes for every file.
    pub encode_descriptors: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            prunes: Vec::new(),
            since: None,
            until: None,
            only: None,
            moves: Vec::new(),
            targets: Vec::new(),
            strict_rules: false,
            permit_package_cycles: false,
            encode_descriptors: true,
        }
    }
}

impl CompilerConfig {
    /// Creates a configuration that keeps everything and encodes descriptors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds roots and prunes from a manifest module.
    #[must_use]
    pub fn from_module(module: &Module) -> Self {
        Self::new()
            .with_roots(module.roots.iter().cloned())
            .with_prunes(module.prunes.iter().cloned())
    }

    /// Adds a root pattern.
    #[must_use]
    pub fn with_root(mut self, pattern: impl Into<String>) -> Self {
        self.roots.push(pattern.into());
        self
    }

    /// Adds several root patterns.
    #[must_use]
    pub fn with_roots<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.roots.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds a prune pattern.
    #[must_use]
    pub fn with_prune(mut self, pattern: impl Into<String>) -> Self {
        self.prunes.push(pattern.into());
        self
    }

    /// Adds several prune patterns.
    #[must_use]
    pub fn with_prunes<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.prunes.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the lower version bound.
    #[must_use]
    pub fn with_since(mut self, version: impl Into<String>) -> Self {
        self.since = Some(version.into());
        self
    }

    /// Sets the upper version bound.
    #[must_use]
    pub fn with_until(mut self, version: impl Into<String>) -> Self {
        self.until = Some(version.into());
        self
    }

    /// Pins a single version.
    #[must_use]
    pub fn with_only(mut self, version: impl Into<String>) -> Self {
        self.only = Some(version.into());
        self
    }

    /// Adds a relocation of `type_name` into the file at `target_path`.
    #[must_use]
    pub fn with_move(mut self, type_name: impl Into<String>, target_path: impl Into<String>) -> Self {
        self.moves.push((type_name.into(), target_path.into()));
        self
    }

    /// Adds an emit target.
    #[must_use]
    pub fn with_target(mut self, name: impl Into<String>, rules: EmittingRules, exclusive: bool) -> Self {
        self.targets.push(EmitTarget::new(name, rules).with_exclusive(exclusive));
        self
    }

    /// Sets whether unused rules are fatal.
    #[must_use]
    pub fn with_strict_rules(mut self, strict: bool) -> Self {
        self.strict_rules = strict;
        self
    }

    /// Sets whether package cycles are permitted.
    #[must_use]
    pub fn with_permit_package_cycles(mut self, permit: bool) -> Self {
        self.permit_package_cycles = permit;
        self
    }

    /// Sets whether descriptors are encoded.
    #[must_use]
    pub fn with_encode_descriptors(mut self, encode: bool) -> Self {
        self.encode_descriptors = encode;
        self
    }

    /// Builds the pruning rules.
    ///
    /// # Errors
    ///
    /// Fails on malformed, duplicate, or conflicting patterns and on invalid
    /// version bounds.
    pub fn pruning_rules(&self) -> Result<PruningRules> {
        let mut builder = PruningRules::builder()
            .add_roots(self.roots.iter().cloned())
            .add_prunes(self.prunes.iter().cloned());
        if let Some(since) = &self.since {
            builder = builder.since(since.clone());
        }
        if let Some(until) = &self.until {
            builder = builder.until(until.clone());
        }
        if let Some(only) = &self.only {
            builder = builder.only(only.clone());
        }
        builder.build()
    }

    /// Parses the move directives.
    ///
    /// # Errors
    ///
    /// Fails if a type name is malformed.
    pub fn type_moves(&self) -> Result<Vec<Move>> {
        self.moves
            .iter()
            .map(|(type_name, target)| Ok(Move::new(TypeName::named(type_name)?, target.clone())))
            .collect()
    }
}
