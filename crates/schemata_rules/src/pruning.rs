//! Roots and prunes for tree-shaking.
//!
//! Roots seed the reachability walk and prunes cut it. When no root is given
//! every declaration is implicitly a root, so a prune-only rule set removes
//! just what it names (and whatever then becomes unreachable through it).

use schemata_foundation::{MemberName, Result, TypeName};
use schemata_schema::Options;

use crate::rule_set::{RuleSet, Verdict};
use crate::window::VersionWindow;

/// Builder for [`PruningRules`].
#[derive(Clone, Debug, Default)]
pub struct PruningRulesBuilder {
    roots: Vec<String>,
    prunes: Vec<String>,
    since: Option<String>,
    until: Option<String>,
    only: Option<String>,
}

impl PruningRulesBuilder {
    /// Adds a root pattern.
    #[must_use]
    pub fn add_root(mut self, pattern: impl Into<String>) -> Self {
        self.roots.push(pattern.into());
        self
    }

    /// Adds several root patterns.
    #[must_use]
    pub fn add_roots<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.roots.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds a prune pattern.
    #[must_use]
    pub fn add_prune(mut self, pattern: impl Into<String>) -> Self {
        self.prunes.push(pattern.into());
        self
    }

    /// Adds several prune patterns.
    #[must_use]
    pub fn add_prunes<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.prunes.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Drops declarations that no longer exist at this version.
    #[must_use]
    pub fn since(mut self, version: impl Into<String>) -> Self {
        self.since = Some(version.into());
        self
    }

    /// Drops declarations that do not exist yet before this version.
    #[must_use]
    pub fn until(mut self, version: impl Into<String>) -> Self {
        self.until = Some(version.into());
        self
    }

    /// Keeps only declarations that exist at exactly this version.
    #[must_use]
    pub fn only(mut self, version: impl Into<String>) -> Self {
        self.only = Some(version.into());
        self
    }

    /// Validates the patterns and version bounds and builds the rules.
    ///
    /// # Errors
    ///
    /// Fails on malformed patterns, duplicate or conflicting patterns, and
    /// invalid version bounds.
    pub fn build(self) -> Result<PruningRules> {
        let window = VersionWindow::new(
            self.since.as_deref(),
            self.until.as_deref(),
            self.only.as_deref(),
        )?;
        Ok(PruningRules {
            set: RuleSet::new(self.roots, self.prunes)?,
            window,
        })
    }
}

/// Root and prune patterns plus a version window.
#[derive(Clone, Debug, Default)]
pub struct PruningRules {
    set: RuleSet,
    window: VersionWindow,
}

impl PruningRules {
    /// Starts building a rule set.
    #[must_use]
    pub fn builder() -> PruningRulesBuilder {
        PruningRulesBuilder::default()
    }

    /// Rules that keep everything.
    #[must_use]
    pub fn keep_all() -> Self {
        Self::default()
    }

    /// Returns true if there are no patterns and no version bounds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.window.is_unbounded()
    }

    /// The version window.
    #[must_use]
    pub fn window(&self) -> &VersionWindow {
        &self.window
    }

    /// Matches an identifier and returns the raw verdict.
    #[must_use]
    pub fn verdict(&self, identifier: &str) -> Verdict {
        self.set.verdict(identifier)
    }

    /// Returns true if the identifier seeds the reachability walk.
    ///
    /// With no root patterns everything is a root unless pruned.
    #[must_use]
    pub fn is_root(&self, identifier: &str) -> bool {
        match self.set.verdict(identifier) {
            Verdict::Include => true,
            Verdict::Exclude => false,
            Verdict::Unmatched => self.set.includes().is_empty(),
        }
    }

    /// Returns true if the most specific matching pattern is a prune.
    #[must_use]
    pub fn prunes(&self, identifier: &str) -> bool {
        self.set.verdict(identifier) == Verdict::Exclude
    }

    /// Returns true if the type is a root.
    #[must_use]
    pub fn is_root_type(&self, type_name: &TypeName) -> bool {
        self.is_root(&type_name.to_string())
    }

    /// Returns true if the member is a root.
    #[must_use]
    pub fn is_root_member(&self, member: &MemberName) -> bool {
        self.is_root(&member.to_string())
    }

    /// Returns true if the type is pruned.
    #[must_use]
    pub fn prunes_type(&self, type_name: &TypeName) -> bool {
        self.prunes(&type_name.to_string())
    }

    /// Returns true if the member is pruned.
    #[must_use]
    pub fn prunes_member(&self, member: &MemberName) -> bool {
        self.prunes(&member.to_string())
    }

    /// Returns true if the version metadata under the given keys overlaps the window.
    #[must_use]
    pub fn is_retained_version(&self, options: &Options, since_key: &str, until_key: &str) -> bool {
        self.window.is_retained_version(options, since_key, until_key)
    }

    /// The explicit root patterns.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.set.includes().iter().map(String::as_str)
    }

    /// The prune patterns.
    pub fn prune_patterns(&self) -> impl Iterator<Item = &str> {
        self.set.excludes().iter().map(String::as_str)
    }

    /// Root patterns that have not matched anything yet.
    ///
    /// The implicit "everything" root is never reported.
    #[must_use]
    pub fn unused_roots(&self) -> Vec<String> {
        self.set.unused_includes()
    }

    /// Prune patterns that have not matched anything yet.
    #[must_use]
    pub fn unused_prunes(&self) -> Vec<String> {
        self.set.unused_excludes()
    }
}
