//! Rules deciding which declarations a code generation target receives.

use schemata_foundation::{MemberName, Result, TypeName};

use crate::rule_set::{RuleSet, Verdict};

/// Builder for [`EmittingRules`].
#[derive(Clone, Debug, Default)]
pub struct EmittingRulesBuilder {
    includes: Vec<String>,
    excludes: Vec<String>,
}

impl EmittingRulesBuilder {
    /// Adds an include pattern.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.includes.push(pattern.into());
        self
    }

    /// Adds several include patterns.
    #[must_use]
    pub fn includes<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.includes.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an exclude pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }

    /// Adds several exclude patterns.
    #[must_use]
    pub fn excludes<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.excludes.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Validates the patterns and builds the rules.
    ///
    /// # Errors
    ///
    /// Fails on malformed patterns, a pattern repeated within one set, or
    /// patterns present in both sets.
    pub fn build(self) -> Result<EmittingRules> {
        Ok(EmittingRules {
            set: RuleSet::new(self.includes, self.excludes)?,
        })
    }
}

/// Include/exclude rules for one emit target.
///
/// With no include patterns, everything not excluded is included.
#[derive(Clone, Debug, Default)]
pub struct EmittingRules {
    set: RuleSet,
}

impl EmittingRules {
    /// Starts building a rule set.
    #[must_use]
    pub fn builder() -> EmittingRulesBuilder {
        EmittingRulesBuilder::default()
    }

    /// Rules that include everything.
    #[must_use]
    pub fn include_all() -> Self {
        Self::default()
    }

    /// Returns true if there are no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Matches any identifier: a type, `Type#member`, or a wildcard form.
    #[must_use]
    pub fn includes(&self, identifier: &str) -> bool {
        match self.set.verdict(identifier) {
            Verdict::Include => true,
            Verdict::Exclude => false,
            Verdict::Unmatched => self.set.includes().is_empty(),
        }
    }

    /// Returns true if the type is emitted.
    #[must_use]
    pub fn includes_type(&self, type_name: &TypeName) -> bool {
        self.includes(&type_name.to_string())
    }

    /// Returns true if the member is emitted.
    #[must_use]
    pub fn includes_member(&self, member: &MemberName) -> bool {
        self.includes(&member.to_string())
    }

    /// The include patterns.
    pub fn include_patterns(&self) -> impl Iterator<Item = &str> {
        self.set.includes().iter().map(String::as_str)
    }

    /// The exclude patterns.
    pub fn exclude_patterns(&self) -> impl Iterator<Item = &str> {
        self.set.excludes().iter().map(String::as_str)
    }

    /// Include patterns that have not matched anything yet.
    #[must_use]
    pub fn unused_includes(&self) -> Vec<String> {
        self.set.unused_includes()
    }

    /// Exclude patterns that have not matched anything yet.
    #[must_use]
    pub fn unused_excludes(&self) -> Vec<String> {
        self.set.unused_excludes()
    }
}
