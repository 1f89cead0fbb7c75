//! The matcher shared by emitting and pruning rules.

use std::cell::RefCell;
use std::collections::BTreeSet;

use schemata_foundation::{Error, ErrorKind, Result, TypeName, enclosing};

/// Outcome of matching an identifier against a rule set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The most specific matching pattern is in the include set.
    Include,
    /// The most specific matching pattern is in the exclude set.
    Exclude,
    /// No pattern along the generalization chain is present.
    Unmatched,
}

/// Include and exclude patterns plus bookkeeping of which ones matched.
#[derive(Debug, Default)]
pub(crate) struct RuleSet {
    includes: BTreeSet<String>,
    excludes: BTreeSet<String>,
    used_includes: RefCell<BTreeSet<String>>,
    used_excludes: RefCell<BTreeSet<String>>,
}

impl RuleSet {
    pub(crate) fn new(
        includes: impl IntoIterator<Item = String>,
        excludes: impl IntoIterator<Item = String>,
    ) -> Result<Self> {
        let includes = collect_patterns(includes)?;
        let excludes = collect_patterns(excludes)?;
        let conflicts: Vec<String> = includes.intersection(&excludes).cloned().collect();
        if !conflicts.is_empty() {
            return Err(Error::new(ErrorKind::ConflictingRules(conflicts)));
        }
        Ok(Self {
            includes,
            excludes,
            ..Self::default()
        })
    }

    pub(crate) fn includes(&self) -> &BTreeSet<String> {
        &self.includes
    }

    pub(crate) fn excludes(&self) -> &BTreeSet<String> {
        &self.excludes
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }

    /// Walks the generalization chain; the first level found in either set wins.
    pub(crate) fn verdict(&self, identifier: &str) -> Verdict {
        let mut current = Some(identifier.to_string());
        while let Some(pattern) = current {
            if self.includes.contains(&pattern) {
                self.used_includes.borrow_mut().insert(pattern);
                return Verdict::Include;
            }
            if self.excludes.contains(&pattern) {
                self.used_excludes.borrow_mut().insert(pattern);
                return Verdict::Exclude;
            }
            current = enclosing(&pattern);
        }
        Verdict::Unmatched
    }

    pub(crate) fn unused_includes(&self) -> Vec<String> {
        let used = self.used_includes.borrow();
        self.includes.difference(&used).cloned().collect()
    }

    pub(crate) fn unused_excludes(&self) -> Vec<String> {
        let used = self.used_excludes.borrow();
        self.excludes.difference(&used).cloned().collect()
    }
}

impl Clone for RuleSet {
    /// Clones the patterns; usage bookkeeping starts fresh.
    fn clone(&self) -> Self {
        Self {
            includes: self.includes.clone(),
            excludes: self.excludes.clone(),
            ..Self::default()
        }
    }
}

fn collect_patterns(patterns: impl IntoIterator<Item = String>) -> Result<BTreeSet<String>> {
    let mut set = BTreeSet::new();
    for pattern in patterns {
        validate_pattern(&pattern)?;
        if set.contains(&pattern) {
            return Err(Error::new(ErrorKind::DuplicateRule(pattern)));
        }
        set.insert(pattern);
    }
    Ok(set)
}

fn invalid(pattern: &str, reason: &str) -> Error {
    Error::new(ErrorKind::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    })
}

/// Checks that a pattern is a type, member, or wildcard identifier.
///
/// `*` may only appear as the final segment, so every pattern is one level of
/// some identifier's generalization chain.
pub(crate) fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern == "*" {
        return Ok(());
    }
    if pattern.contains('<') {
        return Err(invalid(pattern, "map types cannot be matched by rules"));
    }
    if pattern.starts_with('.') {
        return Err(invalid(pattern, "patterns are written without a leading '.'"));
    }
    match pattern.split_once('#') {
        Some((type_part, member)) => {
            if type_part.contains('*') {
                return Err(invalid(pattern, "member patterns need a concrete type"));
            }
            TypeName::named(type_part).map_err(|_| invalid(pattern, "malformed type name"))?;
            validate_dotted(pattern, member)
        }
        None => validate_dotted(pattern, pattern),
    }
}

fn validate_dotted(pattern: &str, path: &str) -> Result<()> {
    let body = match path.strip_suffix(".*") {
        Some(body) => body,
        None if path == "*" => return Ok(()),
        None => path,
    };
    if body.is_empty() || body.split('.').any(|segment| !is_identifier(segment)) {
        return Err(invalid(pattern, "expected dotted identifiers with an optional trailing '*'"));
    }
    Ok(())
}

fn is_identifier(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
}
