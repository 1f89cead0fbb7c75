//! Version gating of declarations carrying `since`/`until` metadata.
//!
//! A declaration annotated `since = "2"` exists from version 2 onward; one
//! annotated `until = "4"` exists up to, but not including, version 4. A
//! window keeps a declaration if its lifetime overlaps the configured bounds.

use schemata_foundation::{Error, ErrorKind, Result, Version};
use schemata_schema::Options;

/// Configured version bounds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VersionWindow {
    since: Option<Version>,
    until: Option<Version>,
    only: Option<Version>,
}

impl VersionWindow {
    /// Creates a window with no bounds; every declaration is retained.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Creates a window from optional bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidVersionBounds`] if `only` is combined with
    /// `since` or `until`, or if `since` is not before `until`.
    pub fn new(since: Option<&str>, until: Option<&str>, only: Option<&str>) -> Result<Self> {
        if only.is_some() && (since.is_some() || until.is_some()) {
            return Err(Error::new(ErrorKind::InvalidVersionBounds(
                "'only' cannot be combined with 'since' or 'until'".to_string(),
            )));
        }
        let window = Self {
            since: since.map(Version::from),
            until: until.map(Version::from),
            only: only.map(Version::from),
        };
        if let (Some(since), Some(until)) = (&window.since, &window.until) {
            if since >= until {
                return Err(Error::new(ErrorKind::InvalidVersionBounds(format!(
                    "'since' ({since}) must be before 'until' ({until})"
                ))));
            }
        }
        Ok(window)
    }

    /// Lower bound, inclusive.
    #[must_use]
    pub fn since(&self) -> Option<&Version> {
        self.since.as_ref()
    }

    /// Upper bound, exclusive.
    #[must_use]
    pub fn until(&self) -> Option<&Version> {
        self.until.as_ref()
    }

    /// The single version to target.
    #[must_use]
    pub fn only(&self) -> Option<&Version> {
        self.only.as_ref()
    }

    /// Returns true if no bound is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none() && self.only.is_none()
    }

    /// Returns true if a declaration living in `[since, until)` overlaps the window.
    #[must_use]
    pub fn is_retained(&self, since: Option<&str>, until: Option<&str>) -> bool {
        if let Some(declared) = since.map(Version::from) {
            if self.until.as_ref().is_some_and(|bound| declared >= *bound) {
                return false;
            }
            if self.only.as_ref().is_some_and(|only| declared > *only) {
                return false;
            }
        }
        if let Some(declared) = until.map(Version::from) {
            if self.since.as_ref().is_some_and(|bound| declared <= *bound) {
                return false;
            }
            if self.only.as_ref().is_some_and(|only| declared <= *only) {
                return false;
            }
        }
        true
    }

    /// Reads the version metadata stored under the given option keys and
    /// checks it against the window.
    #[must_use]
    pub fn is_retained_version(&self, options: &Options, since_key: &str, until_key: &str) -> bool {
        if self.is_unbounded() {
            return true;
        }
        self.is_retained(options.get_scalar(since_key), options.get_scalar(until_key))
    }
}
