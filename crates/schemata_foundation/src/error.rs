//! Error types for the Schemata compiler.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the Schemata workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Schemata operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid name error.
    #[must_use]
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidName {
            name: name.into(),
            reason: reason.into(),
        })
    }

    /// Creates an error for an operation that has no meaning on a scalar or map type.
    #[must_use]
    pub fn illegal_scope(name: impl Into<String>, operation: &'static str) -> Self {
        Self::new(ErrorKind::IllegalScope {
            name: name.into(),
            operation,
        })
    }

    /// Creates an unresolved type error.
    #[must_use]
    pub fn unresolved_type(name: impl Into<String>, referrer: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvedType {
            name: name.into(),
            referrer: referrer.into(),
        })
    }

    /// Creates an unexpected option value error.
    #[must_use]
    pub fn unexpected_value_type(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnexpectedValueType {
            field: field.into(),
            expected: expected.into(),
        })
    }

    /// Collects a list of errors discovered by one operation into a single error.
    ///
    /// Returns `Ok(())` when the list is empty.
    pub fn aggregate(operation: &'static str, errors: Vec<String>) -> Result<()> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self::new(ErrorKind::Aggregate { operation, errors }))
        }
    }

    /// Returns the individual messages of an aggregated error, or this error's message.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match &self.kind {
            ErrorKind::Aggregate { errors, .. } => errors.clone(),
            kind => vec![kind.to_string()],
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A type or member identifier could not be parsed.
    #[error("invalid name '{name}': {reason}")]
    InvalidName {
        /// The offending text.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Nesting or scope lookup requested on a type that has no namespace.
    #[error("cannot {operation} on '{name}': scalar and map types have no namespace")]
    IllegalScope {
        /// The scalar or map type.
        name: String,
        /// The rejected operation.
        operation: &'static str,
    },

    /// The same pattern was added twice to one rule set.
    #[error("duplicate rule: {0}")]
    DuplicateRule(String),

    /// The same pattern appears in both the include and the exclude set.
    #[error("conflicting rules, present in both include and exclude sets: {}", .0.join(", "))]
    ConflictingRules(Vec<String>),

    /// A rule pattern is malformed.
    #[error("invalid rule pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as written.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Version bounds cannot be combined.
    #[error("invalid version bounds: {0}")]
    InvalidVersionBounds(String),

    /// A manifest could not be parsed or validated.
    #[error("invalid manifest: {0}")]
    Manifest(String),

    /// A referenced type is not declared anywhere visible.
    #[error("unable to resolve {name} (referenced from {referrer})")]
    UnresolvedType {
        /// The type as written.
        name: String,
        /// The declaration or member that refers to it.
        referrer: String,
    },

    /// Two declarations share one qualified name.
    #[error("duplicate type {name} declared in {first} and {second}")]
    DuplicateType {
        /// The qualified type name.
        name: String,
        /// Path of the first declaring file.
        first: String,
        /// Path of the second declaring file.
        second: String,
    },

    /// An option key does not match any option field.
    #[error("unknown option {key} on {options_type}")]
    UnknownOption {
        /// The option key as written.
        key: String,
        /// The options message the key was looked up in.
        options_type: String,
    },

    /// An option value has a shape its field type cannot accept.
    #[error("unexpected field value type for {field} (expected {expected})")]
    UnexpectedValueType {
        /// The option field.
        field: String,
        /// The type the field requires.
        expected: String,
    },

    /// Several problems found by a single pass.
    #[error("{operation} failed:\n  {}", .errors.join("\n  "))]
    Aggregate {
        /// The operation that collected the errors.
        operation: &'static str,
        /// One message per problem.
        errors: Vec<String>,
    },

    /// Package references form a cycle.
    #[error("package cycles detected: {}", format_cycles(.0))]
    PackageCycle(Vec<Vec<String>>),

    /// Strict mode rejected rules that never matched.
    #[error("unused rules: roots [{}], prunes [{}]", .roots.join(", "), .prunes.join(", "))]
    UnusedRules {
        /// Root patterns that never matched.
        roots: Vec<String>,
        /// Prune patterns that never matched.
        prunes: Vec<String>,
    },

    /// A snapshot could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

fn format_cycles(cycles: &[Vec<String>]) -> String {
    cycles
        .iter()
        .map(|cycle| format!("[{}]", cycle.join(" -> ")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// File path the error relates to.
    pub file: Option<String>,
    /// Declarations enclosing the failure, outermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file path.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Adds a declaration frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "at {file}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
