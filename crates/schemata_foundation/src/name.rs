//! Canonical identities for declared types and their members.
//!
//! A [`TypeName`] names a scalar, a declared (dotted) type, or a map
//! pseudo-type. A [`MemberName`] adds a field, method, qualified extension, or
//! wildcard member to a type. Both render to a canonical string, which is also
//! the syntax rule patterns are written in.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// ScalarType
// =============================================================================

/// Built-in scalar types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScalarType {
    /// `bool`
    Bool,
    /// `bytes`
    Bytes,
    /// `double`
    Double,
    /// `float`
    Float,
    /// `fixed32`
    Fixed32,
    /// `fixed64`
    Fixed64,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `sfixed32`
    Sfixed32,
    /// `sfixed64`
    Sfixed64,
    /// `sint32`
    Sint32,
    /// `sint64`
    Sint64,
    /// `string`
    String,
    /// `uint32`
    Uint32,
    /// `uint64`
    Uint64,
}

impl ScalarType {
    /// Every scalar, in keyword order.
    pub const ALL: [ScalarType; 15] = [
        Self::Bool,
        Self::Bytes,
        Self::Double,
        Self::Float,
        Self::Fixed32,
        Self::Fixed64,
        Self::Int32,
        Self::Int64,
        Self::Sfixed32,
        Self::Sfixed64,
        Self::Sint32,
        Self::Sint64,
        Self::String,
        Self::Uint32,
        Self::Uint64,
    ];

    /// Returns the IDL keyword for this scalar.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Bytes => "bytes",
            Self::Double => "double",
            Self::Float => "float",
            Self::Fixed32 => "fixed32",
            Self::Fixed64 => "fixed64",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Sfixed32 => "sfixed32",
            Self::Sfixed64 => "sfixed64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
            Self::String => "string",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
        }
    }

    /// Recognizes a scalar by exact keyword match.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.keyword() == keyword)
    }

    /// Returns true if this scalar may be used as a map key.
    #[must_use]
    pub const fn is_valid_map_key(self) -> bool {
        !matches!(self, Self::Double | Self::Float | Self::Bytes)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// =============================================================================
// TypeName
// =============================================================================

/// Canonical identity of a type.
///
/// Equality is structural, which coincides with equality of the canonical
/// string form.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeName {
    /// A built-in scalar.
    Scalar(ScalarType),
    /// A declared type, as a dotted path like `pkg.Outer.Inner`.
    Named(Arc<str>),
    /// `map<K, V>`, keyed by a scalar.
    Map {
        /// The key scalar.
        key: ScalarType,
        /// The value type.
        value: Box<TypeName>,
    },
}

impl TypeName {
    /// `bool`
    pub const BOOL: TypeName = TypeName::Scalar(ScalarType::Bool);
    /// `bytes`
    pub const BYTES: TypeName = TypeName::Scalar(ScalarType::Bytes);
    /// `double`
    pub const DOUBLE: TypeName = TypeName::Scalar(ScalarType::Double);
    /// `float`
    pub const FLOAT: TypeName = TypeName::Scalar(ScalarType::Float);
    /// `int32`
    pub const INT32: TypeName = TypeName::Scalar(ScalarType::Int32);
    /// `int64`
    pub const INT64: TypeName = TypeName::Scalar(ScalarType::Int64);
    /// `string`
    pub const STRING: TypeName = TypeName::Scalar(ScalarType::String);
    /// `uint32`
    pub const UINT32: TypeName = TypeName::Scalar(ScalarType::Uint32);
    /// `uint64`
    pub const UINT64: TypeName = TypeName::Scalar(ScalarType::Uint64);

    /// Parses a type name.
    ///
    /// Scalars are recognized by exact keyword; `map<K,V>` is parsed into the
    /// map variant; anything else must be a dotted path of non-empty segments,
    /// optionally starting with `.` to mark it absolute.
    ///
    /// # Errors
    ///
    /// Returns an error for empty names, empty segments, or map keys that are
    /// not scalars or are `double`, `float`, or `bytes`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(scalar) = ScalarType::from_keyword(s) {
            return Ok(Self::Scalar(scalar));
        }
        if let Some(rest) = s.strip_prefix("map<") {
            return Self::parse_map(s, rest);
        }
        Self::named(s)
    }

    /// Creates a declared type name, validating its segments.
    ///
    /// # Errors
    ///
    /// Returns an error for empty names, empty segments, or reserved characters.
    pub fn named(path: &str) -> Result<Self> {
        let body = path.strip_prefix('.').unwrap_or(path);
        if body.is_empty() {
            return Err(Error::invalid_name(path, "empty type name"));
        }
        for segment in body.split('.') {
            if segment.is_empty() {
                return Err(Error::invalid_name(path, "empty path segment"));
            }
            if let Some(c) = segment
                .chars()
                .find(|c| !(c.is_alphanumeric() || *c == '_'))
            {
                return Err(Error::invalid_name(path, format!("unexpected character '{c}'")));
            }
        }
        Ok(Self::Named(Arc::from(path)))
    }

    fn parse_map(full: &str, rest: &str) -> Result<Self> {
        let inner = rest
            .strip_suffix('>')
            .ok_or_else(|| Error::invalid_name(full, "unterminated map type"))?;
        let (key, value) = inner
            .split_once(',')
            .ok_or_else(|| Error::invalid_name(full, "map type needs a key and a value"))?;
        let key = match Self::parse(key)? {
            Self::Scalar(scalar) if scalar.is_valid_map_key() => scalar,
            Self::Scalar(scalar) => {
                return Err(Error::invalid_name(full, format!("'{scalar}' is not a valid map key")));
            }
            other => {
                return Err(Error::invalid_name(full, format!("map key '{other}' is not a scalar")));
            }
        };
        let value = Self::parse(value)?;
        if value.is_map() {
            return Err(Error::invalid_name(full, "map values cannot be maps"));
        }
        Ok(Self::Map {
            key,
            value: Box::new(value),
        })
    }

    /// Creates a map type.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid map key or the value is a map.
    pub fn map(key: ScalarType, value: TypeName) -> Result<Self> {
        if !key.is_valid_map_key() {
            return Err(Error::invalid_name(
                format!("map<{key}, {value}>"),
                format!("'{key}' is not a valid map key"),
            ));
        }
        if value.is_map() {
            return Err(Error::invalid_name(
                format!("map<{key}, {value}>"),
                "map values cannot be maps",
            ));
        }
        Ok(Self::Map {
            key,
            value: Box::new(value),
        })
    }

    /// Returns true for built-in scalars.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns true for map pseudo-types.
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map { .. })
    }

    /// Returns the dotted path of a declared type.
    #[must_use]
    pub fn as_named(&self) -> Option<&str> {
        match self {
            Self::Named(path) => Some(path),
            _ => None,
        }
    }

    /// Returns true if this declared name starts with `.` (already fully qualified).
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.as_named().is_some_and(|p| p.starts_with('.'))
    }

    /// Returns the declared type this type refers to, looking through maps.
    #[must_use]
    pub fn referenced_named(&self) -> Option<&TypeName> {
        match self {
            Self::Named(_) => Some(self),
            Self::Map { value, .. } => value.referenced_named(),
            Self::Scalar(_) => None,
        }
    }

    /// Returns the last segment of a declared name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        match self {
            Self::Named(path) => path.rsplit('.').next().unwrap_or(path),
            Self::Scalar(s) => s.keyword(),
            Self::Map { .. } => "map",
        }
    }

    /// Returns the name of the type or package one level up.
    ///
    /// `pkg.Outer.Inner` yields `pkg.Outer`; a top-level `Message` yields `None`.
    ///
    /// # Errors
    ///
    /// Scalar and map types have no namespace.
    pub fn enclosing_type_or_package(&self) -> Result<Option<String>> {
        let path = self.require_named("compute the enclosing scope")?;
        let path = path.strip_prefix('.').unwrap_or(path);
        Ok(path.rfind('.').map(|dot| path[..dot].to_string()))
    }

    /// Creates the name of a type nested directly under this one.
    ///
    /// # Errors
    ///
    /// Scalar and map types cannot contain nested types.
    pub fn nested(&self, simple_name: &str) -> Result<TypeName> {
        let path = self.require_named("nest a type")?;
        Self::named(&format!("{path}.{simple_name}"))
    }

    fn require_named(&self, operation: &'static str) -> Result<&str> {
        match self {
            Self::Named(path) => Ok(path),
            other => Err(Error::illegal_scope(other.to_string(), operation)),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => f.write_str(scalar.keyword()),
            Self::Named(path) => f.write_str(path),
            Self::Map { key, value } => write!(f, "map<{key}, {value}>"),
        }
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({self})")
    }
}

impl FromStr for TypeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// =============================================================================
// MemberName
// =============================================================================

/// The member part of a [`MemberName`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MemberPath {
    /// A field, enum constant, or method: `Type#name`.
    Simple(String),
    /// A dotted name such as an extension field: `Type#pkg.ext`.
    Qualified(Vec<String>),
    /// Every member of the type: `Type#*`.
    Wildcard,
}

impl MemberPath {
    /// Parses the text after `#`.
    ///
    /// # Errors
    ///
    /// Returns an error for empty paths or empty segments.
    pub fn parse(s: &str) -> Result<Self> {
        if s == "*" {
            return Ok(Self::Wildcard);
        }
        if s.is_empty() {
            return Err(Error::invalid_name(s, "empty member name"));
        }
        let segments: Vec<String> = s.split('.').map(String::from).collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::invalid_name(s, "empty member path segment"));
        }
        if segments.len() == 1 {
            Ok(Self::Simple(s.to_string()))
        } else {
            Ok(Self::Qualified(segments))
        }
    }
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(name) => f.write_str(name),
            Self::Qualified(segments) => f.write_str(&segments.join(".")),
            Self::Wildcard => f.write_str("*"),
        }
    }
}

/// A member of a declared type, written `Type#member`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemberName {
    /// The declaring type.
    pub type_name: TypeName,
    /// The member within it.
    pub member: MemberPath,
}

impl MemberName {
    /// Creates a member name from a type and a member path string.
    ///
    /// # Errors
    ///
    /// Returns an error if the member path is malformed or the type is not declared.
    pub fn new(type_name: TypeName, member: &str) -> Result<Self> {
        if type_name.as_named().is_none() {
            return Err(Error::illegal_scope(type_name.to_string(), "name a member"));
        }
        Ok(Self {
            type_name,
            member: MemberPath::parse(member)?,
        })
    }

    /// Parses `Type#member`, `Type#a.b.c`, or `Type#*`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no `#` or either side is malformed.
    pub fn parse(s: &str) -> Result<Self> {
        let (type_part, member_part) = s
            .split_once('#')
            .ok_or_else(|| Error::invalid_name(s, "member names are written Type#member"))?;
        Self::new(TypeName::parse(type_part)?, member_part)
    }

    /// Returns the member path as written after `#`.
    #[must_use]
    pub fn member_str(&self) -> String {
        self.member.to_string()
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.type_name, self.member)
    }
}

impl fmt::Debug for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberName({self})")
    }
}

impl FromStr for MemberName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// =============================================================================
// Identifier generalization
// =============================================================================

/// Generalizes a rule identifier by one level of specificity.
///
/// The chain for a member identifier is
/// `Type#a.b.member → Type#a.b.* → Type#a.* → Type#* → Type → pkg.sub.* → pkg.* → * → None`.
/// Each level yields exactly one identifier.
#[must_use]
pub fn enclosing(identifier: &str) -> Option<String> {
    if let Some((type_part, member)) = identifier.split_once('#') {
        if member == "*" {
            return Some(type_part.to_string());
        }
        return Some(match generalize_dotted(member) {
            Some(prefix) => format!("{type_part}#{prefix}.*"),
            None => format!("{type_part}#*"),
        });
    }
    if identifier == "*" {
        return None;
    }
    Some(match generalize_dotted(identifier) {
        Some(prefix) => format!("{prefix}.*"),
        None => "*".to_string(),
    })
}

/// Returns the dotted prefix one level up, ignoring a trailing `.*`.
fn generalize_dotted(path: &str) -> Option<&str> {
    let body = path.strip_suffix(".*").unwrap_or(path);
    body.rfind('.').map(|dot| &body[..dot])
}
