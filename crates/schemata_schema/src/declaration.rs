//! Declared types: messages, enums, and namespace-only enclosing types.
//!
//! [`Declaration`] is a closed sum type. Code that dispatches over declaration
//! kinds matches exhaustively, so a new kind has to be handled everywhere.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use schemata_foundation::TypeName;

use crate::options::Options;

// =============================================================================
// Label
// =============================================================================

/// Field cardinality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Label {
    /// Singular with explicit presence.
    ///
    /// In proto3 files this is the identity-omittable cardinality that encodes
    /// as a synthetic single-field one-of.
    Optional,
    /// Must be present.
    Required,
    /// Zero or more values.
    Repeated,
    /// Member of a declared mutually-exclusive group.
    OneOf,
    /// Singular without presence; the identity value is omitted on the wire.
    Implicit,
}

// =============================================================================
// Field
// =============================================================================

/// A message field or extension field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Field {
    /// Field name as declared.
    pub name: String,
    /// Wire tag.
    pub tag: u32,
    /// Field type; relative until linked.
    pub type_name: TypeName,
    /// Cardinality.
    pub label: Label,
    /// Default value as written.
    pub default: Option<String>,
    /// Explicit JSON name, if declared.
    pub json_name: Option<String>,
    /// Field options.
    pub options: Options,
}

impl Field {
    /// Creates an optional field.
    #[must_use]
    pub fn new(name: impl Into<String>, tag: u32, type_name: TypeName) -> Self {
        Self {
            name: name.into(),
            tag,
            type_name,
            label: Label::Optional,
            default: None,
            json_name: None,
            options: Options::new(),
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.label = label;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets an explicit JSON name.
    #[must_use]
    pub fn with_json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = Some(json_name.into());
        self
    }

    /// Adds an option.
    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<crate::OptionValue>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Returns true if the field holds a map.
    #[must_use]
    pub fn is_map(&self) -> bool {
        self.type_name.is_map()
    }
}

// =============================================================================
// Ranges and reservations
// =============================================================================

/// An inclusive range of tags.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TagRange {
    /// First tag in the range.
    pub start: i32,
    /// Last tag in the range.
    pub end: i32,
}

impl TagRange {
    /// Largest legal field tag.
    pub const MAX_TAG: i32 = 536_870_911;

    /// Creates an inclusive range.
    #[must_use]
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Creates a single-tag range.
    #[must_use]
    pub const fn single(tag: i32) -> Self {
        Self::new(tag, tag)
    }

    /// Returns true if the tag falls in the range.
    #[must_use]
    pub fn contains(&self, tag: i64) -> bool {
        i64::from(self.start) <= tag && tag <= i64::from(self.end)
    }
}

/// Reserved tags and names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reserved {
    /// Reserved tag ranges.
    pub ranges: Vec<TagRange>,
    /// Reserved names.
    pub names: Vec<String>,
}

impl Reserved {
    /// Returns true if nothing is reserved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty() && self.names.is_empty()
    }
}

// =============================================================================
// MessageType
// =============================================================================

/// A declared mutually-exclusive field group.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OneOf {
    /// Group name.
    pub name: String,
    /// Fields in the group; each is labelled [`Label::OneOf`].
    pub fields: Vec<Field>,
    /// Group options.
    pub options: Options,
}

impl OneOf {
    /// Creates an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            options: Options::new(),
        }
    }

    /// Adds a field, relabelling it as a group member.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field.with_label(Label::OneOf));
        self
    }
}

/// A message declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessageType {
    /// Qualified name.
    pub name: TypeName,
    /// Fields outside any one-of, in declaration order.
    pub fields: Vec<Field>,
    /// Declared one-of groups.
    pub one_ofs: Vec<OneOf>,
    /// Nested declarations.
    pub nested: Vec<Declaration>,
    /// Message options.
    pub options: Options,
    /// Tags reserved for extensions.
    pub extension_ranges: Vec<TagRange>,
    /// Reserved tags and names.
    pub reserved: Reserved,
}

impl MessageType {
    /// Creates an empty message.
    #[must_use]
    pub fn new(name: TypeName) -> Self {
        Self {
            name,
            fields: Vec::new(),
            one_ofs: Vec::new(),
            nested: Vec::new(),
            options: Options::new(),
            extension_ranges: Vec::new(),
            reserved: Reserved::default(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a one-of group.
    #[must_use]
    pub fn with_one_of(mut self, one_of: OneOf) -> Self {
        self.one_ofs.push(one_of);
        self
    }

    /// Adds a nested declaration.
    #[must_use]
    pub fn with_nested(mut self, nested: impl Into<Declaration>) -> Self {
        self.nested.push(nested.into());
        self
    }

    /// Adds an option.
    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<crate::OptionValue>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Adds an extension range.
    #[must_use]
    pub fn with_extension_range(mut self, range: TagRange) -> Self {
        self.extension_ranges.push(range);
        self
    }

    /// Sets the reserved tags and names.
    #[must_use]
    pub fn with_reserved(mut self, reserved: Reserved) -> Self {
        self.reserved = reserved;
        self
    }

    /// Iterates over every field, declared one-of members included.
    pub fn all_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .chain(self.one_ofs.iter().flat_map(|o| o.fields.iter()))
    }

    /// Iterates mutably over every field, declared one-of members included.
    pub fn all_fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.fields
            .iter_mut()
            .chain(self.one_ofs.iter_mut().flat_map(|o| o.fields.iter_mut()))
    }

    /// Finds a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.all_fields().find(|f| f.name == name)
    }

    /// Returns true if the tag lies in a declared extension range.
    #[must_use]
    pub fn accepts_extension(&self, tag: u32) -> bool {
        self.extension_ranges
            .iter()
            .any(|r| r.contains(i64::from(tag)))
    }
}

// =============================================================================
// EnumType
// =============================================================================

/// A named enum constant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumConstant {
    /// Constant name.
    pub name: String,
    /// Numeric value.
    pub tag: i32,
    /// Constant options.
    pub options: Options,
}

impl EnumConstant {
    /// Creates a constant.
    #[must_use]
    pub fn new(name: impl Into<String>, tag: i32) -> Self {
        Self {
            name: name.into(),
            tag,
            options: Options::new(),
        }
    }

    /// Adds an option.
    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<crate::OptionValue>) -> Self {
        self.options.insert(key, value);
        self
    }
}

/// An enum declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumType {
    /// Qualified name.
    pub name: TypeName,
    /// Constants in declaration order.
    pub constants: Vec<EnumConstant>,
    /// Enum options.
    pub options: Options,
    /// Reserved values and names.
    pub reserved: Reserved,
}

impl EnumType {
    /// Creates an empty enum.
    #[must_use]
    pub fn new(name: TypeName) -> Self {
        Self {
            name,
            constants: Vec::new(),
            options: Options::new(),
            reserved: Reserved::default(),
        }
    }

    /// Adds a constant.
    #[must_use]
    pub fn with_constant(mut self, name: impl Into<String>, tag: i32) -> Self {
        self.constants.push(EnumConstant::new(name, tag));
        self
    }

    /// Adds a fully built constant.
    #[must_use]
    pub fn with_enum_constant(mut self, constant: EnumConstant) -> Self {
        self.constants.push(constant);
        self
    }

    /// Adds an option.
    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<crate::OptionValue>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Finds a constant by name.
    #[must_use]
    pub fn constant(&self, name: &str) -> Option<&EnumConstant> {
        self.constants.iter().find(|c| c.name == name)
    }
}

// =============================================================================
// EnclosingType
// =============================================================================

/// A namespace-only declaration that exists to hold nested declarations.
///
/// Pruning produces these when a message is unreachable but some of its
/// nested types are kept.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnclosingType {
    /// Qualified name.
    pub name: TypeName,
    /// Nested declarations.
    pub nested: Vec<Declaration>,
}

// =============================================================================
// Declaration
// =============================================================================

/// A declared type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Declaration {
    /// A message.
    Message(MessageType),
    /// An enum.
    Enum(EnumType),
    /// A namespace holding nested declarations only.
    Enclosing(EnclosingType),
}

impl Declaration {
    /// Returns the qualified name.
    #[must_use]
    pub fn name(&self) -> &TypeName {
        match self {
            Self::Message(m) => &m.name,
            Self::Enum(e) => &e.name,
            Self::Enclosing(e) => &e.name,
        }
    }

    /// Returns the nested declarations (enums have none).
    #[must_use]
    pub fn nested(&self) -> &[Declaration] {
        match self {
            Self::Message(m) => &m.nested,
            Self::Enclosing(e) => &e.nested,
            Self::Enum(_) => &[],
        }
    }

    /// Returns the declaration's own options, if it can carry any.
    #[must_use]
    pub fn options(&self) -> Option<&Options> {
        match self {
            Self::Message(m) => Some(&m.options),
            Self::Enum(e) => Some(&e.options),
            Self::Enclosing(_) => None,
        }
    }

    /// Returns the message, if this is one.
    #[must_use]
    pub fn as_message(&self) -> Option<&MessageType> {
        match self {
            Self::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the enum, if this is one.
    #[must_use]
    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a short kind label for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Enum(_) => "enum",
            Self::Enclosing(_) => "enclosing",
        }
    }

    /// Visits this declaration and every nested declaration, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Declaration)) {
        visit(self);
        for nested in self.nested() {
            nested.walk(visit);
        }
    }
}

impl From<MessageType> for Declaration {
    fn from(m: MessageType) -> Self {
        Self::Message(m)
    }
}

impl From<EnumType> for Declaration {
    fn from(e: EnumType) -> Self {
        Self::Enum(e)
    }
}

impl From<EnclosingType> for Declaration {
    fn from(e: EnclosingType) -> Self {
        Self::Enclosing(e)
    }
}
