//! Option bags attached to files, declarations, and members.
//!
//! Options are kept as written: a string-keyed map whose values are strings,
//! lists, or nested maps. They are converted into typed values only when the
//! descriptor encoder consults the option field definitions in the schema.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use schemata_foundation::TypeName;

/// Option key marking the first version a field exists in.
pub const FIELD_SINCE: &str = "schemata.since";
/// Option key marking the first version a field no longer exists in.
pub const FIELD_UNTIL: &str = "schemata.until";
/// Option key marking the first version an enum constant exists in.
pub const CONSTANT_SINCE: &str = "schemata.constant_since";
/// Option key marking the first version an enum constant no longer exists in.
pub const CONSTANT_UNTIL: &str = "schemata.constant_until";
/// Option key marking the first version a message exists in.
pub const MESSAGE_SINCE: &str = "schemata.message_since";
/// Option key marking the first version a message no longer exists in.
pub const MESSAGE_UNTIL: &str = "schemata.message_until";

// =============================================================================
// OptionValue
// =============================================================================

/// An option value in its written form.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptionValue {
    /// A scalar or enum constant, as text (`true`, `12`, `SPEED`, `"text"`).
    Scalar(String),
    /// A repeated option.
    List(Vec<OptionValue>),
    /// A message-typed option.
    Message(Options),
}

impl OptionValue {
    /// Returns the scalar text, if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a short description of the value's shape for diagnostics.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::List(_) => "list",
            Self::Message(_) => "message",
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        Self::Scalar(b.to_string())
    }
}

impl From<Options> for OptionValue {
    fn from(options: Options) -> Self {
        Self::Message(options)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Message(options) => write!(f, "{options}"),
        }
    }
}

// =============================================================================
// Options
// =============================================================================

/// A string-keyed option map.
///
/// Keys are stored without surrounding parentheses, so `(pkg.opt)` and
/// `pkg.opt` name the same option.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Options(BTreeMap<String, OptionValue>);

impl Options {
    /// Creates an empty option map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method adding an option.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets an option, replacing any previous value.
    pub fn insert(&mut self, key: &str, value: impl Into<OptionValue>) {
        self.0.insert(normalize_key(key).to_string(), value.into());
    }

    /// Looks up an option by key (parentheses optional).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(normalize_key(key))
    }

    /// Looks up a scalar option's text.
    #[must_use]
    pub fn get_scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_scalar)
    }

    /// Iterates over options in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the option keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Keeps only the options for which the predicate returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &OptionValue) -> bool) {
        self.0.retain(|k, v| keep(k, v));
    }

    /// Returns the number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no options are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

impl<K: AsRef<str>, V: Into<OptionValue>> FromIterator<(K, V)> for Options {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut options = Self::new();
        for (key, value) in iter {
            options.insert(key.as_ref(), value);
        }
        options
    }
}

/// Strips the parentheses that mark an extension option.
#[must_use]
pub fn normalize_key(key: &str) -> &str {
    key.strip_prefix('(')
        .and_then(|k| k.strip_suffix(')'))
        .unwrap_or(key)
}

// =============================================================================
// OptionsKind
// =============================================================================

/// Which options message an option bag is interpreted against.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OptionsKind {
    /// `google.protobuf.FileOptions`
    File,
    /// `google.protobuf.MessageOptions`
    Message,
    /// `google.protobuf.FieldOptions`
    Field,
    /// `google.protobuf.OneofOptions`
    OneOf,
    /// `google.protobuf.EnumOptions`
    Enum,
    /// `google.protobuf.EnumValueOptions`
    EnumValue,
    /// `google.protobuf.ServiceOptions`
    Service,
    /// `google.protobuf.MethodOptions`
    Method,
}

impl OptionsKind {
    /// Returns the qualified name of the options message.
    #[must_use]
    pub const fn message_name(self) -> &'static str {
        match self {
            Self::File => "google.protobuf.FileOptions",
            Self::Message => "google.protobuf.MessageOptions",
            Self::Field => "google.protobuf.FieldOptions",
            Self::OneOf => "google.protobuf.OneofOptions",
            Self::Enum => "google.protobuf.EnumOptions",
            Self::EnumValue => "google.protobuf.EnumValueOptions",
            Self::Service => "google.protobuf.ServiceOptions",
            Self::Method => "google.protobuf.MethodOptions",
        }
    }

    /// Returns the options message as a type name.
    #[must_use]
    pub fn type_name(self) -> TypeName {
        TypeName::Named(self.message_name().into())
    }
}
