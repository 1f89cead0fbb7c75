//! Source files: the unit of imports and packages.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use schemata_foundation::{MemberName, MemberPath, TypeName};

use crate::declaration::{Declaration, Field};
use crate::options::{OptionValue, Options, OptionsKind};
use crate::service::Service;

/// Wire-syntax dialect of a file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Syntax {
    /// `proto2`
    #[default]
    Proto2,
    /// `proto3`
    Proto3,
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Proto2 => "proto2",
            Self::Proto3 => "proto3",
        })
    }
}

/// A standalone extension group: fields added to another message.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Extend {
    /// The extended message; relative until linked.
    pub extendee: TypeName,
    /// Extension fields.
    pub fields: Vec<Field>,
}

impl Extend {
    /// Creates an empty extension group.
    #[must_use]
    pub fn new(extendee: TypeName) -> Self {
        Self {
            extendee,
            fields: Vec::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

/// A source file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtoFile {
    /// Path identifier, such as `a/b/c.proto`.
    pub path: String,
    /// Package name.
    pub package: Option<String>,
    /// Wire-syntax dialect.
    pub syntax: Syntax,
    /// Direct imports.
    pub imports: Vec<String>,
    /// Public imports, visible to importers of this file.
    pub public_imports: Vec<String>,
    /// Top-level declarations.
    pub declarations: Vec<Declaration>,
    /// Services.
    pub services: Vec<Service>,
    /// Standalone extension groups.
    pub extends: Vec<Extend>,
    /// File options.
    pub options: Options,
}

impl ProtoFile {
    /// Creates an empty proto2 file.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: None,
            syntax: Syntax::Proto2,
            imports: Vec::new(),
            public_imports: Vec::new(),
            declarations: Vec::new(),
            services: Vec::new(),
            extends: Vec::new(),
            options: Options::new(),
        }
    }

    /// Sets the package.
    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Sets the syntax.
    #[must_use]
    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Adds a direct import.
    #[must_use]
    pub fn with_import(mut self, path: impl Into<String>) -> Self {
        self.imports.push(path.into());
        self
    }

    /// Adds a public import.
    #[must_use]
    pub fn with_public_import(mut self, path: impl Into<String>) -> Self {
        self.public_imports.push(path.into());
        self
    }

    /// Adds a top-level declaration.
    #[must_use]
    pub fn with_declaration(mut self, declaration: impl Into<Declaration>) -> Self {
        self.declarations.push(declaration.into());
        self
    }

    /// Adds a service.
    #[must_use]
    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    /// Adds an extension group.
    #[must_use]
    pub fn with_extend(mut self, extend: Extend) -> Self {
        self.extends.push(extend);
        self
    }

    /// Adds a file option.
    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Iterates over direct and public imports.
    pub fn all_imports(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .chain(&self.public_imports)
            .map(String::as_str)
    }

    /// Returns the package, or the empty string for the default package.
    #[must_use]
    pub fn package_name(&self) -> &str {
        self.package.as_deref().unwrap_or("")
    }

    /// Returns the qualified name of an extension field declared in this file.
    #[must_use]
    pub fn extension_name(&self, field: &Field) -> String {
        match &self.package {
            Some(package) => format!("{package}.{}", field.name),
            None => field.name.clone(),
        }
    }

    /// Returns the member name an extension field has on its extendee.
    #[must_use]
    pub fn extension_member(&self, extendee: &TypeName, field: &Field) -> MemberName {
        let qualified = self.extension_name(field);
        let segments: Vec<String> = qualified.split('.').map(String::from).collect();
        let member = if segments.len() == 1 {
            MemberPath::Simple(qualified)
        } else {
            MemberPath::Qualified(segments)
        };
        MemberName {
            type_name: extendee.clone(),
            member,
        }
    }

    /// Visits every declaration in the file, parents first.
    pub fn walk_declarations<'a>(&'a self, visit: &mut impl FnMut(&'a Declaration)) {
        for declaration in &self.declarations {
            declaration.walk(visit);
        }
    }

    /// Visits every option bag in the file together with the options message
    /// it is interpreted against.
    pub fn visit_options<'a>(&'a self, visit: &mut impl FnMut(OptionsKind, &'a Options)) {
        visit(OptionsKind::File, &self.options);
        self.walk_declarations(&mut |declaration| match declaration {
            Declaration::Message(message) => {
                visit(OptionsKind::Message, &message.options);
                for field in message.all_fields() {
                    visit(OptionsKind::Field, &field.options);
                }
                for one_of in &message.one_ofs {
                    visit(OptionsKind::OneOf, &one_of.options);
                }
            }
            Declaration::Enum(enum_type) => {
                visit(OptionsKind::Enum, &enum_type.options);
                for constant in &enum_type.constants {
                    visit(OptionsKind::EnumValue, &constant.options);
                }
            }
            Declaration::Enclosing(_) => {}
        });
        for service in &self.services {
            visit(OptionsKind::Service, &service.options);
            for rpc in &service.rpcs {
                visit(OptionsKind::Method, &rpc.options);
            }
        }
        for extend in &self.extends {
            for field in &extend.fields {
                visit(OptionsKind::Field, &field.options);
            }
        }
    }

    /// Returns the qualified names of every declared type, services included.
    #[must_use]
    pub fn type_names(&self) -> Vec<TypeName> {
        let mut names = Vec::new();
        self.walk_declarations(&mut |d| names.push(d.name().clone()));
        names.extend(self.services.iter().map(|s| s.name.clone()));
        names
    }

    /// Returns true if the file declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.services.is_empty() && self.extends.is_empty()
    }
}
