//! The linked schema: every file plus lookup indexes.
//!
//! A [`Schema`] is immutable. Transformations build new files and call
//! [`Schema::from_linked_files`], which rebuilds every index from scratch.
//! Files are held in persistent maps, so untouched files are shared between
//! the old and the new schema.

use std::collections::BTreeSet;
use std::fmt;

use schemata_foundation::{MemberName, TypeName};

use crate::declaration::{Declaration, EnumType, Field, MessageType};
use crate::file::ProtoFile;
use crate::options::{OptionValue, Options, normalize_key};
use crate::service::Service;

#[derive(Clone, Debug)]
enum Position {
    /// Index path from the file's top-level declarations down through nesting.
    Declaration(Vec<usize>),
    Service(usize),
}

#[derive(Clone, Debug)]
struct TypeLocation {
    path: String,
    position: Position,
}

#[derive(Clone, Debug)]
struct ExtensionLocation {
    path: String,
    extend: usize,
    field: usize,
}

// =============================================================================
// Lookup results
// =============================================================================

/// An extension field together with where it is declared.
#[derive(Clone, Debug)]
pub struct ExtensionField<'a> {
    /// The declaring file.
    pub file: &'a ProtoFile,
    /// The extended message.
    pub extendee: &'a TypeName,
    /// The field.
    pub field: &'a Field,
    /// The field's qualified name (`pkg.field`).
    pub qualified_name: String,
}

impl ExtensionField<'_> {
    /// Returns the member name of this field on its extendee.
    #[must_use]
    pub fn member_name(&self) -> MemberName {
        self.file.extension_member(self.extendee, self.field)
    }
}

/// The field definition an option key resolves to.
#[derive(Clone, Debug)]
pub enum OptionField<'a> {
    /// A field declared directly on the options message.
    Standard {
        /// The options message.
        options_type: TypeName,
        /// The field.
        field: &'a Field,
    },
    /// An extension of the options message.
    Extension(ExtensionField<'a>),
}

impl<'a> OptionField<'a> {
    /// Returns the field definition.
    #[must_use]
    pub fn field(&self) -> &'a Field {
        match self {
            Self::Standard { field, .. } => field,
            Self::Extension(ext) => ext.field,
        }
    }

    /// Returns the member name of the option field.
    #[must_use]
    pub fn member_name(&self) -> MemberName {
        match self {
            Self::Standard {
                options_type,
                field,
            } => MemberName {
                type_name: options_type.clone(),
                member: schemata_foundation::MemberPath::Simple(field.name.clone()),
            },
            Self::Extension(ext) => ext.member_name(),
        }
    }

    /// Returns the path of the file declaring an extension option.
    #[must_use]
    pub fn extension_path(&self) -> Option<&'a str> {
        match self {
            Self::Standard { .. } => None,
            Self::Extension(ext) => Some(ext.file.path.as_str()),
        }
    }
}

// =============================================================================
// Schema
// =============================================================================

/// A closed set of files with O(1) lookup from type names to declarations.
#[derive(Clone, Default)]
pub struct Schema {
    files: im::OrdMap<String, ProtoFile>,
    types: im::HashMap<TypeName, TypeLocation>,
    extensions: im::HashMap<TypeName, Vec<ExtensionLocation>>,
}

impl Schema {
    /// Builds a schema from files whose references are already resolved.
    ///
    /// No validation is performed; use [`crate::Linker`] for raw input. When
    /// two files declare the same type, the later path wins the index.
    #[must_use]
    pub fn from_linked_files(files: impl IntoIterator<Item = ProtoFile>) -> Self {
        let files: im::OrdMap<String, ProtoFile> =
            files.into_iter().map(|f| (f.path.clone(), f)).collect();
        Self::index(files)
    }

    fn index(files: im::OrdMap<String, ProtoFile>) -> Self {
        let mut types = im::HashMap::new();
        let mut extensions: im::HashMap<TypeName, Vec<ExtensionLocation>> = im::HashMap::new();

        for (path, file) in &files {
            for (i, declaration) in file.declarations.iter().enumerate() {
                index_declaration(path, declaration, vec![i], &mut types);
            }
            for (i, service) in file.services.iter().enumerate() {
                types.insert(
                    service.name.clone(),
                    TypeLocation {
                        path: path.clone(),
                        position: Position::Service(i),
                    },
                );
            }
            for (e, extend) in file.extends.iter().enumerate() {
                let entry = extensions.entry(extend.extendee.clone()).or_default();
                for f in 0..extend.fields.len() {
                    entry.push(ExtensionLocation {
                        path: path.clone(),
                        extend: e,
                        field: f,
                    });
                }
            }
        }

        Self {
            files,
            types,
            extensions,
        }
    }

    /// Iterates over files in path order.
    pub fn files(&self) -> impl Iterator<Item = &ProtoFile> {
        self.files.values()
    }

    /// Returns the number of files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Looks up a file by path.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&ProtoFile> {
        self.files.get(path)
    }

    /// Consumes the schema, returning its files in path order.
    #[must_use]
    pub fn into_files(self) -> Vec<ProtoFile> {
        self.files.into_iter().map(|(_, f)| f).collect()
    }

    /// Returns true if the type is declared (messages, enums, enclosing types, services).
    #[must_use]
    pub fn contains_type(&self, name: &TypeName) -> bool {
        self.types.contains_key(name)
    }

    /// Returns the path of the file declaring a type.
    #[must_use]
    pub fn path_of(&self, name: &TypeName) -> Option<&str> {
        self.types.get(name).map(|loc| loc.path.as_str())
    }

    /// Returns the file declaring a type.
    #[must_use]
    pub fn file_of(&self, name: &TypeName) -> Option<&ProtoFile> {
        self.path_of(name).and_then(|p| self.files.get(p))
    }

    /// Returns the package of the file declaring a type.
    #[must_use]
    pub fn package_of(&self, name: &TypeName) -> Option<&str> {
        self.file_of(name).map(ProtoFile::package_name)
    }

    /// Looks up a message, enum, or enclosing declaration.
    #[must_use]
    pub fn get_type(&self, name: &TypeName) -> Option<&Declaration> {
        let location = self.types.get(name)?;
        let Position::Declaration(indices) = &location.position else {
            return None;
        };
        let file = self.files.get(&location.path)?;
        let (first, rest) = indices.split_first()?;
        let mut current = file.declarations.get(*first)?;
        for i in rest {
            current = current.nested().get(*i)?;
        }
        Some(current)
    }

    /// Looks up a message.
    #[must_use]
    pub fn get_message(&self, name: &TypeName) -> Option<&MessageType> {
        self.get_type(name).and_then(Declaration::as_message)
    }

    /// Looks up an enum.
    #[must_use]
    pub fn get_enum(&self, name: &TypeName) -> Option<&EnumType> {
        self.get_type(name).and_then(Declaration::as_enum)
    }

    /// Looks up a service.
    #[must_use]
    pub fn get_service(&self, name: &TypeName) -> Option<&Service> {
        let location = self.types.get(name)?;
        let Position::Service(i) = location.position else {
            return None;
        };
        self.files.get(&location.path)?.services.get(i)
    }

    /// Returns every declared type name, in file and declaration order.
    #[must_use]
    pub fn type_names(&self) -> Vec<TypeName> {
        self.files().flat_map(ProtoFile::type_names).collect()
    }

    /// Returns every extension field that extends a message.
    #[must_use]
    pub fn extensions_of(&self, extendee: &TypeName) -> Vec<ExtensionField<'_>> {
        let Some(locations) = self.extensions.get(extendee) else {
            return Vec::new();
        };
        locations
            .iter()
            .filter_map(|loc| {
                let file = self.files.get(&loc.path)?;
                let extend = file.extends.get(loc.extend)?;
                let field = extend.fields.get(loc.field)?;
                Some(ExtensionField {
                    file,
                    extendee: &extend.extendee,
                    field,
                    qualified_name: file.extension_name(field),
                })
            })
            .collect()
    }

    /// Finds an extension field on a message by qualified name.
    #[must_use]
    pub fn extension(&self, extendee: &TypeName, qualified_name: &str) -> Option<ExtensionField<'_>> {
        let qualified_name = qualified_name.strip_prefix('.').unwrap_or(qualified_name);
        self.extensions_of(extendee)
            .into_iter()
            .find(|ext| ext.qualified_name == qualified_name)
    }

    /// Resolves an option key against an options message.
    ///
    /// Fields declared on the options message are tried first, then extensions.
    #[must_use]
    pub fn resolve_option(&self, options_type: &TypeName, key: &str) -> Option<OptionField<'_>> {
        let key = normalize_key(key);
        if let Some(field) = self.get_message(options_type).and_then(|m| m.field(key)) {
            return Some(OptionField::Standard {
                options_type: options_type.clone(),
                field,
            });
        }
        self.extension(options_type, key).map(OptionField::Extension)
    }

    /// Returns the paths of the files a file depends on: those declaring the
    /// types it references and the extensions its options use.
    ///
    /// The file's own path is never included.
    #[must_use]
    pub fn file_dependencies(&self, file: &ProtoFile) -> BTreeSet<String> {
        let mut paths = BTreeSet::new();
        for reference in file.references() {
            if let Some(path) = self.path_of(&reference) {
                paths.insert(path.to_string());
            }
        }
        file.visit_options(&mut |kind, options| {
            self.collect_option_paths(&kind.type_name(), options, &mut paths);
        });
        paths.remove(&file.path);
        paths
    }

    fn collect_option_paths(&self, options_type: &TypeName, options: &Options, paths: &mut BTreeSet<String>) {
        for (key, value) in options.iter() {
            let Some(field) = self.resolve_option(options_type, key) else {
                continue;
            };
            if let Some(path) = field.extension_path() {
                paths.insert(path.to_string());
            }
            if let (OptionValue::Message(nested), Some(nested_type)) =
                (value, field.field().type_name.referenced_named())
            {
                self.collect_option_paths(nested_type, nested, paths);
            }
        }
    }

    /// Returns the paths a file can see: itself, its imports, and public imports
    /// reachable through them.
    #[must_use]
    pub fn visible_paths(&self, path: &str) -> BTreeSet<String> {
        let mut visible = BTreeSet::from([path.to_string()]);
        if let Some(file) = self.files.get(path) {
            for import in file.all_imports() {
                visible.extend(self.paths_through_import(import));
            }
        }
        visible
    }

    /// Returns an imported path plus every path it publicly re-exports, transitively.
    #[must_use]
    pub fn paths_through_import(&self, import: &str) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut queue = vec![import.to_string()];
        while let Some(path) = queue.pop() {
            if !seen.insert(path.clone()) {
                continue;
            }
            if let Some(file) = self.files.get(&path) {
                queue.extend(file.public_imports.iter().cloned());
            }
        }
        seen
    }
}

fn index_declaration(
    path: &str,
    declaration: &Declaration,
    indices: Vec<usize>,
    types: &mut im::HashMap<TypeName, TypeLocation>,
) {
    for (i, nested) in declaration.nested().iter().enumerate() {
        let mut child = indices.clone();
        child.push(i);
        index_declaration(path, nested, child, types);
    }
    types.insert(
        declaration.name().clone(),
        TypeLocation {
            path: path.to_string(),
            position: Position::Declaration(indices),
        },
    );
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.files == other.files
    }
}

impl Eq for Schema {}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("files", &self.files.keys().collect::<Vec<_>>())
            .field("types", &self.types.len())
            .finish()
    }
}
