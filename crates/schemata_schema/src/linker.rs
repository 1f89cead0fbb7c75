//! Linking raw declarations into a closed, validated schema.
//!
//! The front end hands over files whose field, rpc, and extendee types are
//! written as in source: possibly relative to the enclosing scope. Linking
//! resolves each of them to a declared type visible from its file, checks the
//! schema-wide invariants, and reports every problem at once.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use schemata_foundation::{Error, Result, TypeName};
use tracing::debug;

use crate::builtin;
use crate::declaration::{Declaration, Field, Label, MessageType, TagRange};
use crate::file::{ProtoFile, Syntax};
use crate::schema::Schema;

/// Builds a [`Schema`] from unlinked files.
#[derive(Debug, Default)]
pub struct Linker {
    files: Vec<ProtoFile>,
}

impl Linker {
    /// Creates a linker with no files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    #[must_use]
    pub fn add_file(mut self, file: ProtoFile) -> Self {
        self.files.push(file);
        self
    }

    /// Adds several files.
    #[must_use]
    pub fn add_files(mut self, files: impl IntoIterator<Item = ProtoFile>) -> Self {
        self.files.extend(files);
        self
    }

    /// Resolves every reference and validates the result.
    ///
    /// Built-in files are added unless a file with the same path was supplied.
    ///
    /// # Errors
    ///
    /// Returns an aggregated error listing every duplicate path, duplicate
    /// type, unknown import, unresolved or invisible reference, and invalid
    /// field found.
    pub fn link(self) -> Result<Schema> {
        let mut files = self.files;
        for file in builtin::files() {
            if !files.iter().any(|f| f.path == file.path) {
                files.push(file);
            }
        }

        let mut errors = Vec::new();
        check_paths_and_types(&files, &mut errors);

        let index = Schema::from_linked_files(files.clone());
        for file in &files {
            for import in file.all_imports() {
                if index.file(import).is_none() {
                    errors.push(format!("{} imports unknown file {import}", file.path));
                }
            }
        }

        for file in &mut files {
            let mut resolver = Resolver {
                index: &index,
                path: file.path.clone(),
                syntax: file.syntax,
                visible: index.visible_paths(&file.path),
                errors: &mut errors,
            };
            resolver.link_file(file);
        }

        Error::aggregate("link", errors)?;

        let schema = Schema::from_linked_files(files);
        debug!(
            files = schema.file_count(),
            types = schema.type_names().len(),
            "linked schema"
        );
        Ok(schema)
    }
}

fn check_paths_and_types(files: &[ProtoFile], errors: &mut Vec<String>) {
    let mut paths = BTreeSet::new();
    let mut declared: HashMap<TypeName, &str> = HashMap::new();
    for file in files {
        if !paths.insert(file.path.as_str()) {
            errors.push(format!("duplicate file path {}", file.path));
            continue;
        }
        for name in file.type_names() {
            if let Some(first) = declared.insert(name.clone(), &file.path) {
                errors.push(
                    Error::new(schemata_foundation::ErrorKind::DuplicateType {
                        name: name.to_string(),
                        first: first.to_string(),
                        second: file.path.clone(),
                    })
                    .to_string(),
                );
            }
        }
    }
}

struct Resolver<'a> {
    index: &'a Schema,
    path: String,
    syntax: Syntax,
    visible: BTreeSet<String>,
    errors: &'a mut Vec<String>,
}

impl Resolver<'_> {
    fn link_file(&mut self, file: &mut ProtoFile) {
        let package = file.package.clone().unwrap_or_default();

        for declaration in &mut file.declarations {
            self.link_declaration(declaration);
        }

        for service in &mut file.services {
            for rpc in &mut service.rpcs {
                let referrer = format!("{}#{}", service.name, rpc.name);
                for type_name in [&mut rpc.request, &mut rpc.response] {
                    if let Some(resolved) = self.resolve(type_name, &package, &referrer) {
                        if self.index.get_message(&resolved).is_none() {
                            self.error(format!("{referrer}: {resolved} is not a message"));
                        }
                        *type_name = resolved;
                    }
                }
            }
        }

        for extend in &mut file.extends {
            let referrer = format!("extend {}", extend.extendee);
            let Some(extendee) = self.resolve(&extend.extendee, &package, &referrer) else {
                continue;
            };
            let Some(target) = self.index.get_message(&extendee) else {
                self.error(format!("{referrer}: {extendee} is not a message"));
                continue;
            };
            for field in &mut extend.fields {
                if !target.accepts_extension(field.tag) {
                    self.error(format!(
                        "extension {} uses tag {} outside the extension ranges of {extendee}",
                        field.name, field.tag
                    ));
                }
                let referrer = format!("{extendee}#{}", field.name);
                self.link_field(field, &package, &referrer);
            }
            extend.extendee = extendee;
        }
    }

    fn link_declaration(&mut self, declaration: &mut Declaration) {
        match declaration {
            Declaration::Message(message) => {
                let scope = message.name.to_string();
                for field in message.all_fields_mut() {
                    let referrer = format!("{scope}#{}", field.name);
                    self.link_field(field, &scope, &referrer);
                }
                self.validate_message(message);
                for nested in &mut message.nested {
                    self.link_declaration(nested);
                }
            }
            Declaration::Enum(enum_type) => {
                if self.syntax == Syntax::Proto3
                    && enum_type.constants.first().is_some_and(|c| c.tag != 0)
                {
                    self.error(format!(
                        "proto3 enum {} must start with a zero constant",
                        enum_type.name
                    ));
                }
            }
            Declaration::Enclosing(enclosing) => {
                for nested in &mut enclosing.nested {
                    self.link_declaration(nested);
                }
            }
        }
    }

    fn link_field(&mut self, field: &mut Field, scope: &str, referrer: &str) {
        if let Some(resolved) = self.resolve(&field.type_name, scope, referrer) {
            if let Some(named) = resolved.referenced_named() {
                if self.index.get_service(named).is_some() {
                    self.error(format!("{referrer}: {named} is a service"));
                }
            }
            field.type_name = resolved;
        }
    }

    fn validate_message(&mut self, message: &MessageType) {
        let mut tags: BTreeMap<u32, &str> = BTreeMap::new();
        let mut names = BTreeSet::new();
        for field in message.all_fields() {
            if field.tag == 0 || i64::from(field.tag) > i64::from(TagRange::MAX_TAG) {
                self.error(format!("{}#{}: tag {} is out of range", message.name, field.name, field.tag));
            }
            if let Some(other) = tags.insert(field.tag, &field.name) {
                self.error(format!(
                    "{}: tag {} is used by both {other} and {}",
                    message.name, field.tag, field.name
                ));
            }
            if !names.insert(field.name.as_str()) {
                self.error(format!("{}: duplicate field {}", message.name, field.name));
            }
            if field.is_map() && matches!(field.label, Label::Repeated | Label::OneOf) {
                self.error(format!(
                    "{}#{}: map fields cannot be repeated or part of a one-of",
                    message.name, field.name
                ));
            }
            if self.syntax == Syntax::Proto3 && field.label == Label::Required {
                self.error(format!(
                    "{}#{}: required fields are not allowed in proto3",
                    message.name, field.name
                ));
            }
        }
    }

    /// Resolves a type written relative to `scope`, recording an error on failure.
    fn resolve(&mut self, type_name: &TypeName, scope: &str, referrer: &str) -> Option<TypeName> {
        match type_name {
            TypeName::Scalar(_) => Some(type_name.clone()),
            TypeName::Map { key, value } => {
                let value = self.resolve(value, scope, referrer)?;
                Some(TypeName::Map {
                    key: *key,
                    value: Box::new(value),
                })
            }
            TypeName::Named(written) => {
                let Some(resolved) = self.lookup(written, scope) else {
                    self.error(Error::unresolved_type(written.to_string(), referrer).to_string());
                    return None;
                };
                if let Some(path) = self.index.path_of(&resolved) {
                    if !self.visible.contains(path) {
                        self.error(format!(
                            "{referrer}: {resolved} is declared in {path}, which {} does not import",
                            self.path
                        ));
                    }
                }
                Some(resolved)
            }
        }
    }

    /// Searches the scope and each enclosing scope, innermost first.
    fn lookup(&self, written: &str, scope: &str) -> Option<TypeName> {
        if let Some(absolute) = written.strip_prefix('.') {
            let candidate = TypeName::Named(absolute.into());
            return self.index.contains_type(&candidate).then_some(candidate);
        }
        let mut prefix = scope;
        loop {
            let candidate = if prefix.is_empty() {
                TypeName::Named(written.into())
            } else {
                TypeName::Named(format!("{prefix}.{written}").into())
            };
            if self.index.contains_type(&candidate) {
                return Some(candidate);
            }
            if prefix.is_empty() {
                return None;
            }
            prefix = prefix.rfind('.').map_or("", |dot| &prefix[..dot]);
        }
    }

    fn error(&mut self, message: String) {
        self.errors.push(format!("{}: {message}", self.path));
    }
}
