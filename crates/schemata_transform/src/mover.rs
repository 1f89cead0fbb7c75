//! Relocating top-level types between files.
//!
//! Moves are applied to a copy of the files, the index is rebuilt from the
//! result, and then imports are repaired in every file that declared,
//! received, or references a moved type. Other files are left untouched.

use std::collections::{BTreeMap, BTreeSet};

use schemata_foundation::{Error, Result, TypeName};
use schemata_schema::{Declaration, ProtoFile, Schema, Service};
use tracing::debug;

/// Moves one top-level type into the file at `target_path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    /// The type to move.
    pub type_name: TypeName,
    /// Path of the destination file; created if absent.
    pub target_path: String,
}

impl Move {
    /// Creates a move directive.
    #[must_use]
    pub fn new(type_name: TypeName, target_path: impl Into<String>) -> Self {
        Self {
            type_name,
            target_path: target_path.into(),
        }
    }
}

enum Moved {
    Declaration(Declaration),
    Service(Service),
}

/// Applies a batch of [`Move`]s to a schema.
#[derive(Debug)]
pub struct TypeMover<'a> {
    schema: &'a Schema,
    moves: Vec<Move>,
}

impl<'a> TypeMover<'a> {
    /// Creates a mover with no moves.
    #[must_use]
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            moves: Vec::new(),
        }
    }

    /// Adds a move.
    #[must_use]
    pub fn add(mut self, type_move: Move) -> Self {
        self.moves.push(type_move);
        self
    }

    /// Adds several moves.
    #[must_use]
    pub fn add_moves(mut self, moves: impl IntoIterator<Item = Move>) -> Self {
        self.moves.extend(moves);
        self
    }

    /// Applies every move and repairs imports.
    ///
    /// # Errors
    ///
    /// Returns an aggregated error naming every move whose type is not
    /// declared, is nested, is moved twice, or whose target file belongs to a
    /// different package. Nothing is moved if any directive is invalid.
    pub fn apply(self) -> Result<Schema> {
        self.validate()?;
        if self.moves.is_empty() {
            return Ok(self.schema.clone());
        }

        let mut files: BTreeMap<String, ProtoFile> = self
            .schema
            .files()
            .map(|f| (f.path.clone(), f.clone()))
            .collect();
        let mut touched = BTreeSet::new();

        for type_move in &self.moves {
            let Some(source_path) = self.schema.path_of(&type_move.type_name) else {
                continue;
            };
            if source_path == type_move.target_path {
                continue;
            }
            let Some(source) = files.get_mut(source_path) else {
                continue;
            };
            let (package, syntax) = (source.package.clone(), source.syntax);
            let Some(moved) = take_type(source, &type_move.type_name) else {
                continue;
            };
            let target = files
                .entry(type_move.target_path.clone())
                .or_insert_with(|| ProtoFile {
                    package,
                    syntax,
                    ..ProtoFile::new(type_move.target_path.clone())
                });
            match moved {
                Moved::Declaration(declaration) => target.declarations.push(declaration),
                Moved::Service(service) => target.services.push(service),
            }
            touched.insert(source_path.to_string());
            touched.insert(type_move.target_path.clone());
        }

        let moved = Schema::from_linked_files(files.values().cloned());
        let moved_types: BTreeSet<&TypeName> = self.moves.iter().map(|m| &m.type_name).collect();
        for file in moved.files() {
            if file.references().iter().any(|r| moved_types.contains(r)) {
                touched.insert(file.path.clone());
            }
        }

        for path in &touched {
            let Some(file) = files.get(path) else {
                continue;
            };
            let imports = self.repair_imports(&moved, file);
            if let Some(file) = files.get_mut(path) {
                file.imports = imports;
            }
        }

        debug!(moves = self.moves.len(), rewritten = touched.len(), "moved types");
        Ok(Schema::from_linked_files(files.into_values()))
    }

    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        let mut seen = BTreeSet::new();
        for type_move in &self.moves {
            let name = &type_move.type_name;
            if !seen.insert(name) {
                errors.push(format!("{name} is moved more than once"));
                continue;
            }
            let Some(source) = self.schema.file_of(name) else {
                errors.push(format!("unable to move {name}: not declared in the schema"));
                continue;
            };
            let top_level = source.declarations.iter().any(|d| d.name() == name)
                || source.services.iter().any(|s| &s.name == name);
            if !top_level {
                errors.push(format!("unable to move {name}: only top-level types can be moved"));
                continue;
            }
            if let Some(target) = self.schema.file(&type_move.target_path) {
                if target.package != source.package {
                    errors.push(format!(
                        "unable to move {name} to {}: package {} does not match {}",
                        type_move.target_path,
                        target.package_name(),
                        source.package_name()
                    ));
                }
            }
        }
        Error::aggregate("move", errors)
    }

    /// Computes the imports `file` needs after the moves.
    ///
    /// An existing import is dropped only if the file used something through
    /// it before the moves and no longer does. Paths the file now depends on
    /// but cannot see are appended.
    fn repair_imports(&self, moved: &Schema, file: &ProtoFile) -> Vec<String> {
        let needed = moved.file_dependencies(file);
        let before = self
            .schema
            .file(&file.path)
            .map(|original| self.schema.file_dependencies(original))
            .unwrap_or_default();

        let mut imports: Vec<String> = file
            .imports
            .iter()
            .filter(|import| **import != file.path)
            .filter(|import| {
                let previously = self.schema.paths_through_import(import);
                let needed_before = previously.iter().any(|p| before.contains(p));
                let still_needed = moved.paths_through_import(import).iter().any(|p| needed.contains(p));
                !needed_before || still_needed
            })
            .cloned()
            .collect();

        let mut visible = BTreeSet::from([file.path.clone()]);
        for import in imports.iter().chain(&file.public_imports) {
            visible.extend(moved.paths_through_import(import));
        }
        for path in needed {
            if !visible.contains(&path) {
                visible.extend(moved.paths_through_import(&path));
                imports.push(path);
            }
        }
        imports
    }
}

fn take_type(file: &mut ProtoFile, name: &TypeName) -> Option<Moved> {
    if let Some(index) = file.declarations.iter().position(|d| d.name() == name) {
        return Some(Moved::Declaration(file.declarations.remove(index)));
    }
    let index = file.services.iter().position(|s| &s.name == name)?;
    Some(Moved::Service(file.services.remove(index)))
}
