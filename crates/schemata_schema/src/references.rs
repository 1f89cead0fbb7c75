//! Structural type references.
//!
//! A declaration references a type when one of its fields (map values
//! included), nested declarations, rpc request/response types, or extension
//! groups names it. Only declared types are collected; scalars are skipped.

use std::collections::BTreeSet;

use schemata_foundation::TypeName;

use crate::declaration::{Declaration, Field};
use crate::file::{Extend, ProtoFile};
use crate::service::Service;

fn add_field(field: &Field, out: &mut BTreeSet<TypeName>) {
    if let Some(named) = field.type_name.referenced_named() {
        out.insert(named.clone());
    }
}

impl Declaration {
    /// Collects the types referenced by this declaration and its nested declarations.
    pub fn collect_references(&self, out: &mut BTreeSet<TypeName>) {
        if let Declaration::Message(message) = self {
            for field in message.all_fields() {
                add_field(field, out);
            }
        }
        for nested in self.nested() {
            nested.collect_references(out);
        }
    }

    /// Returns the types referenced by this declaration and its nested declarations.
    #[must_use]
    pub fn references(&self) -> BTreeSet<TypeName> {
        let mut out = BTreeSet::new();
        self.collect_references(&mut out);
        out
    }
}

impl Service {
    /// Collects the request and response types of every rpc.
    pub fn collect_references(&self, out: &mut BTreeSet<TypeName>) {
        for rpc in &self.rpcs {
            for type_name in [&rpc.request, &rpc.response] {
                if let Some(named) = type_name.referenced_named() {
                    out.insert(named.clone());
                }
            }
        }
    }
}

impl Extend {
    /// Collects the extendee and the types of the extension fields.
    pub fn collect_references(&self, out: &mut BTreeSet<TypeName>) {
        out.insert(self.extendee.clone());
        for field in &self.fields {
            add_field(field, out);
        }
    }
}

impl ProtoFile {
    /// Returns every type referenced anywhere in the file, its own types included.
    #[must_use]
    pub fn references(&self) -> BTreeSet<TypeName> {
        let mut out = BTreeSet::new();
        for declaration in &self.declarations {
            declaration.collect_references(&mut out);
        }
        for service in &self.services {
            service.collect_references(&mut out);
        }
        for extend in &self.extends {
            extend.collect_references(&mut out);
        }
        out
    }

    /// Returns the types referenced by the file that it does not declare itself.
    #[must_use]
    pub fn external_references(&self) -> BTreeSet<TypeName> {
        let own: BTreeSet<TypeName> = self.type_names().into_iter().collect();
        self.references()
            .into_iter()
            .filter(|t| !own.contains(t))
            .collect()
    }
}
