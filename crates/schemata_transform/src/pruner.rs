//! Tree-shaking.
//!
//! Pruning runs in two phases. Marking walks outward from the roots: a marked
//! type marks all of its members, and a marked member marks the types it
//! refers to and the option fields its options use. Retaining then rebuilds
//! every file from what was marked. A type that is only present because one of
//! its members was marked keeps just those members; a type that was not marked
//! but has marked nested types survives as an [`EnclosingType`].

use std::collections::{HashSet, VecDeque};

use schemata_foundation::{MemberName, MemberPath, TypeName};
use schemata_rules::PruningRules;
use schemata_schema::options::{
    CONSTANT_SINCE, CONSTANT_UNTIL, FIELD_SINCE, FIELD_UNTIL, MESSAGE_SINCE, MESSAGE_UNTIL,
};
use schemata_schema::{
    Declaration, EnclosingType, EnumConstant, EnumType, Extend, Field, MessageType, OneOf,
    OptionValue, Options, OptionsKind, ProtoFile, Rpc, Schema, Service,
};
use tracing::debug;

/// Returns the part of `schema` reachable from the roots of `rules`.
///
/// Files are never removed, though they may end up empty. An import is
/// dropped only if the file used something through it before pruning and no
/// longer does. With empty rules the schema is returned unchanged.
#[must_use]
pub fn prune(schema: &Schema, rules: &PruningRules) -> Schema {
    if rules.is_empty() {
        debug!("no pruning rules; schema unchanged");
        return schema.clone();
    }

    let mut marker = Marker::new(schema, rules);
    marker.seed();
    marker.run();
    let pruned = marker.retain();

    debug!(
        types_before = schema.type_names().len(),
        types_after = pruned.type_names().len(),
        members = marker.members.len(),
        "pruned schema"
    );
    pruned
}

enum Node {
    Type(TypeName),
    Member(MemberName),
}

#[derive(Clone, Copy)]
enum MemberRef<'a> {
    Field(&'a Field),
    Constant(&'a EnumConstant),
    Rpc(&'a Rpc),
}

fn field_member(type_name: &TypeName, field: &Field) -> MemberName {
    MemberName {
        type_name: type_name.clone(),
        member: MemberPath::Simple(field.name.clone()),
    }
}

fn simple_member(type_name: &TypeName, name: &str) -> MemberName {
    MemberName {
        type_name: type_name.clone(),
        member: MemberPath::Simple(name.to_string()),
    }
}

struct Marker<'a> {
    schema: &'a Schema,
    rules: &'a PruningRules,
    /// Types whose members have all been offered for marking.
    whole: HashSet<TypeName>,
    /// Types that survive, wholly or with only some members.
    present: HashSet<TypeName>,
    members: HashSet<MemberName>,
    queue: VecDeque<Node>,
    files_with_options: HashSet<String>,
}

impl<'a> Marker<'a> {
    fn new(schema: &'a Schema, rules: &'a PruningRules) -> Self {
        Self {
            schema,
            rules,
            whole: HashSet::new(),
            present: HashSet::new(),
            members: HashSet::new(),
            queue: VecDeque::new(),
            files_with_options: HashSet::new(),
        }
    }

    // =========================================================================
    // Marking
    // =========================================================================

    fn seed(&mut self) {
        for name in self.schema.type_names() {
            if self.rules.is_root_type(&name) {
                self.mark_type(&name);
                continue;
            }
            for member in self.member_names(&name) {
                if self.rules.is_root_member(&member) {
                    self.mark_member(&member);
                }
            }
        }
    }

    /// Drains the queue, then marks the options of files that gained content,
    /// repeating until nothing changes.
    fn run(&mut self) {
        let schema = self.schema;
        loop {
            while let Some(node) = self.queue.pop_front() {
                match node {
                    Node::Type(name) => {
                        for member in self.member_names(&name) {
                            self.mark_member(&member);
                        }
                    }
                    Node::Member(member) => self.visit_member(&member),
                }
            }

            let pending: Vec<&ProtoFile> = schema
                .files()
                .filter(|f| !self.files_with_options.contains(&f.path) && self.has_content(f))
                .collect();
            if pending.is_empty() {
                break;
            }
            for file in pending {
                self.files_with_options.insert(file.path.clone());
                self.mark_options(OptionsKind::File, &file.options);
            }
        }
    }

    fn excludes_type(&self, name: &TypeName) -> bool {
        if self.rules.prunes_type(name) {
            return true;
        }
        self.schema
            .get_message(name)
            .is_some_and(|m| !self.rules.is_retained_version(&m.options, MESSAGE_SINCE, MESSAGE_UNTIL))
    }

    fn mark_type(&mut self, name: &TypeName) {
        if self.whole.contains(name) || self.excludes_type(name) {
            return;
        }
        self.whole.insert(name.clone());
        self.mark_present(name);
        self.queue.push_back(Node::Type(name.clone()));
    }

    fn mark_present(&mut self, name: &TypeName) {
        if !self.present.insert(name.clone()) {
            return;
        }
        let schema = self.schema;
        if let Some(declaration) = schema.get_type(name) {
            match declaration {
                Declaration::Message(message) => {
                    self.mark_options(OptionsKind::Message, &message.options);
                    for one_of in &message.one_ofs {
                        self.mark_options(OptionsKind::OneOf, &one_of.options);
                    }
                }
                Declaration::Enum(enum_type) => self.mark_options(OptionsKind::Enum, &enum_type.options),
                Declaration::Enclosing(_) => {}
            }
        } else if let Some(service) = schema.get_service(name) {
            self.mark_options(OptionsKind::Service, &service.options);
        }
    }

    fn mark_member(&mut self, member: &MemberName) {
        if self.members.contains(member)
            || self.excludes_type(&member.type_name)
            || self.rules.prunes_member(member)
        {
            return;
        }
        let Some(resolved) = self.resolve_member(member) else {
            return;
        };
        let accepted = match resolved {
            MemberRef::Field(field) => {
                self.rules.is_retained_version(&field.options, FIELD_SINCE, FIELD_UNTIL)
                    && !field
                        .type_name
                        .referenced_named()
                        .is_some_and(|t| self.excludes_type(t))
            }
            MemberRef::Constant(constant) => {
                self.rules
                    .is_retained_version(&constant.options, CONSTANT_SINCE, CONSTANT_UNTIL)
            }
            MemberRef::Rpc(rpc) => {
                !self.excludes_type(&rpc.request) && !self.excludes_type(&rpc.response)
            }
        };
        if !accepted {
            return;
        }
        self.members.insert(member.clone());
        self.mark_present(&member.type_name);
        self.queue.push_back(Node::Member(member.clone()));
    }

    fn visit_member(&mut self, member: &MemberName) {
        match self.resolve_member(member) {
            Some(MemberRef::Field(field)) => {
                if let Some(referenced) = field.type_name.referenced_named() {
                    self.mark_type(referenced);
                }
                self.mark_options(OptionsKind::Field, &field.options);
            }
            Some(MemberRef::Constant(constant)) => {
                self.mark_options(OptionsKind::EnumValue, &constant.options);
            }
            Some(MemberRef::Rpc(rpc)) => {
                self.mark_type(&rpc.request);
                self.mark_type(&rpc.response);
                self.mark_options(OptionsKind::Method, &rpc.options);
            }
            None => {}
        }
    }

    fn mark_options(&mut self, kind: OptionsKind, options: &'a Options) {
        self.mark_option_values(&kind.type_name(), options);
    }

    fn mark_option_values(&mut self, options_type: &TypeName, options: &'a Options) {
        let schema = self.schema;
        for (key, value) in options.iter() {
            let Some(field) = schema.resolve_option(options_type, key) else {
                continue;
            };
            self.mark_member(&field.member_name());
            if let (OptionValue::Message(nested), Some(nested_type)) =
                (value, field.field().type_name.referenced_named())
            {
                self.mark_option_values(nested_type, nested);
            }
        }
    }

    fn resolve_member(&self, member: &MemberName) -> Option<MemberRef<'a>> {
        let schema = self.schema;
        if let MemberPath::Simple(simple) = &member.member {
            match schema.get_type(&member.type_name) {
                Some(Declaration::Message(message)) => {
                    if let Some(field) = message.field(simple) {
                        return Some(MemberRef::Field(field));
                    }
                }
                Some(Declaration::Enum(enum_type)) => {
                    return enum_type.constant(simple).map(MemberRef::Constant);
                }
                Some(Declaration::Enclosing(_)) => return None,
                None => {
                    return schema
                        .get_service(&member.type_name)
                        .and_then(|service| service.rpc(simple))
                        .map(MemberRef::Rpc);
                }
            }
        }
        schema
            .extension(&member.type_name, &member.member_str())
            .map(|ext| MemberRef::Field(ext.field))
    }

    fn member_names(&self, name: &TypeName) -> Vec<MemberName> {
        let mut names = Vec::new();
        match self.schema.get_type(name) {
            Some(Declaration::Message(message)) => {
                names.extend(message.all_fields().map(|f| field_member(name, f)));
                names.extend(self.schema.extensions_of(name).iter().map(|ext| ext.member_name()));
            }
            Some(Declaration::Enum(enum_type)) => {
                names.extend(enum_type.constants.iter().map(|c| simple_member(name, &c.name)));
            }
            Some(Declaration::Enclosing(_)) => {}
            None => {
                if let Some(service) = self.schema.get_service(name) {
                    names.extend(service.rpcs.iter().map(|r| simple_member(name, &r.name)));
                }
            }
        }
        names
    }

    fn has_content(&self, file: &ProtoFile) -> bool {
        file.type_names().iter().any(|t| self.present.contains(t))
            || file.extends.iter().any(|extend| {
                extend
                    .fields
                    .iter()
                    .any(|f| self.members.contains(&file.extension_member(&extend.extendee, f)))
            })
    }

    // =========================================================================
    // Retaining
    // =========================================================================

    fn retain(&self) -> Schema {
        Schema::from_linked_files(self.schema.files().map(|file| self.retain_file(file)))
    }

    fn retain_file(&self, file: &ProtoFile) -> ProtoFile {
        let mut pruned = ProtoFile {
            path: file.path.clone(),
            package: file.package.clone(),
            syntax: file.syntax,
            imports: Vec::new(),
            public_imports: file.public_imports.clone(),
            declarations: file
                .declarations
                .iter()
                .filter_map(|d| self.retain_declaration(d))
                .collect(),
            services: file
                .services
                .iter()
                .filter_map(|s| self.retain_service(s))
                .collect(),
            extends: file
                .extends
                .iter()
                .filter_map(|e| self.retain_extend(file, e))
                .collect(),
            options: self.retain_options(OptionsKind::File, &file.options),
        };

        let before = self.schema.file_dependencies(file);
        let after = self.schema.file_dependencies(&pruned);
        pruned.imports = file
            .imports
            .iter()
            .filter(|import| {
                let reachable = self.schema.paths_through_import(import);
                let needed_before = reachable.iter().any(|p| before.contains(p));
                !needed_before || reachable.iter().any(|p| after.contains(p))
            })
            .cloned()
            .collect();
        pruned
    }

    fn retain_declaration(&self, declaration: &Declaration) -> Option<Declaration> {
        match declaration {
            Declaration::Message(message) => {
                let nested: Vec<Declaration> = message
                    .nested
                    .iter()
                    .filter_map(|n| self.retain_declaration(n))
                    .collect();
                if self.present.contains(&message.name) {
                    Some(Declaration::Message(self.retain_message(message, nested)))
                } else if nested.is_empty() {
                    None
                } else {
                    Some(Declaration::Enclosing(EnclosingType {
                        name: message.name.clone(),
                        nested,
                    }))
                }
            }
            Declaration::Enum(enum_type) => self
                .present
                .contains(&enum_type.name)
                .then(|| Declaration::Enum(self.retain_enum(enum_type))),
            Declaration::Enclosing(enclosing) => {
                let nested: Vec<Declaration> = enclosing
                    .nested
                    .iter()
                    .filter_map(|n| self.retain_declaration(n))
                    .collect();
                (self.present.contains(&enclosing.name) || !nested.is_empty()).then(|| {
                    Declaration::Enclosing(EnclosingType {
                        name: enclosing.name.clone(),
                        nested,
                    })
                })
            }
        }
    }

    fn retain_fields(&self, type_name: &TypeName, fields: &[Field]) -> Vec<Field> {
        fields
            .iter()
            .filter(|f| self.members.contains(&field_member(type_name, f)))
            .map(|f| self.retain_field(f))
            .collect()
    }

    fn retain_field(&self, field: &Field) -> Field {
        Field {
            options: self.retain_options(OptionsKind::Field, &field.options),
            ..field.clone()
        }
    }

    fn retain_message(&self, message: &MessageType, nested: Vec<Declaration>) -> MessageType {
        let one_ofs = message
            .one_ofs
            .iter()
            .filter_map(|one_of| {
                let fields = self.retain_fields(&message.name, &one_of.fields);
                (!fields.is_empty()).then(|| OneOf {
                    name: one_of.name.clone(),
                    fields,
                    options: self.retain_options(OptionsKind::OneOf, &one_of.options),
                })
            })
            .collect();
        MessageType {
            name: message.name.clone(),
            fields: self.retain_fields(&message.name, &message.fields),
            one_ofs,
            nested,
            options: self.retain_options(OptionsKind::Message, &message.options),
            extension_ranges: message.extension_ranges.clone(),
            reserved: message.reserved.clone(),
        }
    }

    fn retain_enum(&self, enum_type: &EnumType) -> EnumType {
        EnumType {
            name: enum_type.name.clone(),
            constants: enum_type
                .constants
                .iter()
                .filter(|c| self.members.contains(&simple_member(&enum_type.name, &c.name)))
                .map(|c| EnumConstant {
                    options: self.retain_options(OptionsKind::EnumValue, &c.options),
                    ..c.clone()
                })
                .collect(),
            options: self.retain_options(OptionsKind::Enum, &enum_type.options),
            reserved: enum_type.reserved.clone(),
        }
    }

    fn retain_service(&self, service: &Service) -> Option<Service> {
        if !self.present.contains(&service.name) {
            return None;
        }
        Some(Service {
            name: service.name.clone(),
            rpcs: service
                .rpcs
                .iter()
                .filter(|r| self.members.contains(&simple_member(&service.name, &r.name)))
                .map(|r| Rpc {
                    options: self.retain_options(OptionsKind::Method, &r.options),
                    ..r.clone()
                })
                .collect(),
            options: self.retain_options(OptionsKind::Service, &service.options),
        })
    }

    fn retain_extend(&self, file: &ProtoFile, extend: &Extend) -> Option<Extend> {
        let fields: Vec<Field> = extend
            .fields
            .iter()
            .filter(|f| self.members.contains(&file.extension_member(&extend.extendee, f)))
            .map(|f| self.retain_field(f))
            .collect();
        (!fields.is_empty()).then(|| Extend {
            extendee: extend.extendee.clone(),
            fields,
        })
    }

    /// Drops option entries whose option field was not retained.
    fn retain_options(&self, kind: OptionsKind, options: &Options) -> Options {
        let options_type = kind.type_name();
        let mut kept = options.clone();
        kept.retain(|key, _| {
            self.schema
                .resolve_option(&options_type, key)
                .is_none_or(|field| self.members.contains(&field.member_name()))
        });
        kept
    }
}
