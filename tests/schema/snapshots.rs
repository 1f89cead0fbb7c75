//! Integration tests for MessagePack snapshots

use schemata_foundation::TypeName;
use schemata_schema::{Linker, MessageType, ProtoFile, Service, Syntax, snapshot};

#[test]
fn snapshots_restore_lookups() {
    let name = |s: &str| TypeName::parse(s).unwrap();
    let schema = Linker::new()
        .add_file(
            ProtoFile::new("s.proto")
                .with_package("s")
                .with_syntax(Syntax::Proto3)
                .with_option("java_package", "com.example.s")
                .with_declaration(MessageType::new(name("s.Req")).with_nested(MessageType::new(name("s.Req.Inner"))))
                .with_service(Service::new(name("s.Api"))),
        )
        .link()
        .unwrap();

    let bytes = snapshot::to_bytes(&schema).unwrap();
    let restored = snapshot::from_bytes(&bytes).unwrap();
    assert_eq!(restored.file_count(), schema.file_count());
    assert_eq!(restored.path_of(&name("s.Req.Inner")), Some("s.proto"));
    assert!(restored.get_service(&name("s.Api")).is_some());
    assert_eq!(restored.file("s.proto").unwrap().syntax, Syntax::Proto3);
}
