//! Manifest-driven compile runs

use schemata::compiler::{CompilerConfig, compile_manifest};
use schemata::rules::Manifest;

use crate::fixtures::{catalog, t};

const MANIFEST: &str = "\
money:
  roots: [money.*]
catalog:
  dependencies: [money]
  roots: [catalog.Catalog]
billing:
  dependencies: [catalog]
  roots: [billing.Invoice]
  prunes: [catalog.Product#attributes]
";

#[test]
fn each_module_gets_its_own_output() {
    let manifest = Manifest::parse(MANIFEST).unwrap();
    let outputs = compile_manifest(&manifest, &catalog(), &CompilerConfig::new()).unwrap();

    let names: Vec<&str> = outputs.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["money", "catalog", "billing"]);

    let (_, money) = &outputs[0];
    assert!(money.schema.contains_type(&t("money.Rate")));
    assert!(!money.schema.contains_type(&t("catalog.Product")));

    let (_, billing) = &outputs[2];
    let product = billing.schema.get_message(&t("catalog.Product")).unwrap();
    assert!(product.field("attributes").is_none());
    assert!(!billing.schema.contains_type(&t("catalog.Attribute")));
}

#[test]
fn module_failures_name_the_module() {
    let manifest = Manifest::parse("broken:\n  roots: [a.*]\n  prunes: [a.*]\n").unwrap();
    let err = compile_manifest(&manifest, &catalog(), &CompilerConfig::new()).unwrap_err();
    let context = err.context.unwrap();
    assert_eq!(context.stack.first().map(String::as_str), Some("module broken"));
}
