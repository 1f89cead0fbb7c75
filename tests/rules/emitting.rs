//! Integration tests for EmittingRules

use schemata_foundation::{MemberName, TypeName};
use schemata_rules::EmittingRules;

fn t(s: &str) -> TypeName {
    TypeName::parse(s).unwrap()
}

#[test]
fn excludes_carve_out_of_includes() {
    let rules = EmittingRules::builder()
        .include("shop.*")
        .exclude("shop.internal.*")
        .include("shop.internal.Audit")
        .build()
        .unwrap();

    assert!(rules.includes_type(&t("shop.Order")));
    assert!(rules.includes_type(&t("shop.v1.Order")));
    assert!(!rules.includes_type(&t("shop.internal.Ledger")));
    assert!(rules.includes_type(&t("shop.internal.Audit")));
    assert!(!rules.includes_type(&t("billing.Invoice")));
}

#[test]
fn exclude_only_rules_include_the_rest() {
    let rules = EmittingRules::builder().exclude("legacy.*").build().unwrap();
    assert!(rules.includes_type(&t("current.Thing")));
    assert!(!rules.includes_type(&t("legacy.Thing")));
    assert!(!rules.includes_type(&t("legacy.Thing.Nested")));
}

#[test]
fn members_follow_their_type_unless_named() {
    let rules = EmittingRules::builder()
        .include("api.User")
        .exclude("api.User#password")
        .build()
        .unwrap();
    let member = |s: &str| MemberName::parse(s).unwrap();
    assert!(rules.includes_member(&member("api.User#name")));
    assert!(!rules.includes_member(&member("api.User#password")));
}

#[test]
fn unused_patterns_are_reported_after_matching() {
    let rules = EmittingRules::builder()
        .includes(["a.*", "b.Only"])
        .excludes(["z.*"])
        .build()
        .unwrap();
    assert_eq!(rules.unused_includes().len(), 2);

    rules.includes_type(&t("a.Thing"));
    assert_eq!(rules.unused_includes(), vec!["b.Only".to_string()]);
    assert_eq!(rules.unused_excludes(), vec!["z.*".to_string()]);
}

#[test]
fn invalid_rule_sets_are_rejected() {
    assert!(EmittingRules::builder().include("a.*").exclude("a.*").build().is_err());
    assert!(EmittingRules::builder().include("a.B").include("a.B").build().is_err());
    assert!(EmittingRules::builder().include("map<string, a.B>").build().is_err());
}
