//! Integration tests for plan_targets

use schemata_rules::EmittingRules;
use schemata_transform::{EmitTarget, plan_targets};

use crate::common::{storefront, t};

#[test]
fn exclusive_targets_are_consulted_in_order() {
    let schema = storefront();
    let geo = EmittingRules::builder().include("geo.*").build().unwrap();
    let targets = [
        EmitTarget::new("geo", geo),
        EmitTarget::new("everything", EmittingRules::include_all()),
    ];
    let plans = plan_targets(&schema, &targets);

    assert_eq!(plans[0].types, vec![t("geo.Address"), t("geo.Point")]);
    assert!(!plans[1].types.contains(&t("geo.Address")));
    assert!(plans[1].types.contains(&t("shop.Order")));
    assert!(plans[1].types.contains(&t("shop.Orders")));
    assert!(!plans[1].types.contains(&t("shop.Order.Status")));
}

#[test]
fn builtin_files_are_never_planned() {
    let schema = storefront();
    let plans = plan_targets(&schema, &[EmitTarget::new("all", EmittingRules::include_all())]);
    assert!(plans[0].types.iter().all(|name| !name.to_string().starts_with("google.")));
    assert_eq!(plans[0].types.len(), 6);
}

#[test]
fn shared_targets_see_every_match() {
    let schema = storefront();
    let shop = || EmittingRules::builder().include("shop.*").exclude("shop.Unused").build().unwrap();
    let targets = [
        EmitTarget::new("first", shop()).with_exclusive(false),
        EmitTarget::new("second", shop()),
    ];
    let plans = plan_targets(&schema, &targets);
    assert_eq!(plans[0].types, plans[1].types);
    assert_eq!(plans[0].types.len(), 3);
    assert!(plans[0].unused_includes.is_empty());
}
