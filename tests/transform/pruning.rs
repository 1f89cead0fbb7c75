//! Integration tests for prune

use schemata_rules::PruningRules;
use schemata_schema::Linker;
use schemata_transform::prune;

use crate::common::{storefront, t};

#[test]
fn roots_keep_their_transitive_closure() {
    let schema = storefront();
    let rules = PruningRules::builder().add_root("shop.Order").build().unwrap();
    let pruned = prune(&schema, &rules);

    for kept in ["shop.Order", "shop.Order.Status", "shop.Customer", "geo.Address"] {
        assert!(pruned.contains_type(&t(kept)), "{kept}");
    }
    for dropped in ["shop.Unused", "geo.Point", "shop.Orders"] {
        assert!(!pruned.contains_type(&t(dropped)), "{dropped}");
    }
    assert_eq!(pruned.file_count(), schema.file_count());
    assert!(Linker::new().add_files(pruned.into_files()).link().is_ok());
}

#[test]
fn service_roots_pull_in_their_messages() {
    let schema = storefront();
    let rules = PruningRules::builder().add_root("shop.Orders").build().unwrap();
    let pruned = prune(&schema, &rules);
    assert!(pruned.contains_type(&t("shop.Order")));
    assert!(pruned.contains_type(&t("geo.Address")));
    assert!(!pruned.contains_type(&t("shop.Unused")));
}

#[test]
fn pruned_fields_release_their_imports() {
    let schema = storefront();
    let rules = PruningRules::builder()
        .add_root("shop.Order")
        .add_prune("shop.Customer#address")
        .build()
        .unwrap();
    let pruned = prune(&schema, &rules);

    let customer = pruned.get_message(&t("shop.Customer")).unwrap();
    assert!(customer.field("address").is_none());
    assert!(!pruned.contains_type(&t("geo.Address")));
    assert!(pruned.file("shop/customer.proto").unwrap().imports.is_empty());
    assert_eq!(
        pruned.file("shop/order.proto").unwrap().imports,
        vec!["shop/customer.proto".to_string()]
    );
}

#[test]
fn package_prunes_cut_references() {
    let schema = storefront();
    let rules = PruningRules::builder().add_prune("geo.*").build().unwrap();
    let pruned = prune(&schema, &rules);
    assert!(pruned.file("geo/geo.proto").unwrap().is_empty());
    assert!(pruned.get_message(&t("shop.Customer")).unwrap().fields.is_empty());
    assert!(pruned.contains_type(&t("shop.Unused")));
}
