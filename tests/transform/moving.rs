//! Integration tests for TypeMover

use schemata_rules::PruningRules;
use schemata_schema::Linker;
use schemata_transform::{Move, TypeMover, prune};

use crate::common::{storefront, t};

#[test]
fn moving_repairs_importers() {
    let schema = storefront();
    let moved = TypeMover::new(&schema)
        .add(Move::new(t("shop.Customer"), "shop/order.proto"))
        .apply()
        .unwrap();

    assert_eq!(moved.path_of(&t("shop.Customer")), Some("shop/order.proto"));
    assert!(moved.file("shop/customer.proto").unwrap().is_empty());
    assert_eq!(
        moved.file("shop/order.proto").unwrap().imports,
        vec!["geo/geo.proto".to_string()]
    );
    assert_eq!(moved.file("geo/geo.proto"), schema.file("geo/geo.proto"));
    assert!(Linker::new().add_files(moved.into_files()).link().is_ok());
}

#[test]
fn moves_compose_with_pruning() {
    let schema = storefront();
    let rules = PruningRules::builder().add_root("shop.Orders").build().unwrap();
    let pruned = prune(&schema, &rules);
    let moved = TypeMover::new(&pruned)
        .add(Move::new(t("shop.Orders"), "shop/service.proto"))
        .apply()
        .unwrap();

    let service_file = moved.file("shop/service.proto").unwrap();
    assert_eq!(service_file.package.as_deref(), Some("shop"));
    assert_eq!(service_file.imports, vec!["shop/order.proto".to_string()]);
    assert!(moved.file("shop/order.proto").unwrap().services.is_empty());
}

#[test]
fn invalid_moves_leave_nothing_half_done() {
    let schema = storefront();
    let err = TypeMover::new(&schema)
        .add(Move::new(t("shop.Order.Status"), "shop/status.proto"))
        .add(Move::new(t("shop.Unused"), "geo/geo.proto"))
        .add(Move::new(t("shop.Unused"), "shop/customer.proto"))
        .apply()
        .unwrap_err();

    let messages = err.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[0].contains("only top-level types can be moved"));
    assert!(messages[1].contains("package geo does not match shop"));
    assert!(messages[2].contains("moved more than once"));
}
