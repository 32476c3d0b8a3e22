//! Tests for the validating store API

use rstest::rstest;

use treestore::{Item, ItemId, ItemPatch, StoreError, TreeStore};

fn id(raw: &str) -> ItemId {
    raw.parse().unwrap()
}

fn tree() -> TreeStore {
    TreeStore::try_new(vec![Item::root(1), Item::child(2, 1), Item::child(3, 2)]).unwrap()
}

#[test]
fn given_clean_input_when_try_new_then_builds_with_paths() {
    let store = tree();
    assert_eq!(store.len(), 3);
    assert_eq!(
        store.get_item(&id("3")).unwrap().path,
        vec![id("1"), id("2"), id("3")]
    );
    assert!(store.integrity_issues().is_empty());
}

#[rstest]
#[case(vec![Item::root(1), Item::root(1)], StoreError::DuplicateId(ItemId::Int(1)))]
#[case(
    vec![Item::root(1), Item::child(2, 7)],
    StoreError::OrphanedParent { id: ItemId::Int(2), parent: ItemId::Int(7) }
)]
#[case(vec![Item::child(1, 2), Item::child(2, 1)], StoreError::CycleDetected(ItemId::Int(1)))]
fn given_malformed_input_when_try_new_then_reports_first_problem(
    #[case] items: Vec<Item>,
    #[case] expected: StoreError,
) {
    assert_eq!(TreeStore::try_new(items).unwrap_err(), expected);
}

#[test]
fn given_taken_id_when_try_add_then_duplicate_error() {
    let mut store = tree();
    assert_eq!(
        store.try_add_item(Item::child(2, 3)),
        Err(StoreError::DuplicateId(id("2")))
    );
    assert_eq!(store.get_item(&id("2")).unwrap().parent, Some(id("1")));
}

#[test]
fn given_missing_parent_when_try_add_then_orphan_error_and_no_insert() {
    let mut store = tree();
    let err = store.try_add_item(Item::child(9, 404)).unwrap_err();

    assert_eq!(
        err,
        StoreError::OrphanedParent {
            id: id("9"),
            parent: id("404")
        }
    );
    assert!(!store.contains(&id("9")));
    assert_eq!(err.to_string(), "item 9 references missing parent 404");
}

#[test]
fn given_valid_item_when_try_add_then_inserted_with_path() {
    let mut store = tree();
    store.try_add_item(Item::child(4, 3)).unwrap();
    assert_eq!(
        store.get_item(&id("4")).unwrap().path,
        vec![id("1"), id("2"), id("3"), id("4")]
    );
}

#[test]
fn given_unknown_id_when_try_update_then_not_found() {
    let mut store = tree();
    assert_eq!(
        store.try_update_item(ItemPatch::new(42)),
        Err(StoreError::NotFound(id("42")))
    );
}

#[test]
fn given_parent_is_own_orphaned_descendant_when_try_add_then_cycle_error() {
    let mut store = TreeStore::new(vec![Item::child(2, 1), Item::child(3, 2)]);

    assert_eq!(
        store.try_add_item(Item::child(1, 3)),
        Err(StoreError::CycleDetected(id("1")))
    );
    assert!(!store.contains(&id("1")));
    assert_eq!(store.len(), 2);
}

#[test]
fn given_cyclic_reparent_when_try_update_then_cycle_error() {
    let mut store = tree();
    assert_eq!(
        store.try_update_item(ItemPatch::new(1).with_parent(Some(id("3")))),
        Err(StoreError::CycleDetected(id("1")))
    );
    assert!(store.get_item(&id("1")).unwrap().is_root());
}

#[test]
fn given_missing_new_parent_when_try_update_then_orphan_error() {
    let mut store = tree();
    assert!(matches!(
        store.try_update_item(ItemPatch::new(3).with_parent(Some(id("404")))),
        Err(StoreError::OrphanedParent { .. })
    ));
    assert_eq!(store.get_item(&id("3")).unwrap().parent, Some(id("2")));
}

#[test]
fn given_same_parent_when_try_update_then_fields_merge_without_reparent() {
    let mut store = tree();
    store
        .try_update_item(
            ItemPatch::new(3)
                .with_parent(Some(id("2")))
                .with_field("label", "three"),
        )
        .unwrap();

    let item = store.get_item(&id("3")).unwrap();
    assert_eq!(item.label(), Some("three"));
    assert_eq!(item.path, vec![id("1"), id("2"), id("3")]);
}

#[test]
fn given_lenient_store_with_orphan_when_checking_integrity_then_orphan_is_reported() {
    let store = TreeStore::new(vec![Item::root(1), Item::child(2, 99)]);

    assert_eq!(
        store.integrity_issues(),
        vec![StoreError::OrphanedParent {
            id: id("2"),
            parent: id("99")
        }]
    );
}
