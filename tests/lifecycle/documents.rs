//! Document revisions, removal and refresh

use crate::common::*;

#[test]
fn replace_keeps_old_revision_for_holder() {
    let engine = manual_engine();
    let (_db, c) = populate(&engine, "X", 1);
    let before = engine.fetch_document(&c, "test0").unwrap();

    let meta = c.replace("test0", json!({ "value": 100 })).unwrap();

    assert_eq!(before.get("value"), Some(&json!(0)));
    assert!(before.is_dropped());
    let after = engine.refresh_document(&before).unwrap();
    assert_eq!(after.get("value"), Some(&json!(100)));
    assert_eq!(after.revision(), meta.revision);
    assert!(!after.is_dropped());
}

#[test]
fn old_revision_reclaimed_after_release() {
    let engine = manual_engine();
    let (_db, c) = populate(&engine, "X", 1);
    let before = engine.fetch_document(&c, "test0").unwrap();
    let old = before.resource().clone();
    c.replace("test0", json!({ "value": 1 })).unwrap();

    assert_eq!(engine.sweep_now().skipped, 1);
    drop(before);
    assert_eq!(engine.sweep_now().reclaimed, 1);
    assert!(old.is_reclaimed());
    assert_eq!(c.count(), 1);
}

#[test]
fn remove_then_refresh_is_not_found() {
    let engine = manual_engine();
    let (_db, c) = populate(&engine, "X", 2);
    let held = engine.fetch_document(&c, "test1").unwrap();

    c.remove("test1").unwrap();

    assert_eq!(c.keys(), vec!["test0"]);
    assert_eq!(held.get("value"), Some(&json!(1)));
    let err = engine.refresh_document(&held).unwrap_err();
    assert!(matches!(
        err,
        ReclaimError::NotFound {
            kind: ResourceKind::Document,
            ..
        }
    ));
}

#[test]
fn refresh_after_database_drop_is_not_found() {
    let engine = manual_engine();
    let (_db, c) = populate(&engine, "X", 1);
    let held = engine.fetch_document(&c, "test0").unwrap();
    engine.drop_database("X").unwrap();

    assert!(engine.refresh_document(&held).unwrap_err().is_not_found());
    assert_eq!(held.get("value"), Some(&json!(0)));
}

#[test]
fn generated_keys_are_unique() {
    let engine = manual_engine();
    let (_db, c) = populate(&engine, "X", 0);
    let mut keys: Vec<String> = (0..50)
        .map(|i| c.insert(json!({ "n": i })).unwrap().key)
        .collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 50);
    assert_eq!(c.count(), 50);
}

#[test]
fn document_handle_reads_body() {
    let engine = manual_engine();
    let (_db, c) = populate(&engine, "X", 0);
    c.save("doc", json!({ "value": "v", "nested": { "a": [1, 2] } }))
        .unwrap();

    let doc = engine.fetch_document(&c, "doc").unwrap();
    assert_eq!(doc.kind(), ResourceKind::Document);
    assert_eq!(doc.key(), "doc");
    assert_eq!(doc.get("nested"), Some(&json!({ "a": [1, 2] })));
    assert_eq!(doc.body()["value"], json!("v"));
}

#[test]
fn invalid_key_rejected() {
    let engine = manual_engine();
    let (_db, c) = populate(&engine, "X", 0);
    assert!(matches!(
        c.save("no spaces", json!({})),
        Err(ReclaimError::InvalidName {
            kind: ResourceKind::Document,
            ..
        })
    ));
    assert!(matches!(
        c.save("", json!({})),
        Err(ReclaimError::InvalidName { .. })
    ));
}
