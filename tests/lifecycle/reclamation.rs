//! Eventual reclamation, refcount accounting and independent lifetimes

use crate::common::*;
use std::time::Duration;

#[test]
fn released_database_is_reclaimed() {
    let engine = fast_engine();
    let (db, c) = populate(&engine, "X", 10);
    let resource = db.resource().clone();
    engine.drop_database("X").unwrap();

    engine.release(c).unwrap();
    engine.release(db).unwrap();

    assert!(wait_until(Duration::from_secs(5), || {
        engine.pending_reclamation() == 0
    }));
    assert_eq!(resource.refcount(), 0);
    assert!(resource.is_reclaimed());
    // purge released the collections index
    assert_eq!(resource.payload().collection_count(), 0);
    // database + collection + ten documents
    assert!(engine.stats().reclaimed >= 12);
}

#[test]
fn held_resources_are_skipped_until_released() {
    let engine = manual_engine();
    let (db, c) = populate(&engine, "X", 2);
    engine.drop_database("X").unwrap();

    let report = engine.sweep_now();
    assert_eq!(report.reclaimed, 2);
    assert_eq!(report.skipped, 2);
    assert_eq!(engine.pending_reclamation(), 2);

    drop(db);
    let report = engine.sweep_now();
    assert_eq!(report.reclaimed, 1);
    assert_eq!(report.skipped, 1);

    drop(c);
    let report = engine.sweep_now();
    assert_eq!(report.reclaimed, 1);
    assert_eq!(engine.pending_reclamation(), 0);
}

#[test]
fn reclamation_happens_once() {
    let engine = manual_engine();
    let (db, c) = populate(&engine, "X", 1);
    drop(c);
    drop(db);
    engine.drop_database("X").unwrap();

    assert_eq!(engine.sweep_now().reclaimed, 3);
    assert_eq!(engine.sweep_now().reclaimed, 0);
    assert_eq!(engine.stats().reclaimed, 3);
}

#[test]
fn unmatched_release_is_invariant_violation() {
    let engine = manual_engine();
    let (_db, c) = populate(&engine, "X", 1);
    let doc = c.document("test0").unwrap();
    assert_eq!(doc.refcount(), 1);

    // give back the handle's reference behind its back
    doc.resource().release_ref().unwrap();
    assert_eq!(doc.refcount(), 0);

    let err = engine.release(doc).unwrap_err();
    assert!(err.is_invariant_violation());
    assert!(!err.is_recoverable());
}

#[test]
fn refcount_tracks_handles() {
    let engine = manual_engine();
    let db = engine.create_database("X").unwrap();
    // catalog + handle
    assert_eq!(db.refcount(), 2);

    let again = engine.open_database("X").unwrap();
    assert_eq!(db.refcount(), 3);
    drop(again);
    assert_eq!(db.refcount(), 2);

    engine.drop_database("X").unwrap();
    assert_eq!(db.refcount(), 1);
}

#[test]
fn child_outlives_reclaimed_parent() {
    let engine = manual_engine();
    let (db, c) = populate(&engine, "X", 3);
    let parent = db.resource().clone();
    drop(db);
    engine.drop_database("X").unwrap();

    engine.sweep_now();
    assert!(parent.is_reclaimed());
    assert!(!c.resource().is_reclaimed());
    assert_eq!(c.count(), 3);
    assert_eq!(c.database_name(), "X");
    assert!(c.database().unwrap_err().is_not_found());
}

#[test]
fn parent_outlives_reclaimed_child() {
    let engine = manual_engine();
    let (db, c) = populate(&engine, "X", 3);
    let child = c.resource().clone();
    drop(c);
    engine.drop_database("X").unwrap();

    engine.sweep_now();
    assert!(child.is_reclaimed());
    assert!(!db.resource().is_reclaimed());
    assert_eq!(db.name(), "X");
}

#[test]
fn dropped_collection_reclaimed_with_database_live() {
    let engine = manual_engine();
    let (db, c) = populate(&engine, "X", 4);
    let collection = c.resource().clone();
    engine.drop_collection(&db, "c").unwrap();
    assert_eq!(c.count(), 4);

    drop(c);
    engine.sweep_now();
    assert!(collection.is_reclaimed());
    assert_eq!(collection.payload().count(), 0);
    assert!(!db.is_dropped());
    assert!(engine.list_databases().contains(&"X".to_string()));
}

#[test]
fn stop_and_restart_reclaimer() {
    let engine = fast_engine();
    engine.reclaimer().stop();
    assert!(!engine.reclaimer().is_running());

    let (db, c) = populate(&engine, "X", 1);
    drop(c);
    drop(db);
    engine.drop_database("X").unwrap();
    let_reclaimer_run();
    assert_eq!(engine.pending_reclamation(), 3);

    engine.reclaimer().start().unwrap();
    assert!(wait_until(Duration::from_secs(5), || {
        engine.pending_reclamation() == 0
    }));
    engine.shutdown();
    assert!(!engine.reclaimer().is_running());
}
