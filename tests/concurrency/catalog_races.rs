//! Catalog operations racing each other

use crate::common::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

/// After drop returns, neither list nor lookup may report the name
#[test]
fn dropped_name_never_reappears() {
    let engine = manual_engine();
    let rounds = 200;

    for round in 0..rounds {
        let name = format!("db{}", round);
        engine.create_database(&name).unwrap();

        let barrier = Arc::new(Barrier::new(3));
        let dropped = Arc::new(AtomicBool::new(false));
        let violations = Arc::new(AtomicUsize::new(0));

        let observers: Vec<_> = (0..2)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let barrier = Arc::clone(&barrier);
                let dropped = Arc::clone(&dropped);
                let violations = Arc::clone(&violations);
                let name = name.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..50 {
                        // read the flag first: drop had returned before these calls
                        let after_drop = dropped.load(Ordering::SeqCst);
                        let listed = engine.list_databases().contains(&name);
                        let opened = engine.open_database(&name).is_ok();
                        if after_drop && (listed || opened) {
                            violations.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        barrier.wait();
        engine.drop_database(&name).unwrap();
        dropped.store(true, Ordering::SeqCst);

        for observer in observers {
            observer.join().unwrap();
        }
        assert_eq!(violations.load(Ordering::SeqCst), 0, "round {}", round);
    }
}

/// Exactly one of many concurrent creates of a name succeeds
#[test]
fn concurrent_create_single_winner() {
    let engine = manual_engine();
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let results: Vec<bool> = (0..threads)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                match engine.create_database("Z") {
                    Ok(_) => true,
                    Err(e) => {
                        assert!(e.is_already_exists());
                        false
                    }
                }
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|won| **won).count(), 1);
}

/// Exactly one of many concurrent drops of a name succeeds
#[test]
fn concurrent_drop_single_winner() {
    let engine = manual_engine();
    let threads = 8;

    for round in 0..50 {
        let name = format!("x{}", round);
        engine.create_database(&name).unwrap();
        let barrier = Arc::new(Barrier::new(threads));

        let wins: usize = (0..threads)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let barrier = Arc::clone(&barrier);
                let name = name.clone();
                thread::spawn(move || {
                    barrier.wait();
                    match engine.drop_database(&name) {
                        Ok(()) => 1,
                        Err(e) => {
                            assert!(e.is_not_found());
                            0
                        }
                    }
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap())
            .sum();

        assert_eq!(wins, 1, "round {}", round);
    }

    // every database was buried once and nothing is held
    assert_eq!(engine.pending_reclamation(), 50);
    assert_eq!(engine.sweep_now().reclaimed, 50);
}

/// Churn create/drop on a shared set of names while others list
#[test]
fn create_drop_churn_keeps_catalog_consistent() {
    let engine = fast_engine();
    let threads = 4;
    let barrier = Arc::new(Barrier::new(threads + 1));

    let workers: Vec<_> = (0..threads)
        .map(|t| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..200 {
                    let name = format!("churn{}", (t + i) % 6);
                    match engine.create_database(&name) {
                        Ok(db) => {
                            let _ = engine.create_collection(&db, "c");
                        }
                        Err(e) => assert!(e.is_already_exists()),
                    }
                    if let Err(e) = engine.drop_database(&name) {
                        assert!(e.is_not_found());
                    }
                }
            })
        })
        .collect();

    barrier.wait();
    for _ in 0..500 {
        let names = engine.list_databases();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
    }
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(engine.list_databases(), vec!["_system"]);
    assert!(wait_until(std::time::Duration::from_secs(5), || {
        engine.pending_reclamation() == 0
    }));
}
