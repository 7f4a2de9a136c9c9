//! Active-database context

use crate::common::*;

#[test]
fn cannot_drop_while_inside_a_database() {
    let engine = manual_engine();
    let mut session = Session::new(engine).unwrap();
    session.create_database("X").unwrap();
    session.use_database("X").unwrap();

    let err = session.drop_database("X").unwrap_err();
    assert!(matches!(err, ReclaimError::Forbidden(_)));
    assert!(session.list_databases().contains(&"X".to_string()));

    session.use_database("_system").unwrap();
    session.drop_database("X").unwrap();
    assert!(!session.list_databases().contains(&"X".to_string()));
}

#[test]
fn system_database_cannot_be_dropped() {
    let engine = manual_engine();
    let session = Session::new(engine).unwrap();
    let err = session.drop_database("_system").unwrap_err();
    assert!(matches!(err, ReclaimError::Forbidden(_)));
    assert_eq!(session.list_databases(), vec!["_system"]);
}

#[test]
fn sessions_share_the_catalog() {
    let engine = manual_engine();
    let mut a = Session::new(engine.clone()).unwrap();
    let b = Session::new(engine.clone()).unwrap();

    let name = unique_name("shared");
    a.create_database(&name).unwrap();
    a.use_database(&name).unwrap();
    assert!(b.list_databases().contains(&name));

    b.drop_database(&name).unwrap();
    assert!(a.current().is_dropped());
    assert_eq!(a.current_name(), name);
    assert!(a.use_database(&name).unwrap_err().is_not_found());
}

#[test]
fn session_context_released_on_drop() {
    let engine = manual_engine();
    let db = engine.create_database("X").unwrap();
    {
        let mut session = Session::new(engine.clone()).unwrap();
        session.use_database("X").unwrap();
        assert_eq!(db.refcount(), 3);
    }
    assert_eq!(db.refcount(), 2);
}
