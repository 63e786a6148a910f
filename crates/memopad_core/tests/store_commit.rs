use memopad_core::db::{open_db, open_db_in_memory};
use memopad_core::{MemoStore, StoreError};
use rusqlite::Connection;

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(matches!(
        MemoStore::new(conn),
        Err(StoreError::Repo(_))
    ));
}

#[test]
fn pending_allocation_is_invisible_until_committed() {
    let mut store = MemoStore::new(open_db_in_memory().unwrap()).unwrap();

    let mut draft = store.create_pending();
    draft.title = Some("drafted".to_string());
    assert!(store.is_provisional(draft.id));
    assert!(store.fetch_all().unwrap().is_empty());

    store.stage_insert(draft.clone()).unwrap();
    assert!(!store.is_provisional(draft.id));
    assert!(store.fetch_all().unwrap().is_empty());

    store.commit().unwrap();
    let fetched = store.fetch_all().unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, draft.id);
}

#[test]
fn unstaged_allocation_never_surfaces() {
    let mut store = MemoStore::new(open_db_in_memory().unwrap()).unwrap();

    let abandoned = store.create_pending();
    store.commit().unwrap();

    let saved = store.create_pending();
    store.stage_insert(saved.clone()).unwrap();
    store.commit().unwrap();

    let fetched = store.fetch_all().unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, saved.id);
    assert!(store.is_provisional(abandoned.id));
}

#[test]
fn stage_insert_rejects_foreign_ids() {
    let mut store = MemoStore::new(open_db_in_memory().unwrap()).unwrap();

    let foreign = memopad_core::Memo::new();
    let err = store.stage_insert(foreign.clone()).unwrap_err();
    assert!(matches!(err, StoreError::UnknownPending(id) if id == foreign.id));
    assert_eq!(store.staged_len(), 0);
}

#[test]
fn commit_flushes_mixed_staged_ops_in_one_pass() {
    let mut store = MemoStore::new(open_db_in_memory().unwrap()).unwrap();

    let mut keep = store.create_pending();
    keep.title = Some("keep".to_string());
    keep.date = 1000;
    let mut drop_me = store.create_pending();
    drop_me.title = Some("drop".to_string());
    drop_me.date = 2000;
    store.stage_insert(keep.clone()).unwrap();
    store.stage_insert(drop_me.clone()).unwrap();
    store.commit().unwrap();

    keep.content = "kept body".to_string();
    keep.date = 3000;
    store.stage_update(keep.clone());
    store.stage_delete(&drop_me);
    assert_eq!(store.staged_len(), 2);

    store.commit().unwrap();
    assert_eq!(store.staged_len(), 0);

    let fetched = store.fetch_all().unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, keep.id);
    assert_eq!(fetched[0].content, "kept body");
}

#[test]
fn commit_with_nothing_staged_is_a_no_op() {
    let mut store = MemoStore::new(open_db_in_memory().unwrap()).unwrap();
    store.commit().unwrap();
    assert!(store.fetch_all().unwrap().is_empty());
}

#[test]
fn failed_commit_leaves_staged_queue_for_retry() {
    let mut store = MemoStore::new(open_db_in_memory().unwrap()).unwrap();

    // Update of a row that was never inserted fails the whole batch.
    let phantom = memopad_core::Memo::new();
    store.stage_update(phantom);

    assert!(store.commit().is_err());
    assert_eq!(store.staged_len(), 1);
    assert!(store.fetch_all().unwrap().is_empty());
}

#[test]
fn committed_memos_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memopad.db");

    let saved_id = {
        let mut store = MemoStore::new(open_db(&path).unwrap()).unwrap();
        let mut draft = store.create_pending();
        draft.title = Some("durable".to_string());
        draft.content = "survives reopen".to_string();
        let id = draft.id;
        store.stage_insert(draft).unwrap();
        store.commit().unwrap();
        id
    };

    let store = MemoStore::new(open_db(&path).unwrap()).unwrap();
    let fetched = store.fetch_all().unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, saved_id);
    assert_eq!(fetched[0].title.as_deref(), Some("durable"));
    assert_eq!(fetched[0].content, "survives reopen");
}
