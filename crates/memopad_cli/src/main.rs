//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `memopad_core` linkage.
//! - Run one in-memory add/list round through the public API.

use memopad_core::db::open_db_in_memory;
use memopad_core::{list_label, MemoList, MemoStore};

fn main() {
    println!("memopad_core ping={}", memopad_core::ping());
    println!("memopad_core version={}", memopad_core::core_version());

    if let Err(err) = smoke_round() {
        eprintln!("smoke round failed: {err}");
        std::process::exit(1);
    }
}

fn smoke_round() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoStore::new(open_db_in_memory()?)?;
    let mut list = MemoList::new(store);
    list.load_once()?;

    let mut session = list.begin_add();
    session.set_title("hello");
    session.set_content("first memo body");
    list.finish_session(session.finish_done())?;

    for memo in list.memos() {
        println!("memo {} label={}", memo.id, list_label(memo));
    }

    Ok(())
}
