use std::fs;

use pretty_assertions::assert_eq;
use tracker_core::JobHandle;
use tracker_engine::{FileHandleStore, HandleStore, MemoryHandleStore, STATE_FILENAME};

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileHandleStore::new(dir.path().to_path_buf());

    store.save(&JobHandle::new("abc123")).expect("save");
    let loaded = store.load().expect("load");
    assert_eq!(loaded, Some(JobHandle::new("abc123")));
}

#[test]
fn load_without_any_save_is_absent_not_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileHandleStore::new(dir.path().to_path_buf());

    assert_eq!(store.load().expect("load"), None);
}

#[test]
fn clear_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileHandleStore::new(dir.path().to_path_buf());

    store.save(&JobHandle::new("abc123")).expect("save");
    store.clear().expect("first clear");
    store.clear().expect("second clear");
    assert_eq!(store.load().expect("load"), None);
}

#[test]
fn save_overwrites_the_previous_handle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileHandleStore::new(dir.path().to_path_buf());

    store.save(&JobHandle::new("first")).expect("save first");
    store.save(&JobHandle::new("second")).expect("save second");
    assert_eq!(store.load().expect("load"), Some(JobHandle::new("second")));
}

#[test]
fn corrupt_state_file_is_treated_as_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileHandleStore::new(dir.path().to_path_buf());

    fs::write(dir.path().join(STATE_FILENAME), "not ron at all {").expect("write garbage");
    assert_eq!(store.load().expect("load"), None);
}

#[test]
fn save_creates_the_state_directory_when_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("state");
    let store = FileHandleStore::new(nested);

    store.save(&JobHandle::new("abc123")).expect("save");
    assert_eq!(store.load().expect("load"), Some(JobHandle::new("abc123")));
}

#[test]
fn memory_store_round_trips() {
    let store = MemoryHandleStore::new();

    assert_eq!(store.load().expect("load"), None);
    store.save(&JobHandle::new("abc123")).expect("save");
    assert_eq!(store.load().expect("load"), Some(JobHandle::new("abc123")));
    store.clear().expect("clear");
    store.clear().expect("clear again");
    assert_eq!(store.load().expect("load"), None);
}
