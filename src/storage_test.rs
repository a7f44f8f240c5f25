use super::*;

#[test]
fn memory_store_get_set_remove() {
    let store = MemoryStore::new();
    assert_eq!(store.get("k"), None);
    store.set("k", "v1");
    store.set("k", "v2");
    assert_eq!(store.get("k").as_deref(), Some("v2"));
    store.remove("k");
    assert_eq!(store.get("k"), None);
}

#[test]
fn token_store_holds_a_single_token() {
    let tokens = TokenStore::in_memory();
    assert!(!tokens.is_present());
    tokens.set("first");
    tokens.set("second");
    assert_eq!(tokens.get().as_deref(), Some("second"));
    tokens.clear();
    assert_eq!(tokens.get(), None);
}

#[test]
fn token_store_treats_empty_string_as_absent() {
    let store = Arc::new(MemoryStore::new());
    store.set(TOKEN_KEY, "");
    let tokens = TokenStore::new(store);
    assert!(!tokens.is_present());
}

#[test]
fn token_store_clones_share_the_slot() {
    let tokens = TokenStore::in_memory();
    let other = tokens.clone();
    tokens.set("abc");
    assert_eq!(other.get().as_deref(), Some("abc"));
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");

    let store = FileStore::open(&path);
    store.set(TOKEN_KEY, "persisted");
    assert!(path.exists());

    let reopened = FileStore::open(&path);
    assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("persisted"));

    reopened.remove(TOKEN_KEY);
    let again = FileStore::open(&path);
    assert_eq!(again.get(TOKEN_KEY), None);
}

#[test]
fn file_store_ignores_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{not json").unwrap();

    let store = FileStore::open(&path);
    assert_eq!(store.get(TOKEN_KEY), None);
    store.set(TOKEN_KEY, "fresh");
    assert_eq!(FileStore::open(&path).get(TOKEN_KEY).as_deref(), Some("fresh"));
}

#[test]
fn file_store_keeps_value_in_memory_when_write_fails() {
    let dir = tempfile::tempdir().unwrap();
    // A directory at the target path makes the write fail.
    let path = dir.path().join("blocked");
    std::fs::create_dir(&path).unwrap();

    let store = FileStore::open(&path);
    store.set(TOKEN_KEY, "still-here");
    assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("still-here"));
}
