use super::*;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("uplink-{}-{name}", uuid::Uuid::new_v4()))
}

fn session() -> StoredSession {
    StoredSession {
        uid: "u1".to_owned(),
        email: Some("u1@example.com".to_owned()),
        id_token: "id".to_owned(),
        refresh_token: "refresh".to_owned(),
    }
}

#[test]
fn missing_file_loads_as_none() {
    let store = FileSessionStore::new(temp_path("missing.json"));
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn save_then_load() {
    let path = temp_path("session.json");
    let store = FileSessionStore::new(&path);
    store.save(&session()).unwrap();
    assert_eq!(store.load().unwrap(), Some(session()));
    store.clear().unwrap();
    assert!(!path.exists());
}

#[test]
fn save_creates_parent_directories() {
    let dir = temp_path("nested");
    let store = FileSessionStore::new(dir.join("a").join("session.json"));
    store.save(&session()).unwrap();
    assert!(store.path().exists());
    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn clear_without_file_succeeds() {
    FileSessionStore::new(temp_path("never.json")).clear().unwrap();
}

#[test]
fn corrupt_file_is_encoding_error() {
    let path = temp_path("corrupt.json");
    std::fs::write(&path, "not json").unwrap();
    let err = FileSessionStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StoreError::Encoding(_)));
    std::fs::remove_file(path).unwrap();
}

#[cfg(unix)]
#[test]
fn saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;
    let path = temp_path("perm.json");
    let store = FileSessionStore::new(&path);
    store.save(&session()).unwrap();
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    store.clear().unwrap();
}
