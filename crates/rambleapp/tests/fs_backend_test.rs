use rambleapp::store::backend::StorageBackend;
use rambleapp::store::fs_backend::FsBackend;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("data"));
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_io() {
    let (_dir, backend) = setup();

    // Missing key reads as absent, even before the directory exists
    assert_eq!(backend.get("favorites").unwrap(), None);

    backend.set("favorites", "[]").unwrap();
    assert_eq!(backend.get("favorites").unwrap(), Some("[]".to_string()));

    backend.set("favorites", "[1]").unwrap();
    assert_eq!(backend.get("favorites").unwrap(), Some("[1]".to_string()));

    backend.remove("favorites").unwrap();
    assert_eq!(backend.get("favorites").unwrap(), None);
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (_dir, backend) = setup();

    backend.set("keywordHistory", r#"["cabin"]"#).unwrap();

    let expected_path = backend.root().join("keywordHistory.json");
    assert!(expected_path.exists());
    assert_eq!(fs::read_to_string(&expected_path).unwrap(), r#"["cabin"]"#);

    // Verify NO .tmp files are left behind
    for entry in fs::read_dir(backend.root()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_remove_absent_key() {
    let (_dir, backend) = setup();
    backend.remove("collections").unwrap();
    backend.set("collections", "[]").unwrap();
    backend.remove("collections").unwrap();
    backend.remove("collections").unwrap();
}

#[test]
fn test_fs_backend_rejects_path_like_keys() {
    let (dir, backend) = setup();
    assert!(backend.set("../escape", "x").is_err());
    assert!(backend.get("a/b").is_err());
    assert!(backend.set("", "x").is_err());
    assert!(!dir.path().join("escape.json").exists());
}
