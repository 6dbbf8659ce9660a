use gramcheck::devlog::DevLog;
use gramcheck::storage::{FileStore, SessionStore, SqliteStore};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn create_temp_file_store() -> (SessionStore<FileStore>, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let backend = FileStore::new(tmp.path().join("kv")).expect("failed to create file store");
    (SessionStore::new(backend, DevLog::disabled()), tmp)
}

#[allow(dead_code)]
pub fn create_temp_sqlite_store() -> (SessionStore<SqliteStore>, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let backend =
        SqliteStore::new(tmp.path().join("sessions.db")).expect("failed to create sqlite store");
    (SessionStore::new(backend, DevLog::disabled()), tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
