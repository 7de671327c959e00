use noticeforge_bootstrap::{logging, paths};

#[test]
fn logging_init_creates_file_under_logs() {
    let tmp = tempfile::tempdir().unwrap();
    let log_path = logging::init(tmp.path(), "launcher.log", "debug")
        .expect("logging init should succeed");
    assert!(log_path.exists());
    assert!(log_path.starts_with(paths::logs_dir(tmp.path())));
}
