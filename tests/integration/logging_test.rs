use std::fs;

use tempfile::TempDir;

#[test]
fn test_logs_go_to_the_log_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("poptop.log");

    poptop::init_logging(Some(&path)).unwrap();
    log::warn!("network device changed");
    log::logger().flush();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("network device changed"));

    // The logger can only be installed once per process
    assert!(poptop::init_logging(None).is_err());
}
