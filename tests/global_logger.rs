//! Integration test for the process-wide logger.
//!
//! Kept to a single test so nothing else in this binary touches the global
//! before it is installed.

use duallog::{InitError, LogCall, LoggerConfig, Severity, global, init, is_initialized};

#[test]
fn init_installs_a_single_global() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoggerConfig {
        log_dir: dir.path().to_path_buf(),
        app_name: "singleton".to_owned(),
        console: false,
        ..LoggerConfig::default()
    };

    assert!(!is_initialized());
    let installed = init(config.clone()).unwrap();
    assert!(is_initialized());
    assert!(std::ptr::eq(installed, global()));

    assert!(matches!(init(config), Err(InitError::AlreadyInitialized)));

    let rejected = LoggerConfig {
        log_dir: dir.path().join("second"),
        app_name: "second".to_owned(),
        console: false,
        ..LoggerConfig::default()
    };
    assert!(matches!(init(rejected), Err(InitError::AlreadyInitialized)));
    assert!(!dir.path().join("second").exists());

    global().set_level("error").unwrap();
    assert_eq!(installed.level(), Severity::Error);
    assert!(!global().log(LogCall::positional("warning", "hidden")));

    let handle = std::thread::spawn(|| global().log(LogCall::positional("crit", "seen")));
    assert!(handle.join().unwrap());

    global().flush();
    let text = std::fs::read_to_string(dir.path().join("singleton.log")).unwrap();
    assert!(text.ends_with("[crit] - seen\n"));
}
