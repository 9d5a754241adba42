use drawkill::config::ConfigManager;
use drawkill::data::{DataValidator, HistoryConnector, SyntheticHistory};
use drawkill::types::Pool;
use drawkill::{DrawkillError, KillEngine};
use std::path::PathBuf;
use tempfile::TempDir;

/// Writes `contents` under a fresh directory that is removed when the guard drops.
fn temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_load_skips_malformed_lines() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut contents = String::from("# exported draws\n");
    let history = SyntheticHistory::new(Pool::default(), Some(5)).generate(20).unwrap();
    for draw in history.draws() {
        let line: Vec<String> = draw.numbers().iter().map(|n| n.to_string()).collect();
        contents.push_str(&line.join(","));
        contents.push('\n');
    }
    contents.push_str("1,2,3\n");
    contents.push_str("1,2,3,4,5,6,99\n");
    contents.push_str("a,b,c,d,e,f,g\n");
    contents.push_str("\n");

    let (_dir, path) = temp_file("history.txt", &contents);
    let (loaded, summary) = HistoryConnector::load_with_summary(&path, Pool::default()).unwrap();

    assert_eq!(loaded.draws(), history.draws());
    assert_eq!(summary.accepted, 20);
    assert_eq!(summary.skipped_count(), 3);
    assert_eq!(summary.skipped[0].line_number, 22);

    let report = KillEngine::default().predict_kill(&loaded).unwrap();
    assert!(!report.per_strategy.is_empty());
}

#[test]
fn test_missing_file_is_a_loading_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.txt");
    let err = HistoryConnector::load(&missing, Pool::default()).unwrap_err();
    assert!(matches!(err, DrawkillError::DataLoading(_)));
}

#[test]
fn test_minimum_rows_check() {
    let history = SyntheticHistory::new(Pool::default(), Some(6)).generate(3).unwrap();
    let err = DataValidator::validate_minimum_rows(&history, 5).unwrap_err();
    assert!(matches!(
        err,
        DrawkillError::InsufficientHistory {
            required: 5,
            actual: 3
        }
    ));
}

#[test]
fn test_config_file_drives_the_pool() {
    let (_dir, path) = temp_file(
        "small-pool.toml",
        "[pool]\nsize = 20\ndraw_size = 5\nzones = 4\n",
    );
    let manager = ConfigManager::new();
    manager.load_from_file(&path).unwrap();

    let config = manager.get();
    let pool = config.pool.to_pool().unwrap();
    assert_eq!(pool.size, 20);

    let history = SyntheticHistory::new(pool, Some(9)).generate(30).unwrap();
    let report = KillEngine::new(config).predict_kill(&history).unwrap();
    assert!(report.overall.iter().all(|c| (1..=20).contains(&c.number)));
}
