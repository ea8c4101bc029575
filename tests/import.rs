//! Tests for the JSON-lines import run.

mod helpers;

use bulk_write_buffer::{run_import, Config, SqliteCollection};
use tempfile::TempDir;

use helpers::{create_test_pool_with_path, write_jsonl};

fn config_for(dir: &TempDir, input: &std::path::Path) -> Config {
    Config {
        file: Some(input.to_path_buf()),
        db_path: dir.path().join("import.db"),
        collection: "people".to_string(),
        batch_size: 2,
        timeout_seconds: 5,
        ..Default::default()
    }
}

async fn stored_ids(dir: &TempDir) -> Vec<String> {
    let pool = create_test_pool_with_path(&dir.path().join("import.db")).await;
    let coll = SqliteCollection::create(pool.clone(), "people")
        .await
        .expect("open collection");
    let ids = coll
        .find_all()
        .await
        .expect("find all")
        .iter()
        .filter_map(|d| d.id().map(str::to_string))
        .collect();
    pool.close().await;
    ids
}

#[tokio::test]
async fn test_import_clean_file() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_jsonl(&[
        r#"{"_id": "ada", "born": 1815}"#,
        r#"{"_id": "grace", "born": 1906}"#,
        "",
        r#"{"_id": "alan", "born": 1912}"#,
    ]);

    let report = run_import(config_for(&dir, input.path()))
        .await
        .expect("import");

    assert_eq!(report.lines_read, 4);
    assert_eq!(report.blank_lines, 1);
    assert_eq!(report.inserted, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(report.batches_failed, 0);
    assert!(report.is_clean());
    assert_eq!(stored_ids(&dir).await, vec!["ada", "grace", "alan"]);
}

#[tokio::test]
async fn test_import_skips_invalid_lines() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_jsonl(&[
        r#"{"_id": 1}"#,
        "not json",
        "[1, 2]",
        r#"{"_id": 2}"#,
    ]);

    let report = run_import(config_for(&dir, input.path()))
        .await
        .expect("import");

    assert_eq!(report.invalid_lines, 2);
    assert_eq!(report.inserted, 2);
    assert!(!report.is_clean());
}

#[tokio::test]
async fn test_import_ordered_duplicate_loses_rest_of_batch() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_jsonl(&[
        r#"{"_id": "a"}"#,
        r#"{"_id": "b"}"#,
        r#"{"_id": "b"}"#,
        r#"{"_id": "c"}"#,
        r#"{"_id": "d"}"#,
    ]);

    let config = Config {
        batch_size: 5,
        ..config_for(&dir, input.path())
    };
    let report = run_import(config).await.expect("import");

    assert_eq!(report.batches_failed, 1);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.failed, 3);
    assert_eq!(stored_ids(&dir).await, vec!["a", "b"]);
}

#[tokio::test]
async fn test_import_unordered_duplicate_keeps_going() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_jsonl(&[
        r#"{"_id": "a"}"#,
        r#"{"_id": "b"}"#,
        r#"{"_id": "b"}"#,
        r#"{"_id": "c"}"#,
        r#"{"_id": "d"}"#,
    ]);

    let config = Config {
        batch_size: 5,
        unordered: true,
        ..config_for(&dir, input.path())
    };
    let report = run_import(config).await.expect("import");

    assert_eq!(report.batches_failed, 1);
    assert_eq!(report.inserted, 4);
    assert_eq!(report.failed, 1);
    assert_eq!(stored_ids(&dir).await, vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn test_import_stop_on_error_aborts() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_jsonl(&[
        r#"{"_id": "a"}"#,
        r#"{"_id": "a"}"#,
        r#"{"_id": "b"}"#,
        r#"{"_id": "c"}"#,
    ]);

    let config = Config {
        stop_on_error: true,
        ..config_for(&dir, input.path())
    };
    let err = run_import(config).await.expect_err("duplicate aborts");
    assert!(
        format!("{:#}", err).contains("Import stopped"),
        "unexpected error: {:#}",
        err
    );
    assert_eq!(stored_ids(&dir).await, vec!["a"]);
}

#[tokio::test]
async fn test_import_stop_on_error_invalid_line() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_jsonl(&[r#"{"_id": "a"}"#, "oops"]);

    let config = Config {
        stop_on_error: true,
        ..config_for(&dir, input.path())
    };
    let err = run_import(config).await.expect_err("invalid line aborts");
    assert!(format!("{:#}", err).contains("line 2"), "{:#}", err);
}

#[tokio::test]
async fn test_import_drop_replaces_collection() {
    let dir = TempDir::new().expect("temp dir");
    let first = write_jsonl(&[r#"{"_id": "old"}"#]);
    run_import(config_for(&dir, first.path()))
        .await
        .expect("first import");

    let second = write_jsonl(&[r#"{"_id": "new"}"#]);
    let config = Config {
        drop: true,
        ..config_for(&dir, second.path())
    };
    run_import(config).await.expect("second import");

    assert_eq!(stored_ids(&dir).await, vec!["new"]);
}

#[tokio::test]
async fn test_import_appends_without_drop() {
    let dir = TempDir::new().expect("temp dir");
    let first = write_jsonl(&[r#"{"_id": "old"}"#]);
    run_import(config_for(&dir, first.path()))
        .await
        .expect("first import");

    let second = write_jsonl(&[r#"{"_id": "new"}"#]);
    run_import(config_for(&dir, second.path()))
        .await
        .expect("second import");

    assert_eq!(stored_ids(&dir).await, vec!["old", "new"]);
}

#[tokio::test]
async fn test_import_invalid_collection_name() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_jsonl(&[r#"{"_id": "a"}"#]);
    let config = Config {
        collection: "bad name".to_string(),
        ..config_for(&dir, input.path())
    };
    let err = run_import(config).await.expect_err("invalid name");
    assert!(format!("{:#}", err).contains("invalid collection name"), "{:#}", err);
}
