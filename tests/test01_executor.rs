mod common;

use std::sync::Arc;

use common::{RecordingSink, open_db, unique_db_path};
use social_network::prelude::*;
use social_network::results::DbRow;
use social_network::{ConnectionManager, SqlExecutor};
use tokio_util::sync::CancellationToken;
use tracing::Level;

fn pair(row: &DbRow) -> Result<Option<(i64, String)>, SocialDbError> {
    Ok(row.id("ID").map(|id| (id, row.text("NAME").unwrap_or_default())))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn empty_command_is_a_successful_no_op() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("noop", Arc::clone(&sink)).await?;
    let exec = db.executor();

    let read = exec.execute_query("noop.read", "   ", &[], pair).await;
    assert!(read.success);
    assert!(read.is_empty());

    let write = exec.execute_non_query("noop.write", "", &[]).await;
    assert!(write.success);
    assert_eq!(write.affected_rows, 0);

    assert_eq!(sink.metrics_for("noop.read").len(), 1);
    assert_eq!(sink.metrics_for("noop.write").len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failures_are_contained_and_still_measured() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("bad_sql", Arc::clone(&sink)).await?;
    let exec = db.executor();

    let out = exec
        .execute_query("Broken(query=1)", "SELECT * FROM no_such_table", &[], pair)
        .await;
    assert!(!out.success);
    assert!(out.items.is_empty());

    let metrics = sink.metrics_for("Broken");
    assert_eq!(metrics.len(), 1);
    assert!(!metrics[0].success);
    assert!(
        sink.logs_at(Level::ERROR)
            .iter()
            .any(|m| m.contains("DAL.Exception in Broken(query=1)"))
    );

    let write = exec
        .execute_non_query("bad.write", "INSERT INTO nowhere VALUES (1)", &[])
        .await;
    assert!(!write.success);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rows_without_identifier_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("skip", Arc::clone(&sink)).await?;
    let exec = db.executor();

    let out = exec
        .execute_query(
            "mixed",
            "SELECT 1 AS id, 'a' AS name \
             UNION ALL SELECT NULL, 'b' \
             UNION ALL SELECT 'x', 'c' \
             UNION ALL SELECT 4, 'd'",
            &[],
            pair,
        )
        .await;
    assert!(out.success);
    assert_eq!(out.items, vec![(1, "a".to_string()), (4, "d".to_string())]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn parameters_bind_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("params", Arc::clone(&sink)).await?;
    let exec = db.executor();

    let out = exec
        .execute_query(
            "echo",
            "SELECT ?1 AS ID, ?2 AS NAME",
            &[RowValues::Int(7), RowValues::Text("seven".into())],
            pair,
        )
        .await;
    assert_eq!(out.items, vec![(7, "seven".to_string())]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn batch_reports_no_affected_rows() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("batch", Arc::clone(&sink)).await?;
    let exec = db.executor();

    let script = exec
        .execute_batch(
            "batch.script",
            "CREATE TABLE scratch (x INTEGER); \
             INSERT INTO scratch VALUES (1), (2), (3); \
             INSERT INTO scratch VALUES (4);",
        )
        .await;
    assert!(script.success);
    assert_eq!(script.affected_rows, 0);

    let count = exec
        .execute_query(
            "batch.count",
            "SELECT count(*) AS ID, 'rows' AS NAME FROM scratch",
            &[],
            pair,
        )
        .await;
    assert_eq!(count.items, vec![(4, "rows".to_string())]);
    assert_eq!(sink.metrics_for("batch.script").len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn mapping_error_fails_the_whole_query() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("mapping", Arc::clone(&sink)).await?;

    let out = db
        .executor()
        .execute_query(
            "strict",
            "SELECT 1 AS ID UNION ALL SELECT 2",
            &[],
            |row: &DbRow| -> Result<Option<i64>, SocialDbError> {
                match row.id("ID") {
                    Some(2) => Err(SocialDbError::MappingError("two".into())),
                    other => Ok(other),
                }
            },
        )
        .await;
    assert!(!out.success);
    assert!(out.items.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unopenable_store_yields_failed_results() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let missing_dir = format!("{}/missing/net.db", unique_db_path("root"));
    let options = DbOptions::builder(missing_dir)
        .create_if_missing(false)
        .finish();
    let manager = Arc::new(ConnectionManager::new(options, sink.clone()));
    let exec = SqlExecutor::new(Arc::clone(&manager), sink.clone());

    let out = exec.execute_query("ping", "SELECT 1 AS ID", &[], pair).await;
    assert!(!out.success);
    assert_eq!(manager.state().await, ConnectionState::Closed);
    assert_eq!(sink.metrics_for("ping").len(), 1);
    assert!(!sink.logs_at(Level::ERROR).is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancelled_executor_starts_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let options = DbOptions::new(unique_db_path("cancel"));
    let manager = Arc::new(ConnectionManager::new(options, sink.clone()));
    let token = CancellationToken::new();
    let exec = SqlExecutor::new(Arc::clone(&manager), sink.clone()).with_cancellation(token.clone());

    token.cancel();
    let out = exec.execute_non_query("late", "SELECT 1", &[]).await;
    assert!(!out.success);
    // never opened
    assert_eq!(manager.state().await, ConnectionState::Closed);
    assert!(sink.logs_at(Level::WARN).iter().any(|m| m.contains("late")));
    Ok(())
}
