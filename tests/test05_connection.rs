mod common;

use std::sync::Arc;

use common::{RecordingSink, names, open_db, unique_db_path};
use social_network::prelude::*;
use tracing::Level;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn closed_database_reopens_on_next_call() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("conn_reopen", Arc::clone(&sink)).await?;
    let net = db.network();
    assert!(net.create_member("Ana").await);
    assert_eq!(db.manager().state().await, ConnectionState::Open);

    db.close().await;
    db.close().await;
    assert_eq!(db.manager().state().await, ConnectionState::Closed);

    let members = net.list_members().await;
    assert!(members.success);
    assert_eq!(members.items.len(), 1);
    assert_eq!(db.manager().state().await, ConnectionState::Open);

    let opened = sink
        .logs_at(Level::INFO)
        .into_iter()
        .filter(|m| m.contains(">>> open"))
        .count();
    assert_eq!(opened, 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn schema_install_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let path = unique_db_path("conn_schema");
    let sink = Arc::new(RecordingSink::default());

    let first = DbOptions::builder(path.clone()).build(sink.clone()).await?;
    assert!(first.network().create_work("Kept", &names(&["A"])).await);
    first.close().await;

    let second = DbOptions::builder(path).build(sink.clone()).await?;
    let works = second.network().list_works().await;
    assert_eq!(works.items.len(), 1);
    assert_eq!(works.items[0].title, "Kept");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_one_connection() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("conn_shared", Arc::clone(&sink)).await?;
    let net = db.network();

    let mut handles = Vec::new();
    for n in 0..8 {
        let net = net.clone();
        handles.push(tokio::spawn(async move {
            net.create_member(&format!("member {n}")).await
        }));
    }
    for handle in handles {
        assert!(handle.await?);
    }

    assert_eq!(net.list_members().await.items.len(), 8);
    assert_eq!(db.manager().state().await, ConnectionState::Open);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_file_without_create_fails_bootstrap() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let built = DbOptions::builder(unique_db_path("conn_absent"))
        .create_if_missing(false)
        .build(sink.clone())
        .await;
    assert!(matches!(built, Err(SocialDbError::ExecutionError(_))));
    Ok(())
}
