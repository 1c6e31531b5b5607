#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use social_network::prelude::*;
use tempfile::tempdir;
use tracing::Level;

pub fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    // Leak the tempdir so the file persists for the duration of the test binary.
    std::mem::forget(dir);
    path.to_string_lossy().into_owned()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub operation: String,
    pub duration: Duration,
    pub success: bool,
}

/// Keeps everything it is given so tests can assert on logs and metrics.
#[derive(Debug, Default)]
pub struct RecordingSink {
    logs: Mutex<Vec<(Level, String)>>,
    metrics: Mutex<Vec<Metric>>,
}

impl RecordingSink {
    pub fn metrics(&self) -> Vec<Metric> {
        self.metrics.lock().unwrap().clone()
    }

    pub fn metrics_for(&self, operation: &str) -> Vec<Metric> {
        self.metrics()
            .into_iter()
            .filter(|m| m.operation == operation)
            .collect()
    }

    pub fn logs_at(&self, level: Level) -> Vec<String> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn log(&self, level: Level, message: &str) {
        self.logs.lock().unwrap().push((level, message.to_string()));
    }

    fn record_metric(&self, operation: &str, duration: Duration, success: bool) {
        self.metrics.lock().unwrap().push(Metric {
            operation: operation.to_string(),
            duration,
            success,
        });
    }
}

/// A fresh database with the schema installed.
pub async fn open_db(
    prefix: &str,
    sink: Arc<RecordingSink>,
) -> Result<Database, Box<dyn std::error::Error>> {
    Ok(DbOptions::builder(unique_db_path(prefix)).build(sink).await?)
}

pub fn names(authors: &[&str]) -> Vec<String> {
    authors.iter().map(|a| (*a).to_string()).collect()
}

pub fn ids<T: HasId>(items: &[T]) -> Vec<i64> {
    items.iter().map(HasId::id).collect()
}

pub trait HasId {
    fn id(&self) -> i64;
}

impl HasId for Member {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for Work {
    fn id(&self) -> i64 {
        self.id
    }
}
