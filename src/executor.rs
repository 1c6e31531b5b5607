//! Query executor: runs parameterized commands against the managed
//! connection and contains every failure in a result value.

mod params;
mod query;

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::Level;

use crate::connection::ConnectionManager;
use crate::diagnostics::{DiagnosticSink, metric_key};
use crate::error::SocialDbError;
use crate::results::{DbRow, NonQueryResult, QueryResult};
use crate::types::RowValues;

pub use params::{Params, row_value_to_sqlite_value};
pub use query::{map_rows, sqlite_extract_value_sync};

/// Executes read and write commands for the repositories.
///
/// Nothing here returns an error: failures become `success == false` and are
/// logged through the sink. Every call emits one metric keyed by the caller's
/// operation name, whatever the outcome.
pub struct SqlExecutor {
    manager: Arc<ConnectionManager>,
    sink: Arc<dyn DiagnosticSink>,
    cancel: CancellationToken,
}

impl SqlExecutor {
    #[must_use]
    pub fn new(manager: Arc<ConnectionManager>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            manager,
            sink,
            cancel: CancellationToken::new(),
        }
    }

    /// Refuse to start new commands once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub fn manager(&self) -> &Arc<ConnectionManager> {
        &self.manager
    }

    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run a read command and map each row with `mapper`.
    ///
    /// Empty command text is a successful no-op. Rows mapped to `None` are
    /// skipped.
    pub async fn execute_query<T, F>(
        &self,
        operation: &str,
        sql: &str,
        params: &[RowValues],
        mapper: F,
    ) -> QueryResult<T>
    where
        T: Send + 'static,
        F: Fn(&DbRow) -> Result<Option<T>, SocialDbError> + Send + 'static,
    {
        let started = Instant::now();
        let output = match self.try_query(sql, params, mapper).await {
            Ok(items) => QueryResult::ok(items),
            Err(err) => {
                self.log_failure(operation, &err);
                QueryResult::failed()
            }
        };
        self.sink
            .record_metric(metric_key(operation), started.elapsed(), output.success);
        output
    }

    /// Run a write command and report the affected-row count.
    pub async fn execute_non_query(
        &self,
        operation: &str,
        sql: &str,
        params: &[RowValues],
    ) -> NonQueryResult {
        let started = Instant::now();
        let output = match self.try_non_query(sql, params).await {
            Ok(affected) => NonQueryResult::ok(affected),
            Err(err) => {
                self.log_failure(operation, &err);
                NonQueryResult::failed()
            }
        };
        self.sink
            .record_metric(metric_key(operation), started.elapsed(), output.success);
        output
    }

    /// Run a script of several statements (schema setup). `affected_rows` is
    /// always 0; SQLite does not count changes across a whole script.
    pub async fn execute_batch(&self, operation: &str, sql: &str) -> NonQueryResult {
        let started = Instant::now();
        let output = match self.try_batch(sql).await {
            Ok(affected) => NonQueryResult::ok(affected),
            Err(err) => {
                self.log_failure(operation, &err);
                NonQueryResult::failed()
            }
        };
        self.sink
            .record_metric(metric_key(operation), started.elapsed(), output.success);
        output
    }

    async fn try_query<T, F>(
        &self,
        sql: &str,
        params: &[RowValues],
        mapper: F,
    ) -> Result<Vec<T>, SocialDbError>
    where
        T: Send + 'static,
        F: Fn(&DbRow) -> Result<Option<T>, SocialDbError> + Send + 'static,
    {
        if sql.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.ensure_not_cancelled()?;

        let sql_owned = sql.to_owned();
        let params_owned = Params::convert(params);
        self.manager
            .run_blocking(move |conn| {
                let mut stmt = conn.prepare(&sql_owned)?;
                map_rows(&mut stmt, &params_owned, &mapper)
            })
            .await
    }

    async fn try_non_query(&self, sql: &str, params: &[RowValues]) -> Result<usize, SocialDbError> {
        if sql.trim().is_empty() {
            return Ok(0);
        }
        self.ensure_not_cancelled()?;

        let sql_owned = sql.to_owned();
        let params_owned = Params::convert(params);
        self.manager
            .run_blocking(move |conn| {
                let mut stmt = conn.prepare_cached(&sql_owned)?;
                let refs = params_owned.as_refs();
                Ok(stmt.execute(&refs[..])?)
            })
            .await
    }

    async fn try_batch(&self, sql: &str) -> Result<usize, SocialDbError> {
        if sql.trim().is_empty() {
            return Ok(0);
        }
        self.ensure_not_cancelled()?;

        let sql_owned = sql.to_owned();
        self.manager
            .run_blocking(move |conn| {
                conn.execute_batch(&sql_owned)?;
                Ok(0)
            })
            .await
    }

    fn ensure_not_cancelled(&self) -> Result<(), SocialDbError> {
        if self.cancel.is_cancelled() {
            Err(SocialDbError::Cancelled(
                "cancellation requested; command not started".into(),
            ))
        } else {
            Ok(())
        }
    }

    fn log_failure(&self, operation: &str, err: &SocialDbError) {
        let level = if matches!(err, SocialDbError::Cancelled(_)) {
            Level::WARN
        } else {
            Level::ERROR
        };
        self.sink
            .log(level, &format!("DAL.Exception in {operation}: {err} ({err:?})"));
    }
}
