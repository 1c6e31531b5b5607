use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::DbOptions;
use crate::connection::ConnectionManager;
use crate::diagnostics::DiagnosticSink;
use crate::error::SocialDbError;
use crate::executor::SqlExecutor;
use crate::network::SocialNetwork;
use crate::repository::{BooksRepository, MembersRepository};

const SCHEMA: &str = include_str!("sql/schema.sql");

/// The connection manager and executor for one database file, plus the
/// repositories and engine built on top of them.
pub struct Database {
    manager: Arc<ConnectionManager>,
    executor: Arc<SqlExecutor>,
    sink: Arc<dyn DiagnosticSink>,
    cancel: CancellationToken,
}

impl Database {
    /// Wire up a database without touching the file; the connection opens on
    /// first use.
    #[must_use]
    pub fn new(options: DbOptions, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::with_cancellation(options, sink, CancellationToken::new())
    }

    #[must_use]
    pub fn with_cancellation(
        options: DbOptions,
        sink: Arc<dyn DiagnosticSink>,
        cancel: CancellationToken,
    ) -> Self {
        let manager = Arc::new(ConnectionManager::new(options, Arc::clone(&sink)));
        let executor = Arc::new(
            SqlExecutor::new(Arc::clone(&manager), Arc::clone(&sink))
                .with_cancellation(cancel.clone()),
        );
        Self {
            manager,
            executor,
            sink,
            cancel,
        }
    }

    /// Create the tables, views and triggers if they do not exist yet.
    ///
    /// # Errors
    /// Returns `SocialDbError::ExecutionError` if the script fails; the cause
    /// has already been logged through the sink.
    pub async fn install_schema(&self) -> Result<(), SocialDbError> {
        let outcome = self.executor.execute_batch("schema.install", SCHEMA).await;
        if outcome.success {
            Ok(())
        } else {
            Err(SocialDbError::ExecutionError(
                "schema installation failed".into(),
            ))
        }
    }

    #[must_use]
    pub fn executor(&self) -> &Arc<SqlExecutor> {
        &self.executor
    }

    #[must_use]
    pub fn manager(&self) -> &Arc<ConnectionManager> {
        &self.manager
    }

    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    #[must_use]
    pub fn members(&self) -> MembersRepository {
        MembersRepository::new(Arc::clone(&self.executor), Arc::clone(&self.sink))
    }

    #[must_use]
    pub fn books(&self) -> BooksRepository {
        BooksRepository::new(Arc::clone(&self.executor), Arc::clone(&self.sink))
    }

    /// The social engine over this database's repositories.
    #[must_use]
    pub fn network(&self) -> SocialNetwork {
        SocialNetwork::new(
            Arc::new(self.members()),
            Arc::new(self.books()),
            Arc::clone(&self.sink),
        )
        .with_cancellation(self.cancel.clone())
    }

    /// Release the connection. Later calls reopen it.
    pub async fn close(&self) {
        self.manager.dispose().await;
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("manager", &self.manager)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
