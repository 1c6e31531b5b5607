use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::Level;
use uuid::Uuid;

use crate::config::DbOptions;
use crate::diagnostics::DiagnosticSink;
use crate::error::SocialDbError;

use super::slot::{ConnectionSlot, ConnectionState};

/// Owner of the single reusable `SQLite` connection.
///
/// The handle lives behind a mutex; every command runs on the blocking pool
/// while holding it, so (re)opening and execution never overlap even if
/// callers ignore the one-action-at-a-time discipline.
pub struct ConnectionManager {
    slot: Arc<Mutex<ConnectionSlot>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl ConnectionManager {
    #[must_use]
    pub fn new(options: DbOptions, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(ConnectionSlot::new(options, Arc::clone(&sink)))),
            sink,
        }
    }

    /// Open the connection if needed. Never fails; an open error is logged and
    /// surfaces later as a failed command.
    pub async fn ensure_open(&self) -> ConnectionState {
        let opened = self
            .with_slot("ensure_open", |slot| {
                slot.ensure_open();
                slot.state()
            })
            .await;
        match opened {
            Some(state) => state,
            None => self.state().await,
        }
    }

    /// Close and release the connection. Safe to call repeatedly or before
    /// the first open; the next command reopens lazily.
    pub async fn dispose(&self) {
        if self.with_slot("dispose", ConnectionSlot::dispose).await.is_none() {
            self.sink.log(
                Level::WARN,
                &format!("connection:dispose: slot left {}", self.state().await),
            );
        }
    }

    pub async fn state(&self) -> ConnectionState {
        self.slot.lock().await.state()
    }

    /// Identifier of the current physical connection. A new one is drawn on
    /// every open, so it changes after a dispose or a fault.
    pub async fn session_id(&self) -> Option<Uuid> {
        self.slot.lock().await.session_id()
    }

    pub async fn open_count(&self) -> u64 {
        self.slot.lock().await.open_count()
    }

    pub async fn last_open_error(&self) -> Option<String> {
        self.slot.lock().await.last_open_error().map(str::to_owned)
    }

    /// Run `func` on the slot from the blocking pool. A task that panics or
    /// is cancelled is logged through the sink and yields `None`.
    async fn with_slot<F, R>(&self, operation: &str, func: F) -> Option<R>
    where
        F: FnOnce(&mut ConnectionSlot) -> R + Send + 'static,
        R: Send + 'static,
    {
        let slot = Arc::clone(&self.slot);
        match tokio::task::spawn_blocking(move || func(&mut slot.blocking_lock())).await {
            Ok(value) => Some(value),
            Err(join) => {
                let err = SocialDbError::from(join);
                self.sink
                    .log(Level::ERROR, &format!("connection:{operation}: {err}"));
                None
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn mark_broken(&self) {
        let reason = SocialDbError::ConnectionError("forced by test".into());
        self.slot.lock().await.mark_broken(&reason);
    }

    /// Run synchronous `rusqlite` logic against the managed connection on the
    /// blocking pool, opening it first if necessary.
    ///
    /// # Errors
    /// Returns `SocialDbError::ConnectionError` if no connection could be
    /// opened, or whatever `func` returns. Connection-level faults mark the
    /// connection broken so the next call reopens it.
    pub async fn run_blocking<F, R>(&self, func: F) -> Result<R, SocialDbError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, SocialDbError> + Send + 'static,
        R: Send + 'static,
    {
        let slot = Arc::clone(&self.slot);
        tokio::task::spawn_blocking(move || {
            let mut guard = slot.blocking_lock();
            guard.ensure_open();
            let result = guard.connection().and_then(func);
            if let Err(err) = &result {
                if err.is_connection_fault() {
                    guard.mark_broken(err);
                }
            }
            result
        })
        .await?
    }
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager").finish_non_exhaustive()
    }
}
