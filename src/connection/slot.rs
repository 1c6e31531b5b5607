use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use rusqlite::{Connection, OpenFlags};
use tracing::Level;
use uuid::Uuid;

use crate::config::DbOptions;
use crate::diagnostics::DiagnosticSink;
use crate::error::SocialDbError;

/// Lifecycle of the managed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Never opened, disposed, or the last open attempt failed.
    Closed,
    Open,
    /// Opened once, then hit a connection-level fault; reopened on next use.
    Broken,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Closed => "closed",
            ConnectionState::Open => "open",
            ConnectionState::Broken => "broken",
        };
        f.write_str(label)
    }
}

/// The connection handle plus the bookkeeping around it. Always accessed
/// under the manager's mutex.
pub(crate) struct ConnectionSlot {
    options: DbOptions,
    sink: Arc<dyn DiagnosticSink>,
    conn: Option<Connection>,
    state: ConnectionState,
    session_id: Option<Uuid>,
    last_open_error: Option<String>,
    opens: u64,
}

impl ConnectionSlot {
    pub(crate) fn new(options: DbOptions, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            options,
            sink,
            conn: None,
            state: ConnectionState::Closed,
            session_id: None,
            last_open_error: None,
            opens: 0,
        }
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.state
    }

    pub(crate) fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub(crate) fn open_count(&self) -> u64 {
        self.opens
    }

    pub(crate) fn last_open_error(&self) -> Option<&str> {
        self.last_open_error.as_deref()
    }

    fn session_label(&self) -> String {
        self.session_id
            .map_or_else(|| "-".to_string(), |id| id.to_string())
    }

    /// Open the connection if it is absent, closed or broken. Failures are
    /// logged and remembered, never returned.
    pub(crate) fn ensure_open(&mut self) {
        let started = Instant::now();
        let new_instance = self.conn.is_none();

        match self.state {
            ConnectionState::Closed | ConnectionState::Broken => {
                let previous = self.state;
                // a broken handle is dropped before reopening
                self.conn = None;
                match open_connection(&self.options) {
                    Ok(conn) => {
                        self.conn = Some(conn);
                        self.state = ConnectionState::Open;
                        self.session_id = Some(Uuid::new_v4());
                        self.last_open_error = None;
                        self.opens += 1;
                        self.sink.log(
                            Level::INFO,
                            &format!(
                                "connection:init:{new_instance}:open({}) {previous} >>> open",
                                self.session_label()
                            ),
                        );
                    }
                    Err(err) => {
                        self.state = ConnectionState::Closed;
                        self.sink.log(
                            Level::ERROR,
                            &format!("connection:init:error opening {:?}: {err}", self.options.db_path),
                        );
                        self.last_open_error = Some(err.to_string());
                    }
                }
            }
            ConnectionState::Open => {
                self.sink.log(
                    Level::TRACE,
                    &format!("connection:init:{new_instance}:open({})", self.session_label()),
                );
            }
        }

        self.sink.log(
            Level::TRACE,
            &format!(
                "connection:init:({}) in {}ms",
                self.session_label(),
                started.elapsed().as_millis()
            ),
        );
    }

    /// Borrow the open handle.
    pub(crate) fn connection(&mut self) -> Result<&mut Connection, SocialDbError> {
        let detail = self.last_open_error.clone();
        self.conn.as_mut().ok_or_else(|| {
            SocialDbError::ConnectionError(match detail {
                Some(reason) => format!("connection is not open: {reason}"),
                None => "connection is not open".to_string(),
            })
        })
    }

    pub(crate) fn mark_broken(&mut self, reason: &SocialDbError) {
        if self.conn.is_some() && self.state == ConnectionState::Open {
            self.state = ConnectionState::Broken;
            self.sink.log(
                Level::WARN,
                &format!(
                    "connection:state_change:({}) open >>> broken: {reason}",
                    self.session_label()
                ),
            );
        }
    }

    /// Close when open or broken and release the handle. Safe to call when
    /// the connection was never opened.
    pub(crate) fn dispose(&mut self) {
        match self.state {
            ConnectionState::Open | ConnectionState::Broken => {
                self.sink.log(
                    Level::INFO,
                    &format!("connection:dispose:close({})", self.session_label()),
                );
                if let Some(conn) = self.conn.take() {
                    if let Err((_conn, err)) = conn.close() {
                        self.sink.log(
                            Level::ERROR,
                            &format!("connection:dispose:error({}): {err}", self.session_label()),
                        );
                    }
                }
            }
            ConnectionState::Closed => {
                self.sink.log(
                    Level::DEBUG,
                    &format!("connection:dispose:closed({})", self.session_label()),
                );
            }
        }
        self.conn = None;
        self.state = ConnectionState::Closed;
    }
}

fn open_connection(options: &DbOptions) -> Result<Connection, SocialDbError> {
    let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    if options.create_if_missing {
        flags |= OpenFlags::SQLITE_OPEN_CREATE;
    }
    let conn = Connection::open_with_flags(&options.db_path, flags)?;
    conn.busy_timeout(options.busy_timeout)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}
