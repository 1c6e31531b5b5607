//! Convenient imports for common functionality.
//!
//! This module re-exports the types most callers need to open a database and
//! drive the network.

pub use crate::config::{DbOptions, DbOptionsBuilder};
pub use crate::connection::ConnectionState;
pub use crate::database::Database;
pub use crate::diagnostics::{DiagnosticSink, TracingSink};
pub use crate::error::SocialDbError;
pub use crate::models::{Member, Rating, Work};
pub use crate::network::{RECOMMENDATION_BATCH, SocialNetwork};
pub use crate::repository::{BookStore, MemberStore};
pub use crate::results::{NonQueryResult, QueryResult};
pub use crate::types::RowValues;
