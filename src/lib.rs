//! A small reading-circle network on `SQLite`: members, works, readings and
//! friendships, plus "friends who also read" and author-based
//! recommendations.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use social_network::prelude::*;
//!
//! # async fn demo() -> Result<(), SocialDbError> {
//! let db = DbOptions::builder("network.db")
//!     .build(Arc::new(TracingSink))
//!     .await?;
//! let net = db.network();
//! net.create_member("Ana").await;
//! for work in net.recommend(1).await {
//!     println!("{work}");
//! }
//! db.close().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod database;
pub mod diagnostics;
pub mod error;
pub mod executor;
pub mod models;
pub mod network;
pub mod prelude;
pub mod repository;
pub mod results;
pub mod types;

pub use config::{DbOptions, DbOptionsBuilder};
pub use connection::{ConnectionManager, ConnectionState};
pub use database::Database;
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use error::SocialDbError;
pub use executor::SqlExecutor;
pub use models::{Member, Rating, Work};
pub use network::{RECOMMENDATION_BATCH, SocialNetwork};
pub use repository::{BookStore, BooksRepository, MemberStore, MembersRepository};
pub use results::{DbRow, NonQueryResult, QueryResult};
pub use types::RowValues;
