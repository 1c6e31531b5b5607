// Repository module - typed facades over the query executor
//
// - members: member rows, friendships, readers of a work
// - books: works, author lookups, readings
//
// The traits are the seam the social engine depends on; the SQL-backed
// repositories each own their command text and their row mapper.

mod books;
mod members;

use std::time::Instant;

use async_trait::async_trait;
use tracing::Level;

use crate::diagnostics::DiagnosticSink;
use crate::models::{Member, Rating, Work};
use crate::results::{NonQueryResult, QueryResult};

pub use books::{BooksRepository, read_work};
pub use members::{MembersRepository, read_member};

#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Register a member; the name is trimmed and must not be empty.
    async fn create(&self, name: &str) -> bool;

    async fn list_all(&self) -> QueryResult<Member>;

    /// Look up one member. Not-found and store failures both yield `None`.
    async fn find(&self, member_id: i64) -> Option<Member>;

    /// Members that requested a friendship addressed to `member_id`.
    async fn list_friends_of(&self, member_id: i64) -> QueryResult<Member>;

    /// Distinct members who have a reading of `work_id`.
    async fn list_readers_of(&self, work_id: i64) -> QueryResult<Member>;

    /// Record "requester is friend of addressed". Returns false when either
    /// member does not exist or the ordered pair is already present.
    async fn insert_friendship(&self, requester_id: i64, addressed_id: i64) -> bool;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Create a work and its authors in one atomic write.
    async fn create(&self, title: &str, authors: &[String]) -> bool;

    async fn list_all(&self) -> QueryResult<Work>;

    async fn find(&self, work_id: i64) -> Option<Work>;

    /// Works read by `member_id`, optionally restricted to readings whose
    /// rating is in `rating_filter`. An empty filter means no restriction.
    async fn list_by_reader(
        &self,
        member_id: i64,
        rating_filter: Option<&[Rating]>,
    ) -> QueryResult<Work>;

    /// Works with an author whose name contains `name` (case-sensitive).
    /// A match never spans two authors.
    async fn list_by_author_name(&self, name: &str) -> QueryResult<Work>;

    async fn record_reading(&self, work_id: i64, member_id: i64, rating: Rating) -> bool;
}

fn log_query_outcome<T>(
    sink: &dyn DiagnosticSink,
    operation: &str,
    output: &QueryResult<T>,
    started: Instant,
) {
    sink.log(
        Level::DEBUG,
        &format!(
            "DAL.{operation}(SUCCESS={}) => OUTLEN={} in {}ms",
            output.success,
            output.items.len(),
            started.elapsed().as_millis()
        ),
    );
}

fn log_write_outcome(
    sink: &dyn DiagnosticSink,
    operation: &str,
    output: &NonQueryResult,
    started: Instant,
) {
    sink.log(
        Level::DEBUG,
        &format!(
            "DAL.{operation}(SUCCESS={}; AFFECTED_ROWS={}) in {}ms",
            output.success,
            output.affected_rows,
            started.elapsed().as_millis()
        ),
    );
}

fn reject(sink: &dyn DiagnosticSink, operation: &str, reason: &str) {
    sink.log(Level::WARN, &format!("DAL.{operation} rejected: {reason}"));
}
