// Network module - the operations the front end drives
//
// - graph: friends-who-also-read and recommendations
// - input: parsing of the raw strings a person types
//
// Nothing here returns an error. Repository failures and cancellation both
// come back as empty lists, failed results or `false`.

mod graph;
pub mod input;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::Level;

use crate::diagnostics::DiagnosticSink;
use crate::models::{Member, Rating, Work};
use crate::repository::{BookStore, MemberStore};
use crate::results::QueryResult;

pub use graph::RECOMMENDATION_BATCH;

/// The social and recommendation engine over a member store and a book
/// store.
#[derive(Clone)]
pub struct SocialNetwork {
    members: Arc<dyn MemberStore>,
    books: Arc<dyn BookStore>,
    sink: Arc<dyn DiagnosticSink>,
    cancel: CancellationToken,
}

impl SocialNetwork {
    #[must_use]
    pub fn new(
        members: Arc<dyn MemberStore>,
        books: Arc<dyn BookStore>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            members,
            books,
            sink,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub async fn create_member(&self, name: &str) -> bool {
        if self.stopped("create_member") {
            return false;
        }
        self.members.create(name).await
    }

    pub async fn create_work(&self, title: &str, authors: &[String]) -> bool {
        if self.stopped("create_work") {
            return false;
        }
        self.books.create(title, authors).await
    }

    /// Record that `requester_id` is a friend of `addressed_id`. Directional:
    /// the reverse needs its own call.
    pub async fn add_friendship(&self, requester_id: i64, addressed_id: i64) -> bool {
        if self.stopped("add_friendship") {
            return false;
        }
        self.members
            .insert_friendship(requester_id, addressed_id)
            .await
    }

    /// Record a reading after checking that both the member and the work
    /// exist.
    pub async fn read_and_rate(&self, member_id: i64, work_id: i64, rating: Rating) -> bool {
        if self.stopped("read_and_rate") {
            return false;
        }
        let Some(member) = self.members.find(member_id).await else {
            self.note(Level::WARN, &format!("read_and_rate: no member {member_id}"));
            return false;
        };
        let Some(work) = self.books.find(work_id).await else {
            self.note(Level::WARN, &format!("read_and_rate: no work {work_id}"));
            return false;
        };
        self.books.record_reading(work.id, member.id, rating).await
    }

    pub async fn list_members(&self) -> QueryResult<Member> {
        if self.stopped("list_members") {
            return QueryResult::failed();
        }
        self.members.list_all().await
    }

    pub async fn list_works(&self) -> QueryResult<Work> {
        if self.stopped("list_works") {
            return QueryResult::failed();
        }
        self.books.list_all().await
    }

    /// Every work the member has a reading of, whatever the rating.
    pub async fn works_read_by(&self, member_id: i64) -> QueryResult<Work> {
        if self.stopped("works_read_by") {
            return QueryResult::failed();
        }
        self.books.list_by_reader(member_id, None).await
    }

    /// Works the member read with one of `ratings`. An empty slice means any
    /// rating.
    pub async fn works_rated_by(&self, member_id: i64, ratings: &[Rating]) -> QueryResult<Work> {
        if self.stopped("works_rated_by") {
            return QueryResult::failed();
        }
        self.books.list_by_reader(member_id, Some(ratings)).await
    }

    pub async fn works_by_author(&self, name: &str) -> QueryResult<Work> {
        if self.stopped("works_by_author") {
            return QueryResult::failed();
        }
        self.books.list_by_author_name(name).await
    }

    pub async fn readers_of(&self, work_id: i64) -> QueryResult<Member> {
        if self.stopped("readers_of") {
            return QueryResult::failed();
        }
        self.members.list_readers_of(work_id).await
    }

    pub async fn friends_of(&self, member_id: i64) -> QueryResult<Member> {
        if self.stopped("friends_of") {
            return QueryResult::failed();
        }
        self.members.list_friends_of(member_id).await
    }

    fn stopped(&self, operation: &str) -> bool {
        let cancelled = self.cancel.is_cancelled();
        if cancelled {
            self.note(Level::WARN, &format!("{operation}: cancelled before start"));
        }
        cancelled
    }

    fn note(&self, level: Level, message: &str) {
        self.sink.log(level, &format!("SN.{message}"));
    }
}

impl std::fmt::Debug for SocialNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialNetwork")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
