use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::diagnostics::DiagnosticSink;
use crate::error::SocialDbError;
use crate::executor::SqlExecutor;
use crate::models::Member;
use crate::results::{DbRow, NonQueryResult, QueryResult};
use crate::types::RowValues;

use super::{MemberStore, log_query_outcome, log_write_outcome, reject};

const INSERT_MEMBER: &str = "INSERT INTO sp_insert_member (name) VALUES (?1)";
const SELECT_ALL: &str = "SELECT id AS ID, name AS NAME FROM members ORDER BY id";
const SELECT_BY_ID: &str = "SELECT id AS ID, name AS NAME FROM members WHERE id = ?1";
const SELECT_FRIENDS: &str = "SELECT mbs.id AS ID, mbs.name AS NAME \
       FROM members mbs \
 INNER JOIN are_friends fds ON mbs.id = fds.requester_id \
      WHERE fds.addressed_id = ?1 \
   ORDER BY mbs.id";
const SELECT_READERS: &str = "SELECT DISTINCT mbs.id AS ID, mbs.name AS NAME \
       FROM members mbs \
 INNER JOIN readings rds ON mbs.id = rds.reader_id \
      WHERE rds.book_id = ?1 \
   ORDER BY mbs.id";
const INSERT_FRIENDSHIP: &str =
    "INSERT INTO are_friends (requester_id, addressed_id) VALUES (?1, ?2)";

/// Map a row with `ID` and `NAME` columns (any case) to a [`Member`].
///
/// # Errors
/// Returns `SocialDbError::MappingError` if `NAME` holds a value with no text
/// form.
pub fn read_member(row: &DbRow) -> Result<Option<Member>, SocialDbError> {
    let Some(id) = row.id("ID") else {
        return Ok(None);
    };
    let name = match row.get("NAME") {
        None | Some(RowValues::Null) => String::new(),
        Some(value) => value.to_text().ok_or_else(|| {
            SocialDbError::MappingError(format!("member {id}: NAME is not text"))
        })?,
    };
    Ok(Some(Member { id, name }))
}

/// SQL-backed [`MemberStore`].
#[derive(Clone)]
pub struct MembersRepository {
    executor: Arc<SqlExecutor>,
    sink: Arc<dyn DiagnosticSink>,
}

impl MembersRepository {
    #[must_use]
    pub fn new(executor: Arc<SqlExecutor>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { executor, sink }
    }

    async fn query(&self, operation: &str, sql: &str, params: &[RowValues]) -> QueryResult<Member> {
        let started = Instant::now();
        let output = self
            .executor
            .execute_query(operation, sql, params, read_member)
            .await;
        log_query_outcome(self.sink.as_ref(), operation, &output, started);
        output
    }

    async fn write(&self, operation: &str, sql: &str, params: &[RowValues]) -> NonQueryResult {
        let started = Instant::now();
        let output = self.executor.execute_non_query(operation, sql, params).await;
        log_write_outcome(self.sink.as_ref(), operation, &output, started);
        output
    }
}

#[async_trait]
impl MemberStore for MembersRepository {
    async fn create(&self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            reject(self.sink.as_ref(), "members.create", "empty name");
            return false;
        }
        self.write("members.create", INSERT_MEMBER, &[RowValues::Text(name.to_owned())])
            .await
            .success
    }

    async fn list_all(&self) -> QueryResult<Member> {
        self.query("members.list_all", SELECT_ALL, &[]).await
    }

    async fn find(&self, member_id: i64) -> Option<Member> {
        if member_id <= 0 {
            return None;
        }
        self.query("members.find", SELECT_BY_ID, &[RowValues::Int(member_id)])
            .await
            .items_or_empty()
            .into_iter()
            .next()
    }

    async fn list_friends_of(&self, member_id: i64) -> QueryResult<Member> {
        self.query(
            "members.list_friends_of",
            SELECT_FRIENDS,
            &[RowValues::Int(member_id)],
        )
        .await
    }

    async fn list_readers_of(&self, work_id: i64) -> QueryResult<Member> {
        self.query(
            "members.list_readers_of",
            SELECT_READERS,
            &[RowValues::Int(work_id)],
        )
        .await
    }

    async fn insert_friendship(&self, requester_id: i64, addressed_id: i64) -> bool {
        const OP: &str = "members.insert_friendship";
        if requester_id <= 0 || addressed_id <= 0 {
            reject(self.sink.as_ref(), OP, "member ids must be positive");
            return false;
        }
        if requester_id == addressed_id {
            reject(self.sink.as_ref(), OP, "a member cannot befriend themselves");
            return false;
        }

        let requester = self.find(requester_id).await;
        let addressed = self.find(addressed_id).await;
        let (Some(requester), Some(addressed)) = (requester, addressed) else {
            reject(
                self.sink.as_ref(),
                OP,
                &format!("no members with ids {requester_id} and {addressed_id}"),
            );
            return false;
        };

        self.write(
            OP,
            INSERT_FRIENDSHIP,
            &[RowValues::Int(requester.id), RowValues::Int(addressed.id)],
        )
        .await
        .success
    }
}
