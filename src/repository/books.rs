use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::diagnostics::DiagnosticSink;
use crate::error::SocialDbError;
use crate::executor::SqlExecutor;
use crate::models::{Rating, Work};
use crate::results::{DbRow, NonQueryResult, QueryResult};
use crate::types::RowValues;

use super::{BookStore, log_query_outcome, log_write_outcome, reject};

const INSERT_BOOK: &str = "INSERT INTO sp_insert_book (title, authors) VALUES (?1, ?2)";
const INSERT_READING: &str =
    "INSERT INTO readings (book_id, reader_id, liked_rating) VALUES (?1, ?2, ?3)";
const SELECT_ALL: &str = "SELECT id AS ID, title AS TITLE, authors AS AUTHORS \
       FROM vw_books ORDER BY id";
const SELECT_BY_ID: &str = "SELECT id AS ID, title AS TITLE, authors AS AUTHORS \
       FROM vw_books WHERE id = ?1";
const SELECT_BY_READER: &str = "SELECT DISTINCT bks.id AS ID, bks.title AS TITLE, bks.authors AS AUTHORS \
       FROM vw_books bks \
 INNER JOIN readings rds ON bks.id = rds.book_id \
      WHERE rds.reader_id = ?1";
const SELECT_BY_AUTHOR: &str = "SELECT bks.id AS ID, bks.title AS TITLE, bks.authors AS AUTHORS \
       FROM vw_books bks \
      WHERE EXISTS (SELECT 1 FROM book_authors ba \
                     WHERE ba.book_id = bks.id AND instr(ba.author_name, ?1) > 0) \
   ORDER BY bks.id";

/// Map a row with `ID`, `TITLE` and `AUTHORS` columns (any case) to a
/// [`Work`]. The author list is stored comma-separated.
///
/// # Errors
/// Returns `SocialDbError::MappingError` if `TITLE` or `AUTHORS` holds a
/// value with no text form.
pub fn read_work(row: &DbRow) -> Result<Option<Work>, SocialDbError> {
    let Some(id) = row.id("ID") else {
        return Ok(None);
    };
    let title = text_column(row, id, "TITLE")?.unwrap_or_default();
    let authors = text_column(row, id, "AUTHORS")?
        .map(|list| split_authors(&list))
        .unwrap_or_default();
    Ok(Some(Work { id, title, authors }))
}

fn text_column(row: &DbRow, id: i64, column: &str) -> Result<Option<String>, SocialDbError> {
    match row.get(column) {
        None | Some(RowValues::Null) => Ok(None),
        Some(value) => value.to_text().map(Some).ok_or_else(|| {
            SocialDbError::MappingError(format!("work {id}: {column} is not text"))
        }),
    }
}

fn split_authors(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Trimmed author names, or the reason they cannot be stored.
fn normalize_authors(authors: &[String]) -> Result<Vec<String>, String> {
    let names: Vec<String> = authors
        .iter()
        .map(|a| a.trim().to_owned())
        .filter(|a| !a.is_empty())
        .collect();
    if names.is_empty() {
        return Err("at least one author name is required".into());
    }
    if let Some(bad) = names.iter().find(|a| a.contains(',')) {
        return Err(format!("author name {bad:?} contains a comma"));
    }
    Ok(names)
}

/// SQL-backed [`BookStore`].
#[derive(Clone)]
pub struct BooksRepository {
    executor: Arc<SqlExecutor>,
    sink: Arc<dyn DiagnosticSink>,
}

impl BooksRepository {
    #[must_use]
    pub fn new(executor: Arc<SqlExecutor>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { executor, sink }
    }

    async fn query(&self, operation: &str, sql: &str, params: &[RowValues]) -> QueryResult<Work> {
        let started = Instant::now();
        let output = self
            .executor
            .execute_query(operation, sql, params, read_work)
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
impl BookStore for BooksRepository {
    async fn create(&self, title: &str, authors: &[String]) -> bool {
        const OP: &str = "books.create";
        let title = title.trim();
        if title.is_empty() {
            reject(self.sink.as_ref(), OP, "empty title");
            return false;
        }
        let names = match normalize_authors(authors) {
            Ok(names) => names,
            Err(reason) => {
                reject(self.sink.as_ref(), OP, &reason);
                return false;
            }
        };
        let encoded = match serde_json::to_string(&names) {
            Ok(encoded) => encoded,
            Err(err) => {
                reject(self.sink.as_ref(), OP, &err.to_string());
                return false;
            }
        };

        self.write(
            OP,
            INSERT_BOOK,
            &[RowValues::Text(title.to_owned()), RowValues::Text(encoded)],
        )
        .await
        .success
    }

    async fn list_all(&self) -> QueryResult<Work> {
        self.query("books.list_all", SELECT_ALL, &[]).await
    }

    async fn find(&self, work_id: i64) -> Option<Work> {
        if work_id <= 0 {
            return None;
        }
        self.query("books.find", SELECT_BY_ID, &[RowValues::Int(work_id)])
            .await
            .items_or_empty()
            .into_iter()
            .next()
    }

    async fn list_by_reader(
        &self,
        member_id: i64,
        rating_filter: Option<&[Rating]>,
    ) -> QueryResult<Work> {
        let mut sql = SELECT_BY_READER.to_owned();
        let mut params = vec![RowValues::Int(member_id)];

        if let Some(filter) = rating_filter.filter(|f| !f.is_empty()) {
            let placeholders = (0..filter.len())
                .map(|i| format!("?{}", i + 2))
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(&format!(" AND rds.liked_rating IN ({placeholders})"));
            params.extend(filter.iter().map(|r| RowValues::Int(r.code())));
        }
        sql.push_str(" ORDER BY bks.id");

        self.query("books.list_by_reader", &sql, &params).await
    }

    async fn list_by_author_name(&self, name: &str) -> QueryResult<Work> {
        const OP: &str = "books.list_by_author_name";
        if name.trim().is_empty() {
            reject(self.sink.as_ref(), OP, "empty author name");
            return QueryResult::failed();
        }
        self.query(OP, SELECT_BY_AUTHOR, &[RowValues::Text(name.to_owned())])
            .await
    }

    async fn record_reading(&self, work_id: i64, member_id: i64, rating: Rating) -> bool {
        const OP: &str = "books.record_reading";
        if work_id <= 0 || member_id <= 0 {
            reject(self.sink.as_ref(), OP, "ids must be positive");
            return false;
        }
        self.write(
            OP,
            INSERT_READING,
            &[
                RowValues::Int(work_id),
                RowValues::Int(member_id),
                RowValues::Int(rating.code()),
            ],
        )
        .await
        .success
    }
}
