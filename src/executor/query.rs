use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SocialDbError;
use crate::results::{ColumnIndex, DbRow};
use crate::types::RowValues;

use super::params::Params;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SocialDbError` if the value cannot be read.
pub fn sqlite_extract_value_sync(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<RowValues, SocialDbError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Run a prepared statement and feed each row through `mapper`, forward-only.
/// Rows the mapper declines (`Ok(None)`) are skipped; the first mapper error
/// aborts the whole read.
///
/// # Errors
/// Returns `SocialDbError` if stepping the statement, reading a value, or
/// mapping a row fails.
pub fn map_rows<T, F>(
    stmt: &mut Statement<'_>,
    params: &Params,
    mapper: &F,
) -> Result<Vec<T>, SocialDbError>
where
    F: Fn(&DbRow) -> Result<Option<T>, SocialDbError>,
{
    let columns = ColumnIndex::new(
        stmt.column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect(),
    );
    let col_count = columns.len();

    let refs = params.as_refs();
    let mut rows_iter = stmt.query(&refs[..])?;
    let mut items = Vec::new();

    while let Some(row) = rows_iter.next()? {
        let mut values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            values.push(sqlite_extract_value_sync(row, i)?);
        }
        let db_row = DbRow::new(columns.clone(), values);
        if let Some(item) = mapper(&db_row)? {
            items.push(item);
        }
    }

    Ok(items)
}
