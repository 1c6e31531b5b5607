mod response;
mod row;

pub use response::{NonQueryResult, QueryResult};
pub use row::{ColumnIndex, DbRow};
