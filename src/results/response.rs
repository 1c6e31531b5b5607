use serde::Serialize;

/// Outcome of a read command.
///
/// `success == false` means the items must not be trusted. An empty list with
/// `success == true` is the ordinary "nothing found" case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult<T> {
    pub items: Vec<T>,
    pub success: bool,
}

impl<T> QueryResult<T> {
    #[must_use]
    pub fn ok(items: Vec<T>) -> Self {
        Self {
            items,
            success: true,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::ok(Vec::new())
    }

    #[must_use]
    pub fn failed() -> Self {
        Self {
            items: Vec::new(),
            success: false,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items of a successful result; a failed result collapses to no data.
    #[must_use]
    pub fn items_or_empty(self) -> Vec<T> {
        if self.success { self.items } else { Vec::new() }
    }
}

impl<T> Default for QueryResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Outcome of a write command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NonQueryResult {
    pub affected_rows: usize,
    pub success: bool,
}

impl NonQueryResult {
    #[must_use]
    pub fn ok(affected_rows: usize) -> Self {
        Self {
            affected_rows,
            success: true,
        }
    }

    #[must_use]
    pub fn failed() -> Self {
        Self {
            affected_rows: 0,
            success: false,
        }
    }
}
