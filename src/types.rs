/// Values that can be stored in a database row or used as command parameters.
///
/// Repositories build their parameter lists from this enum so they never touch
/// driver types:
/// ```rust
/// use social_network::prelude::*;
///
/// let params = vec![RowValues::Int(1), RowValues::Text("Alice".into())];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value, stored as 0/1
    Bool(bool),
    /// NULL value
    Null,
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Lenient integer view: integers as-is, text that parses as an integer,
    /// and floats without a fractional part.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            RowValues::Int(i) => Some(*i),
            RowValues::Text(s) => s.trim().parse().ok(),
            #[allow(clippy::cast_possible_truncation)]
            RowValues::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            RowValues::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Lenient text view used by row mappers; NULL and blobs have no text form.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            RowValues::Text(s) => Some(s.clone()),
            RowValues::Int(i) => Some(i.to_string()),
            RowValues::Float(f) => Some(f.to_string()),
            RowValues::Bool(b) => Some(b.to_string()),
            RowValues::Null | RowValues::Blob(_) => None,
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_owned())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}
