use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SocialDbError;

/// A person in the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Member(id={}; name={})", self.id, self.name)
    }
}

/// A book with its author names, in authoring order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Work {
    pub id: i64,
    pub title: String,
    pub authors: Vec<String>,
}

impl fmt::Display for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let authors = self
            .authors
            .iter()
            .map(|a| format!("'{a}'"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "Work(id={}; title={}; authors=({authors}))",
            self.id, self.title
        )
    }
}

/// How much a member liked a work. The numeric codes are persisted and must
/// not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rating {
    Nothing = 1,
    Little = 2,
    ALot = 3,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Nothing, Rating::Little, Rating::ALot];
    /// Ratings that count as "liked" for recommendations.
    pub const LIKED: [Rating; 2] = [Rating::Little, Rating::ALot];

    #[must_use]
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for Rating {
    type Error = SocialDbError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Rating::Nothing),
            2 => Ok(Rating::Little),
            3 => Ok(Rating::ALot),
            other => Err(SocialDbError::ValidationError(format!(
                "rating {other} is outside 1..=3"
            ))),
        }
    }
}

impl FromStr for Rating {
    type Err = SocialDbError;

    /// Accepts the persisted code (`"1"`..`"3"`) or the name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i64>() {
            return Rating::try_from(code);
        }
        match trimmed.to_ascii_lowercase().replace(['_', '-', ' '], "").as_str() {
            "nothing" => Ok(Rating::Nothing),
            "little" => Ok(Rating::Little),
            "alot" => Ok(Rating::ALot),
            _ => Err(SocialDbError::ValidationError(format!(
                "unknown rating {trimmed:?}"
            ))),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rating::Nothing => "Nothing",
            Rating::Little => "Little",
            Rating::ALot => "ALot",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_codes_are_stable() {
        assert_eq!(Rating::Nothing.code(), 1);
        assert_eq!(Rating::Little.code(), 2);
        assert_eq!(Rating::ALot.code(), 3);
        for rating in Rating::ALL {
            assert_eq!(Rating::try_from(rating.code()).unwrap(), rating);
        }
    }

    #[test]
    fn rating_rejects_out_of_range() {
        assert!(Rating::try_from(0).is_err());
        assert!(Rating::try_from(4).is_err());
        assert!("7".parse::<Rating>().is_err());
        assert!("loved".parse::<Rating>().is_err());
    }

    #[test]
    fn rating_parses_names() {
        assert_eq!("a lot".parse::<Rating>().unwrap(), Rating::ALot);
        assert_eq!("ALOT".parse::<Rating>().unwrap(), Rating::ALot);
        assert_eq!(" little ".parse::<Rating>().unwrap(), Rating::Little);
        assert_eq!("2".parse::<Rating>().unwrap(), Rating::Little);
    }

    #[test]
    fn work_display_quotes_authors() {
        let work = Work {
            id: 4,
            title: "Dune".into(),
            authors: vec!["Frank Herbert".into(), "Brian Herbert".into()],
        };
        assert_eq!(
            work.to_string(),
            "Work(id=4; title=Dune; authors=('Frank Herbert', 'Brian Herbert'))"
        );
    }
}
