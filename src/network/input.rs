//! Parsing of the raw strings a person types at the front end.
//!
//! Every function either returns typed values or a
//! `SocialDbError::ValidationError`; none of them touch the store.

use crate::error::SocialDbError;
use crate::models::Rating;

/// A positive identifier, e.g. `"12"`.
///
/// # Errors
/// Returns `SocialDbError::ValidationError` if the text is not a positive
/// integer.
pub fn parse_id(text: &str) -> Result<i64, SocialDbError> {
    let trimmed = text.trim();
    let id: i64 = trimmed
        .parse()
        .map_err(|_| SocialDbError::ValidationError(format!("{trimmed:?} is not an id")))?;
    if id <= 0 {
        return Err(SocialDbError::ValidationError(format!(
            "id must be positive, got {id}"
        )));
    }
    Ok(id)
}

/// Two identifiers separated by whitespace, e.g. `"1 2"`.
///
/// # Errors
/// Returns `SocialDbError::ValidationError` on a wrong count or a bad id.
pub fn parse_id_pair(text: &str) -> Result<(i64, i64), SocialDbError> {
    let [a, b] = fields::<2>(text)?;
    Ok((parse_id(a)?, parse_id(b)?))
}

/// Member id, work id and rating, e.g. `"1 2 3"` or `"1 2 alot"`.
///
/// # Errors
/// Returns `SocialDbError::ValidationError` on a wrong count, a bad id or an
/// unknown rating.
pub fn parse_reading(text: &str) -> Result<(i64, i64, Rating), SocialDbError> {
    let [member, work, rating] = fields::<3>(text)?;
    Ok((parse_id(member)?, parse_id(work)?, rating.parse()?))
}

/// Comma-separated author names, e.g. `"Terry Pratchett, Neil Gaiman"`.
/// Blank entries are dropped.
///
/// # Errors
/// Returns `SocialDbError::ValidationError` when no name remains.
pub fn parse_authors(text: &str) -> Result<Vec<String>, SocialDbError> {
    let names: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .collect();
    if names.is_empty() {
        return Err(SocialDbError::ValidationError(
            "at least one author name is required".into(),
        ));
    }
    Ok(names)
}

/// A comma or space separated rating list, e.g. `"little, alot"`.
/// Blank input is the empty list.
///
/// # Errors
/// Returns `SocialDbError::ValidationError` for an unknown rating.
pub fn parse_ratings(text: &str) -> Result<Vec<Rating>, SocialDbError> {
    let mut ratings: Vec<Rating> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()?;
    ratings.sort_unstable();
    ratings.dedup();
    Ok(ratings)
}

fn fields<const N: usize>(text: &str) -> Result<[&str; N], SocialDbError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    <[&str; N]>::try_from(parts).map_err(|parts| {
        SocialDbError::ValidationError(format!("expected {N} values, got {}", parts.len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids() {
        assert_eq!(parse_id(" 12 ").unwrap(), 12);
        assert!(parse_id("0").is_err());
        assert!(parse_id("-3").is_err());
        assert!(parse_id("twelve").is_err());
        assert!(parse_id("").is_err());
    }

    #[test]
    fn id_pairs_need_exactly_two() {
        assert_eq!(parse_id_pair("1 2").unwrap(), (1, 2));
        assert_eq!(parse_id_pair("  4\t9 ").unwrap(), (4, 9));
        assert!(parse_id_pair("1").is_err());
        assert!(parse_id_pair("1 2 3").is_err());
        assert!(parse_id_pair("1 x").is_err());
    }

    #[test]
    fn readings() {
        assert_eq!(parse_reading("1 2 3").unwrap(), (1, 2, Rating::ALot));
        assert_eq!(parse_reading("5 6 nothing").unwrap(), (5, 6, Rating::Nothing));
        assert!(parse_reading("1 2 4").is_err());
        assert!(parse_reading("1 2").is_err());
    }

    #[test]
    fn authors() {
        assert_eq!(
            parse_authors("Terry Pratchett, Neil Gaiman").unwrap(),
            vec!["Terry Pratchett".to_string(), "Neil Gaiman".to_string()]
        );
        assert_eq!(parse_authors(" Solo ,, ").unwrap(), vec!["Solo".to_string()]);
        assert!(parse_authors(" , ").is_err());
    }

    #[test]
    fn rating_lists() {
        assert_eq!(
            parse_ratings("alot, 2 alot").unwrap(),
            vec![Rating::Little, Rating::ALot]
        );
        assert!(parse_ratings("").unwrap().is_empty());
        assert!(parse_ratings("1 9").is_err());
    }
}
