use std::fmt::Display;

use serde::Serialize;
use social_network::QueryResult;

pub(crate) const NONE_FOUND: &str = "none found";
pub(crate) const QUERY_FAILED: &str = "query did not succeed";

/// Text for a list result. A failed query and an empty one read differently.
pub(crate) fn list<T>(result: &QueryResult<T>, json: bool) -> String
where
    T: Display + Serialize,
{
    if !result.success {
        return QUERY_FAILED.to_string();
    }
    if json {
        return serde_json::to_string_pretty(&result.items)
            .unwrap_or_else(|err| format!("could not encode result: {err}"));
    }
    if result.is_empty() {
        return NONE_FOUND.to_string();
    }
    result
        .items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Engine operations that return plain lists never report failure.
pub(crate) fn items<T>(items: Vec<T>, json: bool) -> String
where
    T: Display + Serialize,
{
    list(&QueryResult::ok(items), json)
}

pub(crate) fn write(action: &str, ok: bool) -> String {
    if ok {
        format!("{action}: done")
    } else {
        format!("{action}: did not succeed")
    }
}
