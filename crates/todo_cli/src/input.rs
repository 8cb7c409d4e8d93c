//! Form-input normalization done before calling the store.
//!
//! The store accepts drafts as given; trimming, defaulting and date parsing
//! all live here.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use todo_core::{Priority, Todo, TodoId, UNCATEGORIZED};

static RELATIVE_DUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^in\s+(\d{1,4})\s*([dw])$").expect("valid relative due regex"));

/// Trims todo text. Returns `None` when nothing is left.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trims a category, substituting `uncategorized` for empty input.
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn parse_priority(raw: &str) -> Result<Priority, String> {
    Priority::parse(raw)
        .ok_or_else(|| format!("unknown priority `{}`; expected low|medium|high", raw.trim()))
}

/// Parses due-date input relative to `now`.
///
/// Date-only values resolve to midnight UTC of that day.
pub fn parse_due(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let input = raw.trim().to_lowercase();
    let today = now.date_naive();

    let day = match input.as_str() {
        "today" => Some(today),
        "tomorrow" => Some(today + Duration::days(1)),
        _ => None,
    };
    if let Some(day) = day {
        return Ok(midnight_utc(day));
    }

    if let Some(caps) = RELATIVE_DUE_RE.captures(&input) {
        let amount: i64 = caps[1]
            .parse()
            .map_err(|_| format!("invalid due date `{}`", raw.trim()))?;
        let days = if &caps[2] == "w" { amount * 7 } else { amount };
        return Ok(midnight_utc(today + Duration::days(days)));
    }

    if let Ok(day) = NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
        return Ok(midnight_utc(day));
    }

    DateTime::parse_from_rfc3339(raw.trim())
        .map(|value| value.with_timezone(&Utc))
        .map_err(|_| {
            format!(
                "invalid due date `{}`; expected YYYY-MM-DD, RFC 3339, today, tomorrow or `in Nd`",
                raw.trim()
            )
        })
}

fn midnight_utc(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Resolves a full id or a unique prefix of one against the snapshot.
pub fn resolve_id(raw: &str, todos: &[Todo]) -> Result<TodoId, String> {
    let needle = raw.trim().to_lowercase();
    if let Ok(id) = TodoId::parse_str(&needle) {
        return Ok(id);
    }
    if needle.is_empty() {
        return Err("todo id cannot be empty".to_string());
    }

    let matches: Vec<TodoId> = todos
        .iter()
        .map(|todo| todo.id)
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("no todo matches id `{needle}`")),
        _ => Err(format!(
            "id prefix `{needle}` matches {} todos; use more characters",
            matches.len()
        )),
    }
}
