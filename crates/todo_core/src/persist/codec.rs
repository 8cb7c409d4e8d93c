use super::{PersistError, PersistResult};
use crate::model::todo::{truncate_to_millis, Priority, Todo, TodoId};
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Serialize)]
struct StateOut<'a> {
    todos: Vec<TodoOut<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TodoOut<'a> {
    id: TodoId,
    text: &'a str,
    completed: bool,
    created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<String>,
    priority: Priority,
    category: &'a str,
}

#[derive(Deserialize)]
struct StateIn {
    todos: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoIn {
    id: String,
    text: String,
    completed: bool,
    created_at: String,
    #[serde(default)]
    due_date: Option<String>,
    priority: Priority,
    category: String,
}

/// A record skipped during decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptRecord {
    /// Position in the persisted `todos` array.
    pub index: usize,
    pub reason: String,
}

/// Outcome of a best-effort decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedTodos {
    /// Records that decoded cleanly, in persisted order.
    pub todos: Vec<Todo>,
    pub dropped: Vec<CorruptRecord>,
}

/// Renders a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    let year = value.year();
    if (0..=9999).contains(&year) {
        return value.to_rfc3339_opts(SecondsFormat::Millis, true);
    }
    let sign = if year < 0 { '-' } else { '+' };
    format!(
        "{sign}{:06}-{}",
        year.unsigned_abs(),
        value.format("%m-%dT%H:%M:%S%.3fZ")
    )
}

/// Parses RFC 3339 text with any offset into a millisecond-precision UTC instant.
///
/// Also accepts the six-digit signed year form (`+010000-01-01T...`) that
/// [`format_timestamp`] writes for years outside `0..=9999`.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    let parsed = match split_extended_year(text) {
        Some((year, rest)) => DateTime::parse_from_rfc3339(&format!("{PROXY_LEAP_YEAR}-{rest}"))
            .ok()?
            .with_year(year)?,
        None => DateTime::parse_from_rfc3339(text).ok()?,
    };
    Some(truncate_to_millis(parsed.with_timezone(&Utc)))
}

/// Leap year stand-in so a Feb 29 in the real year still parses.
const PROXY_LEAP_YEAR: i32 = 2000;

fn split_extended_year(text: &str) -> Option<(i32, &str)> {
    let sign = match text.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits = text.get(1..7)?;
    let rest = text.get(7..)?.strip_prefix('-')?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((sign * digits.parse::<i32>().ok()?, rest))
}

/// Serializes the whole collection into the slot document.
pub fn encode_todos(todos: &[Todo]) -> PersistResult<String> {
    let state = StateOut {
        todos: todos
            .iter()
            .map(|todo| TodoOut {
                id: todo.id,
                text: todo.text.as_str(),
                completed: todo.completed,
                created_at: format_timestamp(todo.created_at),
                due_date: todo.due_date.map(format_timestamp),
                priority: todo.priority,
                category: todo.category.as_str(),
            })
            .collect(),
    };
    serde_json::to_string(&state).map_err(|err| PersistError::Encode(err.to_string()))
}

/// Restores the collection from a slot document.
///
/// # Errors
/// - `PersistError::PersistedStateCorrupt` when the document is not JSON or
///   has no `todos` array. Individual bad records are reported in
///   [`DecodedTodos::dropped`] instead.
pub fn decode_todos(text: &str) -> PersistResult<DecodedTodos> {
    let state: StateIn = serde_json::from_str(text)
        .map_err(|err| PersistError::PersistedStateCorrupt(err.to_string()))?;

    let mut decoded = DecodedTodos::default();
    let mut seen = HashSet::with_capacity(state.todos.len());

    for (index, value) in state.todos.into_iter().enumerate() {
        match decode_record(value) {
            Ok(todo) if !seen.insert(todo.id) => decoded.dropped.push(CorruptRecord {
                index,
                reason: format!("duplicate id `{}`", todo.id),
            }),
            Ok(todo) => decoded.todos.push(todo),
            Err(reason) => decoded.dropped.push(CorruptRecord { index, reason }),
        }
    }

    Ok(decoded)
}

fn decode_record(value: serde_json::Value) -> Result<Todo, String> {
    let record: TodoIn = serde_json::from_value(value).map_err(|err| err.to_string())?;

    let id = Uuid::parse_str(&record.id).map_err(|_| format!("invalid id `{}`", record.id))?;
    let created_at = parse_timestamp(&record.created_at)
        .ok_or_else(|| format!("invalid createdAt `{}`", record.created_at))?;
    let due_date = match record.due_date.as_deref() {
        Some(text) => Some(parse_timestamp(text).ok_or_else(|| format!("invalid dueDate `{text}`"))?),
        None => None,
    };

    Ok(Todo {
        id,
        text: record.text,
        completed: record.completed,
        created_at,
        due_date,
        priority: record.priority,
        category: record.category,
    })
}

#[cfg(test)]
mod tests {
    use super::{decode_todos, format_timestamp, parse_timestamp};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn timestamps_render_like_iso_strings() {
        let value = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap()
            + Duration::milliseconds(7);
        assert_eq!(format_timestamp(value), "2026-10-19T08:30:00.007Z");
    }

    #[test]
    fn parse_timestamp_normalizes_offsets_to_utc() {
        let parsed = parse_timestamp("2026-10-19T10:30:00.000+02:00").unwrap();
        assert_eq!(format_timestamp(parsed), "2026-10-19T08:30:00.000Z");
        assert!(parse_timestamp("19/10/2026").is_none());
    }

    #[test]
    fn years_past_9999_use_signed_six_digit_form() {
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(far), "+010000-01-01T00:00:00.000Z");
        assert_eq!(parse_timestamp("+010000-01-01T00:00:00.000Z"), Some(far));

        let ancient = Utc.with_ymd_and_hms(-44, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(ancient), "-000044-03-15T12:00:00.000Z");
        assert_eq!(parse_timestamp(&format_timestamp(ancient)), Some(ancient));
    }

    #[test]
    fn extended_year_keeps_leap_day_and_rejects_invalid_dates() {
        let leap = Utc.with_ymd_and_hms(10004, 2, 29, 6, 0, 0).unwrap();
        assert_eq!(parse_timestamp("+010004-02-29T06:00:00.000Z"), Some(leap));
        assert!(parse_timestamp("+010001-02-29T06:00:00.000Z").is_none());
        assert!(parse_timestamp("+01000-01-01T00:00:00.000Z").is_none());
    }

    #[test]
    fn null_due_date_decodes_as_unset() {
        let decoded = decode_todos(
            r#"{"todos":[{"id":"11111111-2222-4333-8444-555555555555","text":"a","completed":false,
            "createdAt":"2026-01-01T00:00:00.000Z","dueDate":null,"priority":"low","category":"x"}]}"#,
        )
        .unwrap();
        assert!(decoded.dropped.is_empty());
        assert_eq!(decoded.todos[0].due_date, None);
    }
}
