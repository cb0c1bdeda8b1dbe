//! Mapping of loosely typed feed records into [`ScheduleItem`]s.

use crate::schedule::{ParseScheduleTypeError, ScheduleItem, ScheduleType};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_ARTIST: &str = "未知";
pub const DEFAULT_DETAIL: &str = "回归";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedRecordError {
    #[error("Feed record is not a JSON object")]
    NotAnObject,
    #[error(transparent)]
    UnknownType(#[from] ParseScheduleTypeError),
}

/// Non-empty string value of `key`, if any.
fn non_empty_str<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn optional_string(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Maps the record at `index` of a feed payload.
///
/// Missing or empty fields get defaults: the id falls back to `index + 1`,
/// the artist to `未知`, the type and the detail to `回归`, and the display
/// date to the date key without its year. A type outside the known set
/// rejects the record.
pub fn parse_feed_record(index: usize, raw: &Value) -> Result<ScheduleItem, FeedRecordError> {
    let record = raw.as_object().ok_or(FeedRecordError::NotAnObject)?;

    let schedule_type = match non_empty_str(record, "type") {
        Some(label) => label.parse::<ScheduleType>()?,
        None => ScheduleType::default(),
    };
    let date_key = non_empty_str(record, "dateKey").unwrap_or_default().to_string();
    let date = non_empty_str(record, "date")
        .map(str::to_string)
        .unwrap_or_else(|| date_key.chars().skip(5).collect());

    Ok(ScheduleItem {
        id: record
            .get("id")
            .and_then(Value::as_i64)
            .unwrap_or(index as i64 + 1),
        artist: non_empty_str(record, "artist")
            .unwrap_or(DEFAULT_ARTIST)
            .to_string(),
        schedule_type,
        date,
        date_key,
        detail: non_empty_str(record, "detail")
            .unwrap_or(DEFAULT_DETAIL)
            .to_string(),
        ticket_platform: optional_string(record, "ticketPlatform"),
        ticket_time: optional_string(record, "ticketTime"),
        show_time: optional_string(record, "showTime"),
        detail_url: optional_string(record, "detailUrl"),
        location_text: optional_string(record, "locationText"),
        cover_image: optional_string(record, "coverImage"),
    })
}

/// Maps every record of `records`, dropping (and logging) rejected ones.
pub fn parse_feed_records(records: &[Value]) -> Vec<ScheduleItem> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| match parse_feed_record(index, raw) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping feed record #{}: {}", index, e);
                None
            }
        })
        .collect()
}

/// Extracts schedules from a `{ "schedules": [...] }` feed payload.
/// Any other shape yields no schedules.
pub fn parse_feed_payload(payload: &Value) -> Vec<ScheduleItem> {
    match payload.get("schedules").and_then(Value::as_array) {
        Some(records) => parse_feed_records(records),
        None => {
            warn!("Schedule feed payload has no schedules array");
            Vec::new()
        }
    }
}

/// Like [`parse_feed_payload`], but a bare array of records is accepted too.
pub fn parse_schedule_document(document: &Value) -> Vec<ScheduleItem> {
    match document.as_array() {
        Some(records) => parse_feed_records(records),
        None => parse_feed_payload(document),
    }
}
