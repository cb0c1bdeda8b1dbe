use crate::schedule::ScheduleItem;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format of [`Record::recorded_at`].
pub const RECORDED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A schedule snapshot the user attached a personal note to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(flatten)]
    pub item: ScheduleItem,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub recorded_at: String,
}

impl Record {
    pub fn new(item: ScheduleItem, note: impl Into<String>, recorded_at: NaiveDateTime) -> Self {
        Self {
            item,
            note: note.into(),
            recorded_at: recorded_at.format(RECORDED_AT_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleType;
    use chrono::NaiveDate;

    #[test]
    fn test_record_serializes_flat() {
        let at = NaiveDate::from_ymd_opt(2026, 2, 15)
            .unwrap()
            .and_hms_opt(9, 5, 59)
            .unwrap();
        let record = Record::new(
            ScheduleItem::new(1, "IVE", ScheduleType::Comeback, "2026-02-15", "新专辑回归"),
            "so excited",
            at,
        );
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["artist"], "IVE");
        assert_eq!(json["note"], "so excited");
        assert_eq!(json["recordedAt"], "2026-02-15 09:05");

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
