use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The fixed set of schedule entry kinds.
///
/// On the wire (feed payloads and persisted snapshots) each kind is encoded
/// with its Chinese label, which is also what goes into the identity key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScheduleType {
    #[default]
    #[serde(rename = "回归")]
    Comeback,
    #[serde(rename = "演唱会")]
    Concert,
    #[serde(rename = "签售")]
    Fansign,
    #[serde(rename = "活动")]
    Activity,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown schedule type: {0}")]
pub struct ParseScheduleTypeError(pub String);

impl ScheduleType {
    pub const ALL: [ScheduleType; 4] = [
        ScheduleType::Comeback,
        ScheduleType::Concert,
        ScheduleType::Fansign,
        ScheduleType::Activity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScheduleType::Comeback => "回归",
            ScheduleType::Concert => "演唱会",
            ScheduleType::Fansign => "签售",
            ScheduleType::Activity => "活动",
        }
    }
}

impl FromStr for ScheduleType {
    type Err = ParseScheduleTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScheduleType::ALL
            .into_iter()
            .find(|t| t.label() == s)
            .ok_or_else(|| ParseScheduleTypeError(s.to_string()))
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single calendar entry as delivered by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    /// Source-assigned id, not stable across reloads. Never used as identity.
    pub id: i64,
    pub artist: String,
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    /// Display date, usually `MM-DD`.
    #[serde(default)]
    pub date: String,
    /// Canonical `YYYY-MM-DD` date.
    #[serde(default)]
    pub date_key: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_platform: Option<String>,
    /// Venue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl ScheduleItem {
    pub fn new(
        id: i64,
        artist: impl Into<String>,
        schedule_type: ScheduleType,
        date_key: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        let date_key = date_key.into();
        let date = date_key.get(5..).unwrap_or_default().to_string();
        Self {
            id,
            artist: artist.into(),
            schedule_type,
            date,
            date_key,
            detail: detail.into(),
            ticket_platform: None,
            ticket_time: None,
            show_time: None,
            detail_url: None,
            location_text: None,
            cover_image: None,
        }
    }

    pub fn with_ticket_platform(mut self, platform: impl Into<String>) -> Self {
        self.ticket_platform = Some(platform.into());
        self
    }

    pub fn with_detail_url(mut self, url: impl Into<String>) -> Self {
        self.detail_url = Some(url.into());
        self
    }

    pub fn with_location_text(mut self, location: impl Into<String>) -> Self {
        self.location_text = Some(location.into());
        self
    }

    pub fn is_activity(&self) -> bool {
        self.schedule_type == ScheduleType::Activity
    }
}

/// Per-view projection of a schedule item with the user's local flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedSchedule {
    #[serde(flatten)]
    pub item: ScheduleItem,
    pub is_favorite: bool,
    pub is_recorded: bool,
}
