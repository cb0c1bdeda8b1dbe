use crate::schedule::{ScheduleItem, ScheduleType};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Label of the tab showing every non-activity entry.
pub const ALL_LABEL: &str = "全部";

/// The only ticket platform whose fansign events are listed.
pub const KTOWN4U_PLATFORM: &str = "Ktown4u";

/// Which schedules the calendar and day list show, as chosen by the filter tabs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CalendarFilter {
    /// Everything except activities.
    #[default]
    All,
    /// Fansign events sold on Ktown4u.
    Fansign,
    /// Exactly one schedule type.
    Only(ScheduleType),
    /// A label that names no type; matches nothing.
    Unknown(String),
}

impl CalendarFilter {
    pub fn from_label(label: &str) -> Self {
        match label {
            ALL_LABEL => CalendarFilter::All,
            _ => match label.parse::<ScheduleType>() {
                Ok(ScheduleType::Fansign) => CalendarFilter::Fansign,
                Ok(t) => CalendarFilter::Only(t),
                Err(_) => CalendarFilter::Unknown(label.to_string()),
            },
        }
    }

    pub fn matches(&self, item: &ScheduleItem) -> bool {
        match self {
            CalendarFilter::All => item.schedule_type != ScheduleType::Activity,
            CalendarFilter::Fansign => {
                item.schedule_type == ScheduleType::Fansign
                    && item.ticket_platform.as_deref() == Some(KTOWN4U_PLATFORM)
            }
            CalendarFilter::Only(t) => item.schedule_type == *t,
            CalendarFilter::Unknown(_) => false,
        }
    }
}

impl FromStr for CalendarFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CalendarFilter::from_label(s))
    }
}

impl fmt::Display for CalendarFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarFilter::All => f.write_str(ALL_LABEL),
            CalendarFilter::Fansign => f.write_str(ScheduleType::Fansign.label()),
            CalendarFilter::Only(t) => f.write_str(t.label()),
            CalendarFilter::Unknown(label) => f.write_str(label),
        }
    }
}
