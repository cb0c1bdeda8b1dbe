mod key;
mod models;

pub use key::{key, ScheduleKey};
pub use models::{AnnotatedSchedule, ParseScheduleTypeError, ScheduleItem, ScheduleType};
