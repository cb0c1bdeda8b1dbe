mod builder;
mod filter;

pub use builder::{
    build_calendar, build_calendar_at, date_key, schedules_for_day, shift_month, today_key,
    CalendarDay,
};
pub use filter::{CalendarFilter, ALL_LABEL, KTOWN4U_PLATFORM};
