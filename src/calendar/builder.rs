use super::CalendarFilter;
use crate::schedule::ScheduleItem;
use chrono::{Datelike, Days, Local, Months, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub day: u32,
    pub date_key: String,
    pub is_current_month: bool,
    pub is_today: bool,
    pub has_event: bool,
}

/// Formats `date` as a `YYYY-MM-DD` date key.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Date key of the current local date.
pub fn today_key() -> String {
    date_key(Local::now().date_naive())
}

/// Moves `(year, month)` by `delta` months, rolling the year over.
/// Returns `None` when the resulting year does not fit an `i32`.
pub fn shift_month(year: i32, month: u32, delta: i32) -> Option<(i32, u32)> {
    let index = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(delta);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    Some((year, index.rem_euclid(12) as u32 + 1))
}

/// Builds the grid for `month` of `year` relative to today's local date.
pub fn build_calendar(
    year: i32,
    month: u32,
    schedules: &[ScheduleItem],
    filter: &CalendarFilter,
) -> Vec<CalendarDay> {
    build_calendar_at(year, month, schedules, filter, Local::now().date_naive())
}

/// Builds the grid for `month` of `year`, weeks starting on Sunday.
///
/// The grid starts with the tail of the previous month so the 1st lands on
/// its weekday, and ends with just enough days of the next month to fill the
/// last week. An invalid month yields an empty grid.
pub fn build_calendar_at(
    year: i32,
    month: u32,
    schedules: &[ScheduleItem],
    filter: &CalendarFilter,
    today: NaiveDate,
) -> Vec<CalendarDay> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        warn!("Cannot build calendar for invalid month {}-{}", year, month);
        return Vec::new();
    };
    let Some(days_in_month) = first
        .checked_add_months(Months::new(1))
        .map(|next| next.signed_duration_since(first).num_days() as u32)
    else {
        warn!("Calendar for {}-{} is out of range", year, month);
        return Vec::new();
    };

    let leading = first.weekday().num_days_from_sunday();
    let Some(start) = first.checked_sub_days(Days::new(leading as u64)) else {
        warn!("Calendar for {}-{} is out of range", year, month);
        return Vec::new();
    };
    let shown = leading + days_in_month;
    let trailing = (7 - shown % 7) % 7;

    let event_keys: HashSet<&str> = schedules
        .iter()
        .filter(|s| filter.matches(s))
        .map(|s| s.date_key.as_str())
        .collect();
    let today_key = date_key(today);

    start
        .iter_days()
        .take((shown + trailing) as usize)
        .map(|date| {
            let key = date_key(date);
            CalendarDay {
                day: date.day(),
                is_current_month: date.year() == year && date.month() == month,
                is_today: key == today_key,
                has_event: event_keys.contains(key.as_str()),
                date_key: key,
            }
        })
        .collect()
}

/// The schedules listed under a selected day, with the same filter as the grid.
pub fn schedules_for_day(
    schedules: &[ScheduleItem],
    date_key: &str,
    filter: &CalendarFilter,
) -> Vec<ScheduleItem> {
    schedules
        .iter()
        .filter(|s| s.date_key == date_key && filter.matches(s))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleType;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn item(artist: &str, schedule_type: ScheduleType, date_key: &str) -> ScheduleItem {
        ScheduleItem::new(1, artist, schedule_type, date_key, "detail")
    }

    fn current_days(grid: &[CalendarDay]) -> Vec<u32> {
        grid.iter()
            .filter(|d| d.is_current_month)
            .map(|d| d.day)
            .collect()
    }

    #[test]
    fn test_month_starting_on_sunday_has_no_leading_days() {
        let grid = build_calendar_at(2026, 2, &[], &CalendarFilter::All, ymd(2026, 10, 16));

        assert_eq!(grid.len(), 28);
        assert_eq!(grid[0].day, 1);
        assert!(grid[0].is_current_month);
        assert_eq!(grid[0].date_key, "2026-02-01");
        assert_eq!(current_days(&grid), (1..=28).collect::<Vec<_>>());
    }

    #[test]
    fn test_leading_and_trailing_spillover() {
        // April 1st 2026 is a Wednesday
        let grid = build_calendar_at(2026, 4, &[], &CalendarFilter::All, ymd(2026, 10, 16));

        assert_eq!(grid.len(), 35);
        let leading: Vec<&str> = grid[..3].iter().map(|d| d.date_key.as_str()).collect();
        assert_eq!(leading, vec!["2026-03-29", "2026-03-30", "2026-03-31"]);
        assert!(grid[..3].iter().all(|d| !d.is_current_month));
        assert_eq!(grid[33].date_key, "2026-05-01");
        assert_eq!(grid[34].date_key, "2026-05-02");
        assert_eq!(current_days(&grid), (1..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_year_rollover_both_ways() {
        let january = build_calendar_at(2026, 1, &[], &CalendarFilter::All, ymd(2026, 10, 16));
        assert_eq!(january[0].date_key, "2025-12-28");
        assert_eq!(january.len(), 35);

        let december = build_calendar_at(2026, 12, &[], &CalendarFilter::All, ymd(2026, 10, 16));
        assert_eq!(december[0].date_key, "2026-11-29");
        assert_eq!(december.last().unwrap().date_key, "2027-01-02");
        assert_eq!(december.len(), 35);
    }

    #[test]
    fn test_grid_is_whole_weeks_with_every_day_of_month() {
        for year in [2024, 2025, 2026] {
            for month in 1..=12 {
                let grid =
                    build_calendar_at(year, month, &[], &CalendarFilter::All, ymd(2026, 1, 1));
                let first = ymd(year, month, 1);
                let (next_year, next_month) = shift_month(year, month, 1).unwrap();
                let expected_days = ymd(next_year, next_month, 1)
                    .signed_duration_since(first)
                    .num_days() as u32;

                assert_eq!(grid.len() % 7, 0);
                assert_eq!(current_days(&grid), (1..=expected_days).collect::<Vec<_>>());
                assert!(grid.len() - expected_days as usize <= 12);
            }
        }
    }

    #[test]
    fn test_leap_february() {
        let grid = build_calendar_at(2024, 2, &[], &CalendarFilter::All, ymd(2024, 2, 1));
        assert_eq!(current_days(&grid).len(), 29);
    }

    #[test]
    fn test_has_event_follows_filter() {
        let schedules = vec![
            item("IVE", ScheduleType::Comeback, "2026-02-15"),
            item("BTS", ScheduleType::Activity, "2026-02-09"),
            item("LNGSHOT", ScheduleType::Fansign, "2026-02-10")
                .with_ticket_platform("Ktown4u"),
            item("OTHER", ScheduleType::Fansign, "2026-02-11"),
            item("NEXT", ScheduleType::Concert, "2026-03-01"),
        ];
        let marked = |filter: CalendarFilter| -> Vec<String> {
            build_calendar_at(2026, 2, &schedules, &filter, ymd(2026, 10, 16))
                .into_iter()
                .filter(|d| d.has_event)
                .map(|d| d.date_key)
                .collect()
        };

        assert_eq!(
            marked(CalendarFilter::All),
            vec!["2026-02-10", "2026-02-11", "2026-02-15"]
        );
        assert_eq!(marked(CalendarFilter::Fansign), vec!["2026-02-10"]);
        assert_eq!(
            marked(CalendarFilter::Only(ScheduleType::Activity)),
            vec!["2026-02-09"]
        );
        assert!(marked(CalendarFilter::Unknown("x".to_string())).is_empty());
    }

    #[test]
    fn test_spillover_days_can_have_events() {
        let schedules = vec![item("IVE", ScheduleType::Comeback, "2026-05-02")];
        let grid = build_calendar_at(2026, 4, &schedules, &CalendarFilter::All, ymd(2026, 1, 1));

        let last = grid.last().unwrap();
        assert!(!last.is_current_month);
        assert!(last.has_event);
    }

    #[test]
    fn test_is_today() {
        let grid = build_calendar_at(2026, 10, &[], &CalendarFilter::All, ymd(2026, 10, 16));
        let today: Vec<&CalendarDay> = grid.iter().filter(|d| d.is_today).collect();

        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date_key, "2026-10-16");
    }

    #[test]
    fn test_invalid_month_is_empty() {
        assert!(build_calendar_at(2026, 0, &[], &CalendarFilter::All, ymd(2026, 1, 1)).is_empty());
        assert!(build_calendar_at(2026, 13, &[], &CalendarFilter::All, ymd(2026, 1, 1)).is_empty());
    }

    #[test]
    fn test_shift_month() {
        assert_eq!(shift_month(2026, 1, -1), Some((2025, 12)));
        assert_eq!(shift_month(2026, 12, 1), Some((2027, 1)));
        assert_eq!(shift_month(2026, 6, 0), Some((2026, 6)));
        assert_eq!(shift_month(2026, 3, -15), Some((2024, 12)));
    }

    #[test]
    fn test_shift_month_out_of_range() {
        assert_eq!(shift_month(i32::MAX, 12, 1), None);
        assert_eq!(shift_month(i32::MIN, 1, -1), None);
        assert_eq!(shift_month(i32::MAX, 11, 1), Some((i32::MAX, 12)));
        assert_eq!(shift_month(0, 1, i32::MIN), Some((-178956971, 5)));
    }

    #[test]
    fn test_schedules_for_day_uses_filter() {
        let schedules = vec![
            item("A", ScheduleType::Comeback, "2026-02-09"),
            item("B", ScheduleType::Activity, "2026-02-09"),
            item("C", ScheduleType::Comeback, "2026-02-10"),
        ];

        let all = schedules_for_day(&schedules, "2026-02-09", &CalendarFilter::All);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].artist, "A");

        let activities = schedules_for_day(
            &schedules,
            "2026-02-09",
            &CalendarFilter::Only(ScheduleType::Activity),
        );
        assert_eq!(activities[0].artist, "B");
    }

    #[test]
    fn test_date_key_format() {
        assert_eq!(date_key(ymd(2026, 3, 7)), "2026-03-07");
        assert_eq!(today_key().len(), 10);
    }
}
