mod client;
mod parse;

pub use client::FeedClient;
pub use parse::{
    parse_feed_payload, parse_feed_record, parse_feed_records, parse_schedule_document,
    FeedRecordError, DEFAULT_ARTIST, DEFAULT_DETAIL,
};

use crate::schedule::{ScheduleItem, ScheduleType};
use tracing::info;

/// Sample schedules shown when the feed has nothing to offer.
pub fn fallback_schedules() -> Vec<ScheduleItem> {
    vec![
        ScheduleItem::new(1, "IVE", ScheduleType::Comeback, "2026-02-15", "新专辑回归"),
        ScheduleItem::new(
            2,
            "G-DRAGON",
            ScheduleType::Concert,
            "2026-02-06",
            "FAM MEETING 2026 · Seoul",
        ),
        ScheduleItem::new(
            3,
            "LNGSHOT",
            ScheduleType::Fansign,
            "2026-02-09",
            "Fansign Event · London",
        ),
        ScheduleItem::new(
            4,
            "BTS THE COMEBACK LIVE 购票指南",
            ScheduleType::Activity,
            "2026-02-09",
            "娱乐 · 光化门",
        )
        .with_location_text("娱乐 · 光化门")
        .with_detail_url(
            "https://world.nol.com/zh-CN/regions/b263b346-9a60-49d5-949a-dc88dfbea53e/festas",
        ),
    ]
}

/// Fetches schedules from `client` if there is one, falling back to
/// [`fallback_schedules`] when that yields nothing.
pub async fn load_schedules(client: Option<&FeedClient>) -> Vec<ScheduleItem> {
    let fetched = match client {
        Some(client) => client.fetch_schedules().await,
        None => Vec::new(),
    };
    if fetched.is_empty() {
        info!("No schedules from the feed, using the built-in sample schedules");
        return fallback_schedules();
    }
    fetched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_without_client_uses_fallback() {
        let schedules = load_schedules(None).await;
        assert_eq!(schedules, fallback_schedules());
        assert_eq!(schedules.len(), 4);
    }

    #[test]
    fn test_fallback_dates() {
        let schedules = fallback_schedules();
        assert_eq!(schedules[1].date, "02-06");
        assert!(schedules.iter().all(|s| s.date_key.starts_with("2026-02-")));
    }
}
