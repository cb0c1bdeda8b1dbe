//! Schedule loading through the feed fallback path and local documents.

use comeback_calendar::feed::{fallback_schedules, load_schedules, parse_schedule_document};
use comeback_calendar::{FeedClient, ScheduleType};

#[tokio::test]
async fn test_unreachable_feed_falls_back_to_samples() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = FeedClient::new(&format!("http://{}/", addr), 2).unwrap();
    let schedules = load_schedules(Some(&client)).await;

    assert_eq!(schedules, fallback_schedules());
}

#[test]
fn test_schedules_document_from_disk() {
    let document = r#"[
        { "id": 10, "artist": "ILLIT", "type": "回归", "dateKey": "2026-04-21", "detail": "2nd mini album" },
        { "artist": "KISS OF LIFE", "type": "演唱会", "dateKey": "2026-05-02", "ticketPlatform": "Melon" },
        { "artist": "nobody", "type": "直播" }
    ]"#;
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("schedules.json");
    std::fs::write(&path, document).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let schedules = parse_schedule_document(&value);

    assert_eq!(schedules.len(), 2);
    assert_eq!(schedules[0].id, 10);
    assert_eq!(schedules[0].date, "04-21");
    assert_eq!(schedules[1].id, 2);
    assert_eq!(schedules[1].schedule_type, ScheduleType::Concert);
    assert_eq!(schedules[1].detail, "回归");
    assert_eq!(schedules[1].ticket_platform.as_deref(), Some("Melon"));
}
